pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod detail;
pub mod filter;
pub mod format;
pub mod glyph;
pub mod layout;
pub mod map;
pub mod stats;
pub mod transition;
pub mod ui;

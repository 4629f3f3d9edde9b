mod canvas;
mod color;

pub use canvas::{BrailleCanvas, Plot};
pub use color::{ColorCanvas, ColorCell, Rgb};

pub mod geometry;
mod graticule;
mod projection;
mod renderer;
mod spatial;

pub use projection::{Mercator, Viewport, SCENE_HEIGHT, SCENE_WIDTH};
pub use renderer::{LineString, MapLayers, MapRenderer};
pub use spatial::SceneGrid;

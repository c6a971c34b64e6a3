pub mod cluster;
mod geometry;
pub mod projection;
pub mod quadtree;
mod renderer;

pub use projection::Viewport;
pub use renderer::{Country, MapLayers, MapRenderer};

mod geometry;
mod projection;
mod renderer;

pub use geometry::{draw_circle, draw_line, draw_ring};
pub use projection::Viewport;
pub use renderer::{DisplaySettings, LineString, Lod, MapLayers, MapRenderer};

//! Geographic layer system for the resort map.
//!
//! This module loads state boundaries, projects them with the Albers USA
//! layout, and lays out and paints the map surface with resort markers.

mod layer;
mod projection;
mod renderer;
mod triangulate;

pub use layer::GeoLayer;
pub use projection::MapProjection;
pub use renderer::{MapView, MARKER_HOVER_RADIUS, MARKER_RADIUS};

//! Rendering pipeline for the water quality maps.
//!
//! Rows become styled shapes on a [`surface::MapSurface`]. Each layer is
//! cleared before a render pass adds new shapes.

pub mod geojson_surface;
pub mod layer;
pub mod points;
pub mod popup;
pub mod surface;
pub mod zones;

pub use geojson_surface::GeoJsonSurface;
pub use layer::{Layer, LayerState, RenderError};
pub use points::{render_points, RenderSummary, ToMarker};
pub use surface::{Bounds, ChartSurface, MapSurface};
pub use zones::ZoneLayer;

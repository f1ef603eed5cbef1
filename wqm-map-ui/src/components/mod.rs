//! Reusable Dioxus RSX components for the map pages.

mod date_selector;
mod error_display;
mod filter_panel;
mod kpi_panel;
mod layer_toggle;
mod legend;
mod map_container;
mod map_header;
mod status_line;
mod time_slider;

pub use date_selector::DateSelector;
pub use error_display::ErrorDisplay;
pub use filter_panel::FilterPanel;
pub use kpi_panel::KpiPanel;
pub use layer_toggle::LayerToggle;
pub use legend::Legend;
pub use map_container::MapContainer;
pub use map_header::MapHeader;
pub use status_line::StatusLine;
pub use time_slider::{SliderAction, TimeSlider};

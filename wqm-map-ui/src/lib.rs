//! Shared Dioxus components and Leaflet bridge for the water quality map pages.
//!
//! This crate provides:
//! - `js_bridge`: command channel to the Leaflet/Chart.js bridge script
//! - `leaflet`: `MapSurface` + `ChartSurface` over that bridge
//! - `config`: map defaults and backend settings
//! - `state`: reactive `PageState` with Dioxus Signals
//! - `components`: reusable RSX components (filters, legend, status, etc.)

pub mod components;
pub mod config;
pub mod js_bridge;
pub mod leaflet;
pub mod state;

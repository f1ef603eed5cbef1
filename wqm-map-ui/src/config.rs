//! Map defaults and backend connection settings for the web pages.
//!
//! The backend URL and key are baked in at build time from
//! `WQM_SUPABASE_URL` / `WQM_SUPABASE_ANON_KEY`. A page may override them by
//! setting `window.SUPABASE_URL` / `window.SUPABASE_ANON_KEY` before the
//! WASM bundle starts.

use crate::js_bridge::window_string;
use wqm_core::client::BackendConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 41.323,
            center_lon: -96.15,
            zoom: 13,
        }
    }
}

const BUILD_URL: Option<&str> = option_env!("WQM_SUPABASE_URL");
const BUILD_KEY: Option<&str> = option_env!("WQM_SUPABASE_ANON_KEY");

/// Backend settings, or `None` when neither the page nor the build provides them.
pub fn backend_config() -> Option<BackendConfig> {
    let url = window_string("SUPABASE_URL").or_else(|| BUILD_URL.map(str::to_string))?;
    let key = window_string("SUPABASE_ANON_KEY").or_else(|| BUILD_KEY.map(str::to_string))?;
    Some(BackendConfig::new(&url, &key))
}

/// Shown when [`backend_config`] returns `None`.
pub const MISSING_BACKEND: &str =
    "Backend not configured: set WQM_SUPABASE_URL and WQM_SUPABASE_ANON_KEY.";

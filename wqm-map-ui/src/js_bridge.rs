//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The Leaflet/Chart.js bridge lives in `assets/js/map-bridge.js`, is
//! embedded at compile time and evaluated once at startup. Every map
//! operation is one JSON command passed to `window.wqmMap.cmd(...)`.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

static MAP_BRIDGE_JS: &str = include_str!("../assets/js/map-bridge.js");

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('WQM JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Evaluate the bridge script. Call once at app startup, before any command.
pub fn load_map_bridge() {
    if let Err(e) = js_sys::eval(MAP_BRIDGE_JS) {
        log::error!("map bridge failed to load: {:?}", e);
    }
}

/// Send one command to the bridge.
pub fn send<T: Serialize>(command: &T) {
    match serde_json::to_string(command) {
        Ok(json) => call_js(&format!("window.wqmMap.cmd({});", json)),
        Err(e) => log::error!("map command not serializable: {}", e),
    }
}

/// Read a string global such as `window.SUPABASE_URL`.
pub fn window_string(name: &str) -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str(name))
        .ok()?
        .as_string()
        .filter(|s| !s.is_empty())
}

/// Register the handler the bridge calls on zone popup open/close.
///
/// The bridge defers each call with `setTimeout(0)`, so `on_event` never
/// runs inside another Rust callback.
pub fn set_popup_handler(on_event: impl FnMut(String, u32) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut on_event = on_event;
    let closure = Closure::<dyn FnMut(String, u32)>::new(move |kind: String, shape: u32| {
        on_event(kind, shape)
    });
    let _ = js_sys::Reflect::set(
        &window,
        &JsValue::from_str("__wqmOnPopup"),
        closure.as_ref().unchecked_ref::<js_sys::Function>(),
    );
    // lives for the rest of the page
    closure.forget();
}

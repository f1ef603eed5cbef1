//! Blocking page error, read from `PageState::error_msg`.

use crate::state::PageState;
use dioxus::prelude::*;

/// Renders nothing until a page-level error is set, e.g. a missing backend
/// config. Load failures go to the status line instead.
#[component]
pub fn ErrorDisplay() -> Element {
    let state = use_context::<PageState>();
    let Some(message) = state.error_msg.read().clone() else {
        return rsx! {};
    };

    rsx! {
        div {
            style: "padding: 10px 14px; margin: 8px 0; background: #FFF3E0; color: #C62828; border-left: 4px solid #C62828;",
            strong { "Map unavailable: " }
            "{message}"
        }
    }
}

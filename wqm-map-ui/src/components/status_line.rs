//! The status message under the map.

use crate::state::PageState;
use dioxus::prelude::*;

#[component]
pub fn StatusLine() -> Element {
    let state = use_context::<PageState>();
    let status = state.status.read().clone();
    let color = if status.is_error() { "#C62828" } else { "#555" };

    rsx! {
        div {
            id: "msg",
            style: "margin: 6px 0; font-size: 13px; color: {color}; min-height: 18px;",
            "{status.text()}"
        }
    }
}

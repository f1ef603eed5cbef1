//! Average phosphate, ammonia, and nitrite for the selected date.

use crate::state::PageState;
use dioxus::prelude::*;
use wqm_core::kpi::KpiSummary;

#[component]
fn KpiTile(id: String, label: String, value: String) -> Element {
    rsx! {
        div {
            style: "flex: 1; padding: 8px 12px; background: #f5f7fa; border-radius: 4px; text-align: center;",
            div { style: "font-size: 12px; color: #666;", "{label}" }
            div {
                id: "{id}",
                style: "font-size: 22px; font-weight: bold;",
                "{value}"
            }
        }
    }
}

#[component]
pub fn KpiPanel() -> Element {
    let state = use_context::<PageState>();
    let summary = (state.kpi)().unwrap_or_default();

    rsx! {
        div {
            style: "display: flex; gap: 8px; margin: 8px 0;",
            KpiTile {
                id: "phosphate".to_string(),
                label: "Avg phosphate (ppm)".to_string(),
                value: KpiSummary::format(summary.phosphate),
            }
            KpiTile {
                id: "ammonia".to_string(),
                label: "Avg ammonia (ppm)".to_string(),
                value: KpiSummary::format(summary.ammonia),
            }
            KpiTile {
                id: "nitrite".to_string(),
                label: "Avg nitrite (ppm)".to_string(),
                value: KpiSummary::format(summary.nitrite),
            }
        }
    }
}

//! Color legend for a map layer.

use dioxus::prelude::*;
use wqm_core::classify::LegendEntry;

#[derive(Props, Clone, PartialEq)]
pub struct LegendProps {
    pub title: String,
    pub entries: Vec<LegendEntry>,
    /// Extra lines under the swatches, e.g. chemical abbreviations
    #[props(default = Vec::new())]
    pub notes: Vec<String>,
}

#[component]
pub fn Legend(props: LegendProps) -> Element {
    rsx! {
        div {
            class: "legend",
            style: "display: inline-block; padding: 6px 10px; margin: 8px 8px 0 0; background: #fff; border: 1px solid #ccc; border-radius: 4px; font-size: 12px; line-height: 18px; vertical-align: top;",
            h4 { style: "margin: 0 0 4px 0; font-size: 13px;", "{props.title}" }
            for entry in props.entries.iter() {
                div {
                    i {
                        style: "display: inline-block; width: 14px; height: 14px; margin-right: 6px; vertical-align: middle; background: {entry.color};",
                    }
                    "{entry.label}"
                }
            }
            if !props.notes.is_empty() {
                div {
                    style: "margin-top: 4px; color: #555;",
                    for note in props.notes.iter() {
                        div { "{note}" }
                    }
                }
            }
        }
    }
}

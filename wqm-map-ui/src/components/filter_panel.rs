//! Year/month filter box with apply and reset buttons.
//!
//! Hidden entirely when the loaded rows offer no dates to filter on.

use crate::state::PageState;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct FilterPanelProps {
    pub on_year: EventHandler<Option<i32>>,
    pub on_month: EventHandler<Option<u32>>,
    pub on_apply: EventHandler<()>,
    pub on_reset: EventHandler<()>,
}

#[component]
pub fn FilterPanel(props: FilterPanelProps) -> Element {
    let state = use_context::<PageState>();
    if !(state.filters_visible)() {
        return rsx! {};
    }
    let years = state.years.read().clone();
    let months = state.months.read().clone();
    let selection = (state.selection)();
    let on_year = props.on_year;
    let on_month = props.on_month;
    let on_apply = props.on_apply;
    let on_reset = props.on_reset;

    rsx! {
        div {
            id: "filters",
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
            label {
                r#for: "yearSelect",
                style: "font-weight: bold;",
                "Year: "
            }
            select {
                id: "yearSelect",
                onchange: move |evt: Event<FormData>| on_year.call(evt.value().parse().ok()),
                option { value: "", selected: selection.year.is_none(), "All" }
                for year in years.iter() {
                    option {
                        value: "{year}",
                        selected: selection.year == Some(*year),
                        "{year}"
                    }
                }
            }
            label {
                r#for: "monthSelect",
                style: "font-weight: bold;",
                "Month: "
            }
            select {
                id: "monthSelect",
                onchange: move |evt: Event<FormData>| on_month.call(evt.value().parse().ok()),
                option { value: "", selected: selection.month.is_none(), "All" }
                for m in months.iter() {
                    option {
                        value: "{m.month}",
                        selected: selection.month == Some(m.month),
                        "{m.name}"
                    }
                }
            }
            button {
                id: "applyFilters",
                onclick: move |_| on_apply.call(()),
                "Apply"
            }
            button {
                id: "resetFilters",
                onclick: move |_| on_reset.call(()),
                "Reset"
            }
        }
    }
}

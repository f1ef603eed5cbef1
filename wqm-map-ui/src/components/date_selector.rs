//! Dropdown of sample dates. Each choice triggers a fresh load for that date.

use crate::state::PageState;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct DateSelectorProps {
    pub on_select: EventHandler<String>,
}

#[component]
pub fn DateSelector(props: DateSelectorProps) -> Element {
    let mut state = use_context::<PageState>();
    let dates = state.dates.read().clone();
    let selected = (state.selected_date)();
    let on_select = props.on_select;

    let on_change = move |evt: Event<FormData>| {
        let value = evt.value();
        state.selected_date.set(value.clone());
        on_select.call(value);
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "sampleDate",
                style: "font-weight: bold; margin-right: 8px;",
                "Sample date: "
            }
            select {
                id: "sampleDate",
                onchange: on_change,
                option { value: "", selected: selected.is_empty(), "--Select--" }
                for date in dates.iter() {
                    option {
                        value: "{date}",
                        selected: *date == selected,
                        "{date}"
                    }
                }
            }
        }
    }
}

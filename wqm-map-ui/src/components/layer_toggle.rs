//! Checkbox that shows or hides a whole map layer.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LayerToggleProps {
    pub id: String,
    pub label: String,
    #[props(default = true)]
    pub checked: bool,
    pub on_toggle: EventHandler<bool>,
}

#[component]
pub fn LayerToggle(props: LayerToggleProps) -> Element {
    let on_toggle = props.on_toggle;

    rsx! {
        label {
            style: "margin: 8px 12px 8px 0; display: inline-flex; gap: 6px; align-items: center;",
            input {
                id: "{props.id}",
                r#type: "checkbox",
                checked: props.checked,
                onchange: move |evt: Event<FormData>| on_toggle.call(evt.checked()),
            }
            "{props.label}"
        }
    }
}

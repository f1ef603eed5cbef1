//! Time step slider with first/previous/next/last buttons.

use crate::state::PageState;
use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderAction {
    First,
    Back,
    Forward,
    Last,
    Seek(usize),
}

#[derive(Props, Clone, PartialEq)]
pub struct TimeSliderProps {
    pub on_action: EventHandler<SliderAction>,
}

#[component]
pub fn TimeSlider(props: TimeSliderProps) -> Element {
    let state = use_context::<PageState>();
    let steps = state.steps.read().clone();
    if steps.is_empty() {
        return rsx! {};
    }
    let current = (state.step)().unwrap_or(0);
    let max = steps.len() - 1;
    let label = steps.get(current).cloned().unwrap_or_default();
    let on_action = props.on_action;

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 8px; align-items: center;",
            button { onclick: move |_| on_action.call(SliderAction::First), "⏮" }
            button { onclick: move |_| on_action.call(SliderAction::Back), "◀" }
            input {
                r#type: "range",
                min: "0",
                max: "{max}",
                value: "{current}",
                style: "flex: 1;",
                oninput: move |evt: Event<FormData>| {
                    if let Ok(i) = evt.value().parse::<usize>() {
                        on_action.call(SliderAction::Seek(i));
                    }
                },
            }
            button { onclick: move |_| on_action.call(SliderAction::Forward), "▶" }
            button { onclick: move |_| on_action.call(SliderAction::Last), "⏭" }
            span { style: "min-width: 110px; font-weight: bold;", "{label}" }
        }
    }
}

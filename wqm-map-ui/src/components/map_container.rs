//! Map container component.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct MapContainerProps {
    /// The DOM id Leaflet mounts the map into
    pub id: String,
    #[props(default = 520)]
    pub height: u32,
}

/// A fixed-height div for the Leaflet map.
#[component]
pub fn MapContainer(props: MapContainerProps) -> Element {
    let style = format!(
        "height: {}px; width: 100%; position: relative; border: 1px solid #ddd; border-radius: 4px;",
        props.height
    );

    rsx! {
        div {
            id: "{props.id}",
            style: "{style}",
        }
    }
}

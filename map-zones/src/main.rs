//! Land-Cover Zones
//!
//! Zone polygons filled by their dominant land cover. Clicking a zone opens
//! a popup with the raw percentages and a donut chart, which is drawn when
//! the popup opens and destroyed when it closes.

use dioxus::prelude::*;
use wqm_core::classify::land_cover_legend;
use wqm_core::client::RestClient;
use wqm_core::records::ZoneRecord;
use wqm_core::RowSource;
use wqm_map_ui::components::{ErrorDisplay, Legend, MapContainer, MapHeader, StatusLine};
use wqm_map_ui::config::{backend_config, MapConfig, MISSING_BACKEND};
use wqm_map_ui::js_bridge;
use wqm_map_ui::leaflet::LeafletSurface;
use wqm_map_ui::state::{share, PageState, SharedSession};
use wqm_render::surface::ShapeId;
use wqm_session::ZoneMap;

const MAP_CONTAINER_ID: &str = "map";

type Session = SharedSession<ZoneMap<LeafletSurface>>;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("map-zones-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(PageState::new);
    let session: Session = use_hook(|| {
        js_bridge::load_map_bridge();
        let session = share(ZoneMap::new(LeafletSurface::new(
            MAP_CONTAINER_ID,
            &MapConfig::default(),
        )));

        let popups = session.clone();
        js_bridge::set_popup_handler(move |kind, shape| {
            let Ok(mut map) = popups.try_borrow_mut() else {
                log::warn!("popup {} for shape {} while the map is busy", kind, shape);
                return;
            };
            match kind.as_str() {
                "open" => {
                    map.popup_opened(ShapeId(shape));
                }
                "close" => map.popup_closed(ShapeId(shape)),
                other => log::warn!("unknown popup event {}", other),
            }
        });
        session
    });

    let loader = session.clone();
    use_hook(move || {
        let Some(config) = backend_config() else {
            state.error_msg.set(Some(MISSING_BACKEND.to_string()));
            return;
        };
        let client = RestClient::new(config);
        spawn(async move {
            let query = loader.borrow_mut().begin_load();
            state.show_status(loader.borrow().status());
            let result = client.fetch::<ZoneRecord>(&query).await;
            let _ = loader.borrow_mut().finish_load(result);
            state.show_status(loader.borrow().status());
        });
    });

    rsx! {
        div {
            style: "max-width: 1000px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            MapHeader {
                title: "Land-Cover Zones".to_string(),
                description: "Zone color shows the largest land-cover share.".to_string(),
            }

            ErrorDisplay {}

            MapContainer { id: MAP_CONTAINER_ID.to_string(), height: 600 }

            StatusLine {}

            Legend {
                title: "Land Cover Types".to_string(),
                entries: land_cover_legend(),
            }
        }
    }
}

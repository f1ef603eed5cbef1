//! Water Quality KPIs by Date
//!
//! A dropdown of sample dates; each choice fetches that date's rows from
//! `vw_kpi_samples`, replaces the markers (colored by ammonia), and updates
//! the average phosphate/ammonia/nitrite tiles. A response that arrives after
//! a newer choice was made is dropped.

use dioxus::prelude::*;
use wqm_core::classify::{concentration_legend, Palette, DEFAULT_THRESHOLDS};
use wqm_core::client::RestClient;
use wqm_core::records::KpiSample;
use wqm_core::source::fetch_distinct_dates;
use wqm_core::{RowSource, View};
use wqm_map_ui::components::{
    DateSelector, ErrorDisplay, KpiPanel, Legend, MapContainer, MapHeader, StatusLine,
};
use wqm_map_ui::config::{backend_config, MapConfig, MISSING_BACKEND};
use wqm_map_ui::js_bridge;
use wqm_map_ui::leaflet::LeafletSurface;
use wqm_map_ui::state::{share, PageState, SharedSession};
use wqm_session::KpiMap;

const MAP_CONTAINER_ID: &str = "map";

type Session = SharedSession<KpiMap<LeafletSurface>>;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("map-kpi-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(PageState::new);
    let session: Session = use_hook(|| {
        js_bridge::load_map_bridge();
        share(KpiMap::new(LeafletSurface::new(
            MAP_CONTAINER_ID,
            &MapConfig::default(),
        )))
    });
    let client = use_hook(|| backend_config().map(RestClient::new));

    // ─── Load the date list once ───
    let loader = session.clone();
    let dates_client = client.clone();
    use_hook(move || {
        let Some(client) = dates_client else {
            state.error_msg.set(Some(MISSING_BACKEND.to_string()));
            return;
        };
        spawn(async move {
            let result = fetch_distinct_dates(&client, View::KpiSamples).await;
            let _ = loader.borrow_mut().finish_dates(result);
            state.show_kpi(&loader.borrow());
        });
    });

    let s = session.clone();
    let on_select = move |date: String| {
        let Some(client) = client.clone() else {
            return;
        };
        let Some(request) = s.borrow_mut().begin_date(&date) else {
            return;
        };
        state.show_kpi(&s.borrow());
        let s = s.clone();
        spawn(async move {
            let result = client.fetch::<KpiSample>(&request.query).await;
            // stale responses and failures leave the map as it was
            let _ = s.borrow_mut().finish_date(&request, result);
            state.show_kpi(&s.borrow());
        });
    };

    rsx! {
        div {
            style: "max-width: 1000px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            MapHeader {
                title: "Water Quality KPIs".to_string(),
                description: "Pick a sample date to see that day's sites and averages.".to_string(),
            }

            ErrorDisplay {}

            DateSelector { on_select: on_select }

            KpiPanel {}

            MapContainer { id: MAP_CONTAINER_ID.to_string() }

            StatusLine {}

            Legend {
                title: "Ammonia (ppm)".to_string(),
                entries: concentration_legend(&DEFAULT_THRESHOLDS, &Palette::NAMED),
            }
        }
    }
}

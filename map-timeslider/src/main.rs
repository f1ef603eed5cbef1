//! Ammonia Time Slider
//!
//! Loads the whole nutrient time series once, then shows one sample date at
//! a time. Each slider step replaces the markers with that date's readings.

use dioxus::prelude::*;
use wqm_core::classify::{concentration_legend, Palette, DEFAULT_THRESHOLDS};
use wqm_core::client::RestClient;
use wqm_core::records::TimeseriesRecord;
use wqm_core::RowSource;
use wqm_map_ui::components::{
    ErrorDisplay, Legend, MapContainer, MapHeader, SliderAction, StatusLine, TimeSlider,
};
use wqm_map_ui::config::{backend_config, MapConfig, MISSING_BACKEND};
use wqm_map_ui::js_bridge;
use wqm_map_ui::leaflet::LeafletSurface;
use wqm_map_ui::state::{share, PageState, SharedSession};
use wqm_session::TimeSliderMap;

const MAP_CONTAINER_ID: &str = "map";

type Session = SharedSession<TimeSliderMap<LeafletSurface>>;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("map-timeslider-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(PageState::new);
    let session: Session = use_hook(|| {
        js_bridge::load_map_bridge();
        let config = MapConfig {
            center_lat: 41.32,
            ..MapConfig::default()
        };
        share(TimeSliderMap::new(LeafletSurface::new(MAP_CONTAINER_ID, &config)))
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
            state.show_slider(&loader.borrow());
            let result = client.fetch::<TimeseriesRecord>(&query).await;
            let _ = loader.borrow_mut().finish_load(result);
            state.show_slider(&loader.borrow());
        });
    });

    let s = session.clone();
    let on_action = move |action: SliderAction| {
        let mut map = s.borrow_mut();
        let result = match action {
            SliderAction::First => map.first(),
            SliderAction::Back => map.step_back(),
            SliderAction::Forward => map.step_forward(),
            SliderAction::Last => map.last(),
            SliderAction::Seek(i) => map.seek(i),
        };
        if let Ok(summary) = result {
            log::debug!("time step shows {} markers", summary.placed);
        }
        state.show_slider(&map);
    };

    rsx! {
        div {
            style: "max-width: 1000px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            MapHeader {
                title: "Ammonia Over Time".to_string(),
                description: "Step through sample dates to watch ammonia change by site.".to_string(),
            }

            ErrorDisplay {}

            TimeSlider { on_action: on_action }

            MapContainer { id: MAP_CONTAINER_ID.to_string() }

            StatusLine {}

            Legend {
                title: "Ammonia (ppm)".to_string(),
                entries: concentration_legend(&DEFAULT_THRESHOLDS, &Palette::DIVERGING),
            }
        }
    }
}

//! Latest Water Quality Samples
//!
//! Circle markers sized and colored by phosphate, with year/month filters
//! built from the dates actually present and a toggleable treatments layer.
//!
//! Data flow:
//! 1. On mount: bulk-load `vw_latest_samples`, then `vw_treatments_geo`.
//! 2. Year change: recompute the month choices, no redraw.
//! 3. Apply / Reset: redraw the samples layer from all loaded rows.

use dioxus::prelude::*;
use wqm_core::classify::{concentration_legend, treatment_legend, Palette, DEFAULT_THRESHOLDS};
use wqm_core::client::RestClient;
use wqm_core::records::{SampleRecord, TreatmentRecord};
use wqm_core::RowSource;
use wqm_map_ui::components::{
    ErrorDisplay, FilterPanel, LayerToggle, Legend, MapContainer, MapHeader, StatusLine,
};
use wqm_map_ui::config::{backend_config, MapConfig, MISSING_BACKEND};
use wqm_map_ui::js_bridge;
use wqm_map_ui::leaflet::LeafletSurface;
use wqm_map_ui::state::{share, PageState, SharedSession};
use wqm_session::{SampleLayer, SampleMap};

/// DOM id for the Leaflet map container div.
const MAP_CONTAINER_ID: &str = "map";

type Session = SharedSession<SampleMap<LeafletSurface>>;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("map-samples-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(PageState::new);
    let session: Session = use_hook(|| {
        js_bridge::load_map_bridge();
        share(SampleMap::new(LeafletSurface::new(
            MAP_CONTAINER_ID,
            &MapConfig::default(),
        )))
    });
    let mut show_treatments = use_signal(|| true);

    // ─── Initial load: samples, then treatments ───
    let loader = session.clone();
    use_hook(move || {
        let Some(config) = backend_config() else {
            state.error_msg.set(Some(MISSING_BACKEND.to_string()));
            return;
        };
        let client = RestClient::new(config);
        spawn(async move {
            let query = loader.borrow_mut().begin_load();
            state.show_samples(&loader.borrow());

            let samples = client.fetch::<SampleRecord>(&query).await;
            // failures are already on the status line
            let _ = loader.borrow_mut().finish_samples(samples);
            state.show_samples(&loader.borrow());

            let treatments = client.fetch::<TreatmentRecord>(&query).await;
            let _ = loader.borrow_mut().finish_treatments(treatments);
            state.show_samples(&loader.borrow());
        });
    });

    let s = session.clone();
    let on_year = move |year: Option<i32>| {
        let mut map = s.borrow_mut();
        map.select_year(year);
        state.show_samples(&map);
    };
    let s = session.clone();
    let on_month = move |month: Option<u32>| {
        let mut map = s.borrow_mut();
        map.select_month(month);
        state.show_samples(&map);
    };
    let s = session.clone();
    let on_apply = move |_: ()| {
        let mut map = s.borrow_mut();
        let _ = map.apply_filters();
        state.show_samples(&map);
    };
    let s = session.clone();
    let on_reset = move |_: ()| {
        let mut map = s.borrow_mut();
        let _ = map.reset_filters();
        state.show_samples(&map);
    };
    let s = session.clone();
    let on_toggle = move |visible: bool| {
        show_treatments.set(visible);
        s.borrow_mut()
            .set_layer_visible(SampleLayer::Treatments, visible);
    };

    let phosphate_notes = vec![
        "PO₄ = Phosphates".to_string(),
        "NH₃ = Ammonia".to_string(),
        "NO₂ = Nitrite".to_string(),
    ];

    // ─── Render ───
    rsx! {
        div {
            style: "max-width: 1000px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            MapHeader {
                title: "Latest Water Quality Samples".to_string(),
                description: "Marker size and color follow phosphate concentration.".to_string(),
            }

            ErrorDisplay {}

            FilterPanel {
                on_year: on_year,
                on_month: on_month,
                on_apply: on_apply,
                on_reset: on_reset,
            }

            LayerToggle {
                id: "toggleTreatments".to_string(),
                label: "Show treatments".to_string(),
                checked: show_treatments(),
                on_toggle: on_toggle,
            }

            MapContainer { id: MAP_CONTAINER_ID.to_string() }

            StatusLine {}

            Legend {
                title: "Phosphate (ppm)".to_string(),
                entries: concentration_legend(&DEFAULT_THRESHOLDS, &Palette::PHOSPHATE),
                notes: phosphate_notes,
            }
            Legend {
                title: "Treatments".to_string(),
                entries: treatment_legend(),
            }
        }
    }
}

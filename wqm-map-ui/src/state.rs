//! Page state managed via Dioxus context.
//!
//! `PageState` bundles the reactive signals shared by the map components and
//! is provided with `use_context_provider`. The page session itself lives
//! outside the signal graph (it drives the map imperatively); after each
//! session step the page mirrors what the components display into here.

use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wqm_core::date::display_date;
use wqm_core::filter::{FilterSelection, MonthOption};
use wqm_core::kpi::KpiSummary;
use wqm_render::MapSurface;
use wqm_session::{KpiMap, SampleMap, Status, TimeSliderMap};

#[derive(Clone, Copy)]
pub struct PageState {
    pub status: Signal<Status>,
    /// Error message that blocks the page, e.g. a missing backend config
    pub error_msg: Signal<Option<String>>,
    pub years: Signal<Vec<i32>>,
    pub months: Signal<Vec<MonthOption>>,
    pub selection: Signal<FilterSelection>,
    /// Whether the filter box is shown at all
    pub filters_visible: Signal<bool>,
    pub dates: Signal<Vec<String>>,
    pub selected_date: Signal<String>,
    pub kpi: Signal<Option<KpiSummary>>,
    /// Slider labels, one per time step
    pub steps: Signal<Vec<String>>,
    pub step: Signal<Option<usize>>,
}

impl PageState {
    pub fn new() -> Self {
        Self {
            status: Signal::new(Status::Idle),
            error_msg: Signal::new(None),
            years: Signal::new(Vec::new()),
            months: Signal::new(Vec::new()),
            selection: Signal::new(FilterSelection::default()),
            filters_visible: Signal::new(false),
            dates: Signal::new(Vec::new()),
            selected_date: Signal::new(String::new()),
            kpi: Signal::new(None),
            steps: Signal::new(Vec::new()),
            step: Signal::new(None),
        }
    }
}

impl PageState {
    pub fn show_status(&mut self, status: &Status) {
        self.status.set(status.clone());
    }

    /// Mirror the samples session: status, filter choices, and selection.
    pub fn show_samples<M: MapSurface>(&mut self, map: &SampleMap<M>) {
        self.show_status(map.status());
        self.years.set(map.index().years());
        self.months.set(map.month_options());
        self.selection.set(map.selection());
        self.filters_visible.set(map.index().has_choices());
    }

    pub fn show_kpi<M: MapSurface>(&mut self, map: &KpiMap<M>) {
        self.show_status(map.status());
        self.dates.set(map.dates().to_vec());
        self.kpi.set(map.summary().copied());
    }

    pub fn show_slider<M: MapSurface>(&mut self, map: &TimeSliderMap<M>) {
        self.show_status(map.status());
        self.steps.set(map.steps().iter().map(display_date).collect());
        self.step.set(map.current_index());
    }
}

/// A page session shared by Dioxus handlers and bridge callbacks.
pub type SharedSession<T> = Rc<RefCell<T>>;

pub fn share<T>(session: T) -> SharedSession<T> {
    Rc::new(RefCell::new(session))
}

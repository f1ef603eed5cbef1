//! The samples page: latest samples with year/month filters plus a
//! treatments overlay that can be toggled on and off.

use crate::error::SessionError;
use crate::status::Status;
use wqm_core::filter::{apply, FilterIndex, FilterSelection, MonthOption};
use wqm_core::records::{SampleRecord, TreatmentRecord};
use wqm_core::{Query, RowSource, SourceError, View};
use wqm_render::{render_points, Layer, MapSurface, RenderSummary};

/// Which overlay a visibility toggle refers to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SampleLayer {
    Samples,
    Treatments,
}

/// Session state of the samples page: all loaded rows, the filter
/// selection, and the two layers drawn from them.
pub struct SampleMap<M: MapSurface> {
    surface: M,
    samples: Layer,
    treatments: Layer,
    rows: Vec<SampleRecord>,
    treatment_rows: Vec<TreatmentRecord>,
    index: FilterIndex,
    selection: FilterSelection,
    status: Status,
}

impl<M: MapSurface> SampleMap<M> {
    pub fn new(mut surface: M) -> Self {
        let samples = Layer::create(&mut surface, "samples");
        let treatments = Layer::create(&mut surface, "treatments");
        Self {
            surface,
            samples,
            treatments,
            rows: Vec::new(),
            treatment_rows: Vec::new(),
            index: FilterIndex::default(),
            selection: FilterSelection::default(),
            status: Status::Idle,
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn index(&self) -> &FilterIndex {
        &self.index
    }

    pub fn selection(&self) -> FilterSelection {
        self.selection
    }

    pub fn rows(&self) -> &[SampleRecord] {
        &self.rows
    }

    pub fn treatment_rows(&self) -> &[TreatmentRecord] {
        &self.treatment_rows
    }

    /// Rows passing the current selection.
    pub fn active_rows(&self) -> Vec<&SampleRecord> {
        apply(&self.rows, &self.selection)
    }

    pub fn layer(&self, which: SampleLayer) -> &Layer {
        match which {
            SampleLayer::Samples => &self.samples,
            SampleLayer::Treatments => &self.treatments,
        }
    }

    /// Month choices for the selected year.
    pub fn month_options(&self) -> Vec<MonthOption> {
        self.index.month_options(self.selection.year)
    }

    /// Start the initial load; the same bulk query serves both views.
    pub fn begin_load(&mut self) -> Query {
        self.status = Status::loading();
        Query::bulk()
    }

    /// Take the loaded samples, rebuild the filter index, and draw them all.
    ///
    /// On failure the previous rows and markers stay as they were.
    pub fn finish_samples(
        &mut self,
        result: Result<Vec<SampleRecord>, SourceError>,
    ) -> Result<RenderSummary, SessionError> {
        match result {
            Ok(rows) => {
                log::info!("loaded {} samples", rows.len());
                self.index = FilterIndex::build(&rows);
                self.rows = rows;
                self.selection = FilterSelection::default();
                self.redraw()
            }
            Err(e) => {
                log::error!("{}", e);
                self.status = Status::load_failed(View::LatestSamples);
                Err(e.into())
            }
        }
    }

    /// Take the loaded treatments and draw them on their own layer.
    pub fn finish_treatments(
        &mut self,
        result: Result<Vec<TreatmentRecord>, SourceError>,
    ) -> Result<RenderSummary, SessionError> {
        match result {
            Ok(rows) => {
                log::info!("loaded {} treatments", rows.len());
                let summary = render_points(&mut self.surface, &mut self.treatments, &rows);
                self.treatment_rows = rows;
                summary.map_err(|e| self.render_failed(e))
            }
            Err(e) => {
                log::error!("{}", e);
                self.status = Status::load_failed(View::TreatmentsGeo);
                Err(e.into())
            }
        }
    }

    /// Load samples, then treatments, one after the other.
    ///
    /// A failed samples load does not stop the treatments load.
    pub async fn load<S: RowSource>(&mut self, source: &S) -> Result<(), SessionError> {
        let query = self.begin_load();
        let samples = self.finish_samples(source.fetch(&query).await);
        let treatments = self.finish_treatments(source.fetch(&query).await);
        samples?;
        treatments?;
        Ok(())
    }

    /// Change the year; a month no longer offered for it is cleared.
    /// The map is not redrawn until the filter is applied.
    pub fn select_year(&mut self, year: Option<i32>) -> Vec<MonthOption> {
        self.selection = self.index.reconcile(FilterSelection::new(year, self.selection.month));
        self.month_options()
    }

    pub fn select_month(&mut self, month: Option<u32>) {
        self.selection = self.index.reconcile(FilterSelection::new(self.selection.year, month));
    }

    /// Redraw the samples layer from the full row set and the selection.
    pub fn apply_filters(&mut self) -> Result<RenderSummary, SessionError> {
        self.redraw()
    }

    /// Clear the selection and redraw everything.
    pub fn reset_filters(&mut self) -> Result<RenderSummary, SessionError> {
        self.selection = FilterSelection::default();
        self.redraw()
    }

    pub fn set_layer_visible(&mut self, which: SampleLayer, visible: bool) {
        let layer = match which {
            SampleLayer::Samples => &mut self.samples,
            SampleLayer::Treatments => &mut self.treatments,
        };
        layer.set_visible(&mut self.surface, visible);
    }

    fn redraw(&mut self) -> Result<RenderSummary, SessionError> {
        let active = apply(&self.rows, &self.selection);
        let count = active.len();
        match render_points(&mut self.surface, &mut self.samples, active) {
            Ok(summary) => {
                self.status = Status::plotted_sites(count);
                Ok(summary)
            }
            Err(e) => Err(self.render_failed(e)),
        }
    }

    fn render_failed(&mut self, e: wqm_render::RenderError) -> SessionError {
        log::error!("{}", e);
        self.status = Status::Failed(e.to_string());
        e.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wqm_core::source::MemorySource;
    use wqm_core::View;
    use wqm_render::surface::ShapeKind;
    use wqm_render::GeoJsonSurface;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_rows(
                View::LatestSamples,
                vec![
                    json!({"sample_location": "Dock", "sample_date": "2024-06-01",
                           "latitude": 41.3, "longitude": -96.1, "phosphates_ppm": 0.05}),
                    json!({"sample_location": "Inlet", "sample_date": "2024-06-15",
                           "latitude": null, "longitude": null, "phosphates_ppm": 0.6}),
                    json!({"sample_location": "Cove", "sample_date": "2023-08-02T10:30:00Z",
                           "latitude": 41.31, "longitude": -96.12, "phosphates_ppm": 0.3}),
                    json!({"sample_location": "Beach", "sample_date": null,
                           "latitude": 41.32, "longitude": -96.13}),
                ],
            )
            .with_rows(
                View::TreatmentsGeo,
                vec![json!({"location_name": "Dock", "treatment_date": "2024-05-01",
                            "latitude": 41.3, "longitude": -96.1, "treatment_type": "Alum"})],
            )
    }

    fn sample_count(map: &SampleMap<GeoJsonSurface>) -> usize {
        map.surface()
            .shape_count(map.layer(SampleLayer::Samples).id(), ShapeKind::Point)
    }

    #[tokio::test]
    async fn initial_load_draws_everything() {
        let src = source();
        let mut map = SampleMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();

        assert_eq!(map.status().text(), "Plotted 4 sample sites.");
        assert_eq!(sample_count(&map), 3);
        assert_eq!(map.index().years(), vec![2023, 2024]);
        let treatments = map.layer(SampleLayer::Treatments).id();
        assert_eq!(map.surface().shape_count(treatments, ShapeKind::Point), 1);

        let calls = src.calls();
        assert_eq!(calls[0].0, View::LatestSamples);
        assert_eq!(calls[1].0, View::TreatmentsGeo);
        assert_eq!(calls[0].1, Query::bulk());
    }

    #[tokio::test]
    async fn filter_then_reset_reproduces_initial_load() {
        let src = source();
        let mut map = SampleMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();

        map.select_year(Some(2024));
        map.select_month(Some(6));
        map.apply_filters().unwrap();
        assert_eq!(map.status().text(), "Plotted 2 sample sites.");
        assert_eq!(sample_count(&map), 1);

        map.reset_filters().unwrap();
        assert_eq!(map.selection(), FilterSelection::default());
        assert_eq!(sample_count(&map), 3);
        assert_eq!(map.status().text(), "Plotted 4 sample sites.");
    }

    #[tokio::test]
    async fn year_change_clears_unoffered_month_without_redraw() {
        let src = source();
        let mut map = SampleMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();

        map.select_year(Some(2024));
        map.select_month(Some(6));
        let months = map.select_year(Some(2023));
        assert_eq!(months.iter().map(|m| m.month).collect::<Vec<_>>(), vec![8]);
        assert_eq!(map.selection().month, None);
        // still showing the initial render
        assert_eq!(sample_count(&map), 3);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_layer() {
        let src = source();
        let mut map = SampleMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();

        src.set_failing(View::LatestSamples, true);
        let err = map.load(&src).await.unwrap_err();
        assert!(matches!(err, SessionError::Source(_)));
        assert_eq!(map.status(), &Status::Failed("Error loading samples.".to_string()));
        assert_eq!(sample_count(&map), 3);
        assert_eq!(map.rows().len(), 4);
    }

    #[tokio::test]
    async fn treatments_failure_is_reported() {
        let src = source();
        src.set_failing(View::TreatmentsGeo, true);
        let mut map = SampleMap::new(GeoJsonSurface::new());
        assert!(map.load(&src).await.is_err());
        assert_eq!(map.status().text(), "Error loading treatments.");
        assert_eq!(sample_count(&map), 3);
    }

    #[tokio::test]
    async fn toggling_treatments_keeps_markers() {
        let src = source();
        let mut map = SampleMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();
        let id = map.layer(SampleLayer::Treatments).id();

        map.set_layer_visible(SampleLayer::Treatments, false);
        assert!(!map.surface().is_layer_visible(id));
        assert_eq!(map.surface().shape_count(id, ShapeKind::Point), 1);
        map.set_layer_visible(SampleLayer::Treatments, true);
        assert!(map.surface().is_layer_visible(id));
    }

    #[test]
    fn undated_rows_hide_filters() {
        let mut map = SampleMap::new(GeoJsonSurface::new());
        let rows = vec![SampleRecord {
            latitude: Some(41.0),
            longitude: Some(-96.0),
            ..Default::default()
        }];
        map.finish_samples(Ok(rows)).unwrap();
        assert!(!map.index().has_choices());
        assert_eq!(sample_count(&map), 1);
    }
}

//! The time slider page: ammonia readings shown one sample date at a time.
//!
//! Each step replaces the markers with the rows of that date.

use crate::error::SessionError;
use crate::status::Status;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use wqm_core::date::Dated;
use wqm_core::records::TimeseriesRecord;
use wqm_core::{Query, RowSource, SourceError};
use wqm_render::{render_points, Layer, MapSurface, RenderSummary};

pub const TIMESERIES_COLUMNS: &str = "location_id,latitude,longitude,sample_date,ammonia_ppm";

pub struct TimeSliderMap<M: MapSurface> {
    surface: M,
    points: Layer,
    rows: Vec<TimeseriesRecord>,
    steps: Vec<NaiveDate>,
    current: Option<usize>,
    status: Status,
}

impl<M: MapSurface> TimeSliderMap<M> {
    pub fn new(mut surface: M) -> Self {
        let points = Layer::create(&mut surface, "timeseries");
        Self {
            surface,
            points,
            rows: Vec::new(),
            steps: Vec::new(),
            current: None,
            status: Status::Idle,
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }

    pub fn layer(&self) -> &Layer {
        &self.points
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Distinct sample dates, ascending.
    pub fn steps(&self) -> &[NaiveDate] {
        &self.steps
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current.and_then(|i| self.steps.get(i).copied())
    }

    /// Rows shown at the current step.
    pub fn visible_rows(&self) -> Vec<&TimeseriesRecord> {
        match self.current_date() {
            Some(date) => self.rows.iter().filter(|r| r.date() == Some(date)).collect(),
            None => Vec::new(),
        }
    }

    pub fn begin_load(&mut self) -> Query {
        self.status = Status::loading();
        Query::new().select(TIMESERIES_COLUMNS)
    }

    /// Take the full series and show its earliest date.
    pub fn finish_load(
        &mut self,
        result: Result<Vec<TimeseriesRecord>, SourceError>,
    ) -> Result<RenderSummary, SessionError> {
        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Error loading time series: {}", e);
                self.status = Status::Failed(format!("Error loading time series: {}", e));
                return Err(e.into());
            }
        };
        let steps: BTreeSet<NaiveDate> = rows.iter().filter_map(|r| r.date()).collect();
        log::info!("time series: {} rows over {} dates", rows.len(), steps.len());
        self.steps = steps.into_iter().collect();
        self.rows = rows;
        self.current = if self.steps.is_empty() { None } else { Some(0) };
        let summary = self.redraw()?;
        self.status = Status::loaded_samples(self.rows.len());
        Ok(summary)
    }

    pub async fn load<S: RowSource>(&mut self, source: &S) -> Result<RenderSummary, SessionError> {
        let query = self.begin_load();
        let result = source.fetch(&query).await;
        self.finish_load(result)
    }

    /// Show the step at `index`, clamped to the last step.
    pub fn seek(&mut self, index: usize) -> Result<RenderSummary, SessionError> {
        if self.steps.is_empty() {
            return Ok(RenderSummary::default());
        }
        self.current = Some(index.min(self.steps.len() - 1));
        self.redraw()
    }

    pub fn step_forward(&mut self) -> Result<RenderSummary, SessionError> {
        let next = self.current.map_or(0, |i| i + 1);
        self.seek(next)
    }

    pub fn step_back(&mut self) -> Result<RenderSummary, SessionError> {
        let prev = self.current.map_or(0, |i| i.saturating_sub(1));
        self.seek(prev)
    }

    pub fn first(&mut self) -> Result<RenderSummary, SessionError> {
        self.seek(0)
    }

    pub fn last(&mut self) -> Result<RenderSummary, SessionError> {
        self.seek(usize::MAX)
    }

    fn redraw(&mut self) -> Result<RenderSummary, SessionError> {
        let date = self.current_date();
        let rows = self.rows.iter().filter(|r| date.is_some() && r.date() == date);
        render_points(&mut self.surface, &mut self.points, rows).map_err(|e| {
            log::error!("{}", e);
            self.status = Status::Failed(e.to_string());
            e.into()
        })
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
        MemorySource::new().with_rows(
            View::TimeseriesNutrients,
            vec![
                json!({"location_id": 1, "latitude": 41.3, "longitude": -96.1,
                       "sample_date": "2024-06-01", "ammonia_ppm": 0.05}),
                json!({"location_id": 2, "latitude": 41.31, "longitude": -96.11,
                       "sample_date": "2024-06-01", "ammonia_ppm": 0.3}),
                json!({"location_id": 1, "latitude": 41.3, "longitude": -96.1,
                       "sample_date": "2024-05-01", "ammonia_ppm": 0.6}),
                json!({"location_id": 3, "latitude": 41.33, "longitude": -96.13,
                       "sample_date": "2024-07-01T00:00:00", "ammonia_ppm": null}),
            ],
        )
    }

    fn point_count(map: &TimeSliderMap<GeoJsonSurface>) -> usize {
        map.surface().shape_count(map.layer().id(), ShapeKind::Point)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn load_starts_at_earliest_date() {
        let src = source();
        let mut map = TimeSliderMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();
        assert_eq!(map.status().text(), "Loaded 4 samples.");
        assert_eq!(
            map.steps(),
            &[ymd(2024, 5, 1), ymd(2024, 6, 1), ymd(2024, 7, 1)]
        );
        assert_eq!(map.current_date(), Some(ymd(2024, 5, 1)));
        assert_eq!(point_count(&map), 1);
    }

    #[tokio::test]
    async fn stepping_replaces_markers() {
        let src = source();
        let mut map = TimeSliderMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();

        map.step_forward().unwrap();
        assert_eq!(point_count(&map), 2);
        map.last().unwrap();
        assert_eq!(map.current_index(), Some(2));
        assert_eq!(point_count(&map), 1);
        map.step_forward().unwrap();
        assert_eq!(map.current_index(), Some(2));
        map.first().unwrap();
        map.step_back().unwrap();
        assert_eq!(map.current_index(), Some(0));
    }

    #[tokio::test]
    async fn unknown_ammonia_uses_neutral_color() {
        let src = source();
        let mut map = TimeSliderMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();
        map.last().unwrap();
        let features = map.surface().layer_features(map.layer().id());
        let props = features[0].properties.as_ref().unwrap();
        assert_eq!(props["style"]["fillColor"], "#666666");
    }

    #[tokio::test]
    async fn failure_message_carries_cause() {
        let src = source();
        src.set_failing(View::TimeseriesNutrients, true);
        let mut map = TimeSliderMap::new(GeoJsonSurface::new());
        assert!(map.load(&src).await.is_err());
        assert!(map.status().is_error());
        assert!(map
            .status()
            .text()
            .starts_with("Error loading time series: "));
        assert!(map.status().text().contains("connection refused"));
    }
}

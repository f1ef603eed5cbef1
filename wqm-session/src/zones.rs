//! The land-cover zones page.

use crate::error::SessionError;
use crate::status::Status;
use wqm_core::records::ZoneRecord;
use wqm_core::{Query, RowSource, SourceError, View};
use wqm_render::surface::{ChartHandle, ShapeId};
use wqm_render::{ChartSurface, MapSurface, RenderSummary, ZoneLayer};

pub struct ZoneMap<M: MapSurface + ChartSurface> {
    surface: M,
    zones: ZoneLayer,
    rows: Vec<ZoneRecord>,
    status: Status,
}

impl<M: MapSurface + ChartSurface> ZoneMap<M> {
    pub fn new(mut surface: M) -> Self {
        let zones = ZoneLayer::create(&mut surface);
        Self {
            surface,
            zones,
            rows: Vec::new(),
            status: Status::Idle,
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }

    pub fn zones(&self) -> &ZoneLayer {
        &self.zones
    }

    pub fn rows(&self) -> &[ZoneRecord] {
        &self.rows
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn begin_load(&mut self) -> Query {
        self.status = Status::loading_zones();
        Query::bulk()
    }

    pub fn finish_load(
        &mut self,
        result: Result<Vec<ZoneRecord>, SourceError>,
    ) -> Result<RenderSummary, SessionError> {
        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("{}", e);
                self.status = Status::load_failed(View::ZoneLandcoverMap);
                return Err(e.into());
            }
        };
        match self.zones.render(&mut self.surface, &rows) {
            Ok(summary) => {
                self.status = Status::loaded_zones(rows.len());
                self.rows = rows;
                Ok(summary)
            }
            Err(e) => {
                log::error!("{}", e);
                self.status = Status::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn load<S: RowSource>(&mut self, source: &S) -> Result<RenderSummary, SessionError> {
        let query = self.begin_load();
        let result = source.fetch(&query).await;
        self.finish_load(result)
    }

    /// A zone popup opened on the map; draw its chart if none is alive.
    pub fn popup_opened(&mut self, shape: ShapeId) -> Option<ChartHandle> {
        self.zones.popup_opened(&mut self.surface, shape)
    }

    pub fn popup_closed(&mut self, shape: ShapeId) {
        self.zones.popup_closed(&mut self.surface, shape)
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

    fn polygon(lon: f64, lat: f64) -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[lon, lat], [lon + 0.5, lat], [lon + 0.5, lat + 0.5], [lon, lat]]]
        })
    }

    fn source() -> MemorySource {
        MemorySource::new().with_rows(
            View::ZoneLandcoverMap,
            vec![
                json!({"zone_id": 1, "zone_name": "North", "geometry": polygon(-96.5, 41.0),
                       "percent_urban": 10, "percent_ag": 70, "percent_water": 5, "percent_open": 15}),
                json!({"zone_id": 2, "zone_name": "Lake", "geometry": polygon(-96.0, 41.5),
                       "percent_water": 80}),
                json!({"zone_id": 3, "zone_name": "Unmapped", "geometry": null}),
            ],
        )
    }

    #[tokio::test]
    async fn load_draws_polygons_and_opens_first_popup() {
        let src = source();
        let mut map = ZoneMap::new(GeoJsonSurface::new());
        let summary = map.load(&src).await.unwrap();
        assert_eq!(summary.placed, 2);
        assert_eq!(
            map.status().text(),
            "Loaded 3 zones. Click a zone to view details."
        );
        let layer = map.zones().layer().id();
        assert_eq!(map.surface().shape_count(layer, ShapeKind::Polygon), 2);
        assert_eq!(map.surface().opened_popups().len(), 1);

        let features = map.surface().layer_features(layer);
        let fills: Vec<_> = features
            .iter()
            .map(|f| f.properties.as_ref().unwrap()["style"]["fillColor"].clone())
            .collect();
        assert_eq!(fills, vec![json!("#2ca02c"), json!("#17becf")]);
    }

    #[tokio::test]
    async fn popup_chart_lifecycle() {
        let src = source();
        let mut map = ZoneMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();
        let shape = map.zones().first_shape().unwrap();

        let chart = map.popup_opened(shape).unwrap();
        map.popup_opened(shape);
        assert_eq!(map.surface().charts_rendered(), 1);
        let values: Vec<f64> = map
            .surface()
            .chart_slices(chart)
            .unwrap()
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec![10.0, 70.0, 5.0, 15.0]);

        map.popup_closed(shape);
        assert_eq!(map.surface().live_charts(), 0);
    }

    #[tokio::test]
    async fn failed_load_reports_and_keeps_zones() {
        let src = source();
        let mut map = ZoneMap::new(GeoJsonSurface::new());
        map.load(&src).await.unwrap();
        src.set_failing(View::ZoneLandcoverMap, true);
        assert!(map.load(&src).await.is_err());
        assert_eq!(map.status().text(), "Error loading zones.");
        let layer = map.zones().layer().id();
        assert_eq!(map.surface().shape_count(layer, ShapeKind::Polygon), 2);
    }
}

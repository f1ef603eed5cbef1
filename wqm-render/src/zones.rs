//! Zone polygons with land-cover popups and lazily drawn donut charts.
//!
//! A zone's chart exists only while its popup is open. The host reports
//! popup open/close events through [`ZoneLayer::popup_opened`] and
//! [`ZoneLayer::popup_closed`].

use crate::layer::{Layer, RenderError};
use crate::points::RenderSummary;
use crate::popup::zone_popup;
use crate::surface::{
    Bounds, ChartHandle, ChartSlice, ChartSurface, MapSurface, PolygonStyle, ShapeId, Tooltip,
    ZoneShape,
};
use serde_json::{json, Map, Value};
use wqm_core::classify::{dominant_zone_color, LandCover};
use wqm_core::records::ZoneRecord;

pub const ZONE_STROKE: &str = "#333";
pub const ZONE_WEIGHT: f64 = 2.0;
pub const ZONE_FILL_OPACITY: f64 = 0.4;

pub fn zone_style(cover: &LandCover) -> PolygonStyle {
    PolygonStyle {
        color: ZONE_STROKE.to_string(),
        weight: ZONE_WEIGHT,
        fill_color: dominant_zone_color(cover).to_string(),
        fill_opacity: ZONE_FILL_OPACITY,
    }
}

/// Donut slices for a zone, in Urban / Ag / Water / Open order.
pub fn land_cover_slices(cover: &LandCover) -> Vec<ChartSlice> {
    cover
        .shares()
        .iter()
        .map(|(kind, value)| ChartSlice {
            label: kind.short_label().to_string(),
            value: *value,
            color: kind.color().to_string(),
        })
        .collect()
}

/// Element id of the chart canvas inside a zone's popup.
pub fn chart_target(zone: &ZoneRecord, index: usize) -> String {
    match zone.id_text() {
        Some(id) => format!("chart-{}", id),
        None => format!("chart-{}", index),
    }
}

/// Build the drawable shape for a zone, or `None` without geometry.
pub fn zone_shape(zone: &ZoneRecord, index: usize) -> Option<ZoneShape> {
    let geometry = zone.geometry.clone()?;
    let cover = zone.land_cover();
    let target = chart_target(zone, index);
    let properties = match json!({
        "zone_id": zone.zone_id,
        "zone_name": zone.zone_name,
        "percent_urban": cover.urban,
        "percent_ag": cover.agriculture,
        "percent_water": cover.water,
        "percent_open": cover.open,
        "dominant": cover.dominant().label(),
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Some(ZoneShape {
        geometry,
        style: zone_style(&cover),
        tooltip: Some(Tooltip::above(zone.display_name())),
        popup: zone_popup(zone, &cover, &target),
        chart_target: Some(target),
        properties,
    })
}

#[derive(Debug, Clone)]
struct DrawnZone {
    shape: ShapeId,
    target: String,
    slices: Vec<ChartSlice>,
    chart: Option<ChartHandle>,
}

/// The zones layer and the chart state of each drawn zone.
#[derive(Debug, Clone)]
pub struct ZoneLayer {
    layer: Layer,
    zones: Vec<DrawnZone>,
}

impl ZoneLayer {
    pub fn create<M: MapSurface + ?Sized>(surface: &mut M) -> Self {
        Self {
            layer: Layer::create(surface, "zones"),
            zones: Vec::new(),
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Shape of the first drawn zone.
    pub fn first_shape(&self) -> Option<ShapeId> {
        self.zones.first().map(|z| z.shape)
    }

    /// Number of charts currently alive.
    pub fn live_charts(&self) -> usize {
        self.zones.iter().filter(|z| z.chart.is_some()).count()
    }

    /// Replace the layer's zones with `rows`.
    ///
    /// Live charts are released first. The viewport fits the union of all
    /// polygon bounds and the first zone's popup is opened once every zone
    /// has been drawn.
    pub fn render<M>(
        &mut self,
        surface: &mut M,
        rows: &[ZoneRecord],
    ) -> Result<RenderSummary, RenderError>
    where
        M: MapSurface + ChartSurface,
    {
        self.release_all(surface);
        self.zones.clear();

        let mut drawn = Vec::new();
        let summary = self.layer.repopulate(surface, |layer, surface| {
            let mut summary = RenderSummary::default();
            for (index, zone) in rows.iter().enumerate() {
                let Some(shape) = zone_shape(zone, index) else {
                    summary.skipped += 1;
                    continue;
                };
                let id = layer.add_polygon(surface, &shape)?;
                summary.placed += 1;
                if let Some(b) = Bounds::from_geometry(&shape.geometry) {
                    summary.bounds = Some(match summary.bounds {
                        Some(acc) => acc.union(&b),
                        None => b,
                    });
                }
                drawn.push(DrawnZone {
                    shape: id,
                    target: shape.chart_target.clone().unwrap_or_default(),
                    slices: land_cover_slices(&zone.land_cover()),
                    chart: None,
                });
            }
            Ok(summary)
        })?;
        self.zones = drawn;

        if let Some(bounds) = &summary.bounds {
            surface.fit_bounds(bounds, 0);
        }
        if let Some(first) = self.first_shape() {
            surface.open_popup(first);
        }
        if summary.skipped > 0 {
            log::warn!("zones: skipped {} rows without geometry", summary.skipped);
        }
        log::info!("zones: drew {} polygons", summary.placed);
        Ok(summary)
    }

    /// Draw the zone's chart unless one is already alive for it.
    pub fn popup_opened<C: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut C,
        shape: ShapeId,
    ) -> Option<ChartHandle> {
        let zone = self.zones.iter_mut().find(|z| z.shape == shape)?;
        if let Some(live) = zone.chart {
            return Some(live);
        }
        let chart = surface.render_donut(&zone.target, &zone.slices);
        zone.chart = Some(chart);
        Some(chart)
    }

    /// Release the zone's chart, if alive.
    pub fn popup_closed<C: ChartSurface + ?Sized>(&mut self, surface: &mut C, shape: ShapeId) {
        if let Some(zone) = self.zones.iter_mut().find(|z| z.shape == shape) {
            if let Some(chart) = zone.chart.take() {
                surface.release_chart(chart);
            }
        }
    }

    fn release_all<C: ChartSurface + ?Sized>(&mut self, surface: &mut C) {
        for zone in &mut self.zones {
            if let Some(chart) = zone.chart.take() {
                surface.release_chart(chart);
            }
        }
    }

    /// Release charts and remove every polygon.
    pub fn clear<M: MapSurface + ChartSurface>(&mut self, surface: &mut M) {
        self.release_all(surface);
        self.zones.clear();
        self.layer.clear(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson_surface::GeoJsonSurface;
    use crate::surface::ShapeKind;
    use geojson::Geometry;

    fn square(lon: f64, lat: f64) -> Geometry {
        Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![lon, lat],
            vec![lon + 0.5, lat],
            vec![lon + 0.5, lat + 0.5],
            vec![lon, lat + 0.5],
            vec![lon, lat],
        ]]))
    }

    fn zone(id: i64, geometry: Option<Geometry>) -> ZoneRecord {
        ZoneRecord {
            zone_id: Some(json!(id)),
            zone_name: Some(format!("Zone {}", id)),
            geometry,
            percent_ag: Some(60.0),
            percent_urban: Some(20.0),
            ..Default::default()
        }
    }

    #[test]
    fn tied_zone_is_urban() {
        let z = ZoneRecord {
            percent_urban: Some(25.0),
            percent_ag: Some(25.0),
            percent_water: Some(25.0),
            percent_open: Some(25.0),
            geometry: Some(square(-96.25, 41.25)),
            ..Default::default()
        };
        let shape = zone_shape(&z, 0).unwrap();
        assert_eq!(shape.style.fill_color, "#1f77b4");
        assert_eq!(shape.chart_target.as_deref(), Some("chart-0"));
        assert_eq!(shape.tooltip.unwrap().text, "Zone");
    }

    #[test]
    fn render_skips_missing_geometry_and_opens_first() {
        let rows = vec![
            zone(1, Some(square(-96.25, 41.25))),
            zone(2, None),
            zone(3, Some(square(-96.5, 41.0))),
        ];
        let mut surface = GeoJsonSurface::new();
        let mut zones = ZoneLayer::create(&mut surface);
        let summary = zones.render(&mut surface, &rows).unwrap();
        assert_eq!(summary.placed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(surface.shape_count(zones.layer().id(), ShapeKind::Polygon), 2);
        assert_eq!(surface.opened_popups(), &[zones.first_shape().unwrap()]);

        let view = surface.viewport().unwrap();
        assert_eq!(view.corners(), [[41.0, -96.5], [41.75, -95.75]]);
    }

    #[test]
    fn chart_is_created_once_per_open_and_released_on_close() {
        let rows = vec![zone(7, Some(square(-96.25, 41.25)))];
        let mut surface = GeoJsonSurface::new();
        let mut zones = ZoneLayer::create(&mut surface);
        zones.render(&mut surface, &rows).unwrap();
        let shape = zones.first_shape().unwrap();

        let first = zones.popup_opened(&mut surface, shape).unwrap();
        let again = zones.popup_opened(&mut surface, shape).unwrap();
        assert_eq!(first, again);
        assert_eq!(surface.charts_rendered(), 1);
        assert_eq!(surface.live_charts(), 1);
        assert_eq!(surface.chart_target(first), Some("chart-7"));

        zones.popup_closed(&mut surface, shape);
        assert_eq!(surface.live_charts(), 0);
        assert_eq!(zones.live_charts(), 0);

        let reopened = zones.popup_opened(&mut surface, shape).unwrap();
        assert_ne!(first, reopened);
        assert_eq!(surface.charts_rendered(), 2);
    }

    #[test]
    fn rerender_releases_live_charts() {
        let rows = vec![zone(1, Some(square(-96.25, 41.25)))];
        let mut surface = GeoJsonSurface::new();
        let mut zones = ZoneLayer::create(&mut surface);
        zones.render(&mut surface, &rows).unwrap();
        let shape = zones.first_shape().unwrap();
        zones.popup_opened(&mut surface, shape);
        zones.render(&mut surface, &rows).unwrap();
        assert_eq!(surface.live_charts(), 0);
        assert_eq!(surface.shape_count(zones.layer().id(), ShapeKind::Polygon), 1);
    }

    #[test]
    fn slices_follow_priority_order() {
        let cover = zone(1, None).land_cover();
        let labels: Vec<_> = land_cover_slices(&cover).into_iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Urban", "Ag", "Water", "Open"]);
    }
}

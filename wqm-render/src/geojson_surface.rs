//! A surface that records what was drawn as GeoJSON features.
//!
//! Used by the CLI export and by tests. Each feature carries its layer name,
//! style, popup HTML, and tooltip in `properties`.

use crate::surface::{
    Bounds, ChartHandle, ChartSlice, ChartSurface, LayerId, MapSurface, PointMarker, ShapeId,
    ShapeKind, ZoneShape,
};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct DrawnShape {
    id: ShapeId,
    kind: ShapeKind,
    feature: Feature,
}

#[derive(Debug, Clone)]
struct LayerRecord {
    name: String,
    visible: bool,
    shapes: Vec<DrawnShape>,
}

#[derive(Debug, Clone)]
struct ChartRecord {
    target: String,
    slices: Vec<ChartSlice>,
}

#[derive(Debug, Default, Clone)]
pub struct GeoJsonSurface {
    layers: BTreeMap<LayerId, LayerRecord>,
    next_layer: u32,
    next_shape: u32,
    next_chart: u32,
    viewport: Option<Bounds>,
    fit_padding: u32,
    opened_popups: Vec<ShapeId>,
    charts: BTreeMap<ChartHandle, ChartRecord>,
    charts_rendered: usize,
}

fn feature_properties(
    layer: &str,
    kind: ShapeKind,
    style: Value,
    popup: &str,
    extra: &Map<String, Value>,
) -> Map<String, Value> {
    let mut props = extra.clone();
    props.insert("layer".to_string(), Value::from(layer));
    let kind = match kind {
        ShapeKind::Point => "point",
        ShapeKind::Polygon => "polygon",
    };
    props.insert("kind".to_string(), Value::from(kind));
    props.insert("style".to_string(), style);
    props.insert("popup".to_string(), Value::from(popup));
    props
}

impl GeoJsonSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, layer: LayerId, kind: ShapeKind, feature: Feature) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        match self.layers.get_mut(&layer) {
            Some(record) => record.shapes.push(DrawnShape { id, kind, feature }),
            None => log::warn!("shape drawn into unknown layer {:?}", layer),
        }
        id
    }

    pub fn is_layer_visible(&self, layer: LayerId) -> bool {
        self.layers.get(&layer).is_some_and(|l| l.visible)
    }

    pub fn layer_name(&self, layer: LayerId) -> Option<&str> {
        self.layers.get(&layer).map(|l| l.name.as_str())
    }

    /// Bounds of the last viewport fit, if any.
    pub fn viewport(&self) -> Option<Bounds> {
        self.viewport
    }

    pub fn fit_padding(&self) -> u32 {
        self.fit_padding
    }

    /// Popups opened programmatically, in order.
    pub fn opened_popups(&self) -> &[ShapeId] {
        &self.opened_popups
    }

    pub fn live_charts(&self) -> usize {
        self.charts.len()
    }

    /// Charts ever drawn, including released ones.
    pub fn charts_rendered(&self) -> usize {
        self.charts_rendered
    }

    pub fn chart_target(&self, chart: ChartHandle) -> Option<&str> {
        self.charts.get(&chart).map(|c| c.target.as_str())
    }

    pub fn chart_slices(&self, chart: ChartHandle) -> Option<&[ChartSlice]> {
        self.charts.get(&chart).map(|c| c.slices.as_slice())
    }

    /// Features of one layer, in draw order.
    pub fn layer_features(&self, layer: LayerId) -> Vec<Feature> {
        self.layers
            .get(&layer)
            .map(|l| l.shapes.iter().map(|s| s.feature.clone()).collect())
            .unwrap_or_default()
    }

    /// Every feature on visible layers, layers in creation order.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .layers
            .values()
            .filter(|l| l.visible)
            .flat_map(|l| l.shapes.iter().map(|s| s.feature.clone()))
            .collect();
        FeatureCollection {
            bbox: self.viewport.map(|b| vec![b.west, b.south, b.east, b.north]),
            features,
            foreign_members: None,
        }
    }
}

impl MapSurface for GeoJsonSurface {
    fn create_layer(&mut self, name: &str) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.layers.insert(
            id,
            LayerRecord {
                name: name.to_string(),
                visible: true,
                shapes: Vec::new(),
            },
        );
        id
    }

    fn clear_layer(&mut self, layer: LayerId) {
        if let Some(record) = self.layers.get_mut(&layer) {
            record.shapes.clear();
        }
    }

    fn add_point(&mut self, layer: LayerId, marker: &PointMarker) -> ShapeId {
        let name = self.layer_name(layer).unwrap_or_default().to_string();
        let style = serde_json::to_value(&marker.style).unwrap_or(Value::Null);
        let properties = feature_properties(
            &name,
            ShapeKind::Point,
            style,
            &marker.popup,
            &marker.properties,
        );
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::Point(vec![marker.lon, marker.lat]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };
        self.record(layer, ShapeKind::Point, feature)
    }

    fn add_polygon(&mut self, layer: LayerId, zone: &ZoneShape) -> ShapeId {
        let name = self.layer_name(layer).unwrap_or_default().to_string();
        let style = serde_json::to_value(&zone.style).unwrap_or(Value::Null);
        let mut properties = feature_properties(
            &name,
            ShapeKind::Polygon,
            style,
            &zone.popup,
            &zone.properties,
        );
        if let Some(tooltip) = &zone.tooltip {
            properties.insert("tooltip".to_string(), Value::from(tooltip.text.as_str()));
        }
        let feature = Feature {
            bbox: None,
            geometry: Some(zone.geometry.clone()),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };
        self.record(layer, ShapeKind::Polygon, feature)
    }

    fn set_layer_visible(&mut self, layer: LayerId, visible: bool) {
        if let Some(record) = self.layers.get_mut(&layer) {
            record.visible = visible;
        }
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: u32) {
        self.viewport = Some(*bounds);
        self.fit_padding = padding;
    }

    fn open_popup(&mut self, shape: ShapeId) {
        self.opened_popups.push(shape);
    }

    fn shape_count(&self, layer: LayerId, kind: ShapeKind) -> usize {
        self.layers
            .get(&layer)
            .map(|l| l.shapes.iter().filter(|s| s.kind == kind).count())
            .unwrap_or(0)
    }
}

impl ChartSurface for GeoJsonSurface {
    fn render_donut(&mut self, target: &str, slices: &[ChartSlice]) -> ChartHandle {
        let handle = ChartHandle(self.next_chart);
        self.next_chart += 1;
        self.charts_rendered += 1;
        self.charts.insert(
            handle,
            ChartRecord {
                target: target.to_string(),
                slices: slices.to_vec(),
            },
        );
        handle
    }

    fn release_chart(&mut self, chart: ChartHandle) {
        self.charts.remove(&chart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PointStyle;

    fn marker() -> PointMarker {
        PointMarker {
            lat: 41.25,
            lon: -96.5,
            style: PointStyle::solid("#f1c40f", 5.0),
            popup: "<b>Dock</b>".to_string(),
            properties: Map::new(),
        }
    }

    #[test]
    fn point_feature_is_lon_lat() {
        let mut surface = GeoJsonSurface::new();
        let layer = surface.create_layer("samples");
        surface.add_point(layer, &marker());
        let features = surface.layer_features(layer);
        let geometry = features[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, GeoValue::Point(vec![-96.5, 41.25]));
        let props = features[0].properties.as_ref().unwrap();
        assert_eq!(props["layer"], "samples");
        assert_eq!(props["popup"], "<b>Dock</b>");
        assert_eq!(props["style"]["radius"], 5.0);
    }

    #[test]
    fn hidden_layers_are_left_out_of_export() {
        let mut surface = GeoJsonSurface::new();
        let samples = surface.create_layer("samples");
        let treatments = surface.create_layer("treatments");
        surface.add_point(samples, &marker());
        surface.add_point(treatments, &marker());
        surface.set_layer_visible(treatments, false);
        assert_eq!(surface.to_feature_collection().features.len(), 1);
        assert_eq!(surface.shape_count(treatments, ShapeKind::Point), 1);
    }

    #[test]
    fn clear_only_touches_one_layer() {
        let mut surface = GeoJsonSurface::new();
        let a = surface.create_layer("a");
        let b = surface.create_layer("b");
        surface.add_point(a, &marker());
        surface.add_point(b, &marker());
        surface.clear_layer(a);
        assert_eq!(surface.shape_count(a, ShapeKind::Point), 0);
        assert_eq!(surface.shape_count(b, ShapeKind::Point), 1);
    }
}

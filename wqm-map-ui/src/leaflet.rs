//! `MapSurface` and `ChartSurface` over Leaflet and Chart.js.
//!
//! Handles are assigned here and passed to the bridge, so no call waits on
//! a value coming back from JS. Shape counts are tracked on the Rust side.

use crate::config::MapConfig;
use crate::js_bridge;
use serde_json::json;
use std::collections::HashMap;
use wqm_render::surface::{
    Bounds, ChartHandle, ChartSlice, ChartSurface, LayerId, MapSurface, PointMarker, ShapeId,
    ShapeKind, ZoneShape,
};

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Debug, Default)]
pub struct LeafletSurface {
    next_layer: u32,
    next_shape: u32,
    next_chart: u32,
    counts: HashMap<(LayerId, ShapeKind), usize>,
}

impl LeafletSurface {
    /// Create the Leaflet map inside the element `container`.
    ///
    /// The map appears once Leaflet has loaded and the element is mounted;
    /// commands issued before then are queued by the bridge.
    pub fn new(container: &str, config: &MapConfig) -> Self {
        js_bridge::send(&json!({
            "op": "init",
            "container": container,
            "center": [config.center_lat, config.center_lon],
            "zoom": config.zoom,
            "tiles": TILE_URL,
        }));
        Self::default()
    }
}

impl MapSurface for LeafletSurface {
    fn create_layer(&mut self, name: &str) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        log::debug!("creating layer {} as {:?}", name, id);
        js_bridge::send(&json!({ "op": "createLayer", "layer": id.0 }));
        id
    }

    fn clear_layer(&mut self, layer: LayerId) {
        self.counts.retain(|(l, _), _| *l != layer);
        js_bridge::send(&json!({ "op": "clearLayer", "layer": layer.0 }));
    }

    fn add_point(&mut self, layer: LayerId, marker: &PointMarker) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        *self.counts.entry((layer, ShapeKind::Point)).or_default() += 1;
        js_bridge::send(&json!({
            "op": "addPoint",
            "layer": layer.0,
            "shape": id.0,
            "lat": marker.lat,
            "lon": marker.lon,
            "style": marker.style,
            "popup": marker.popup,
        }));
        id
    }

    fn add_polygon(&mut self, layer: LayerId, zone: &ZoneShape) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        *self.counts.entry((layer, ShapeKind::Polygon)).or_default() += 1;
        js_bridge::send(&json!({
            "op": "addPolygon",
            "layer": layer.0,
            "shape": id.0,
            "geometry": zone.geometry,
            "style": zone.style,
            "tooltip": zone.tooltip,
            "popup": zone.popup,
        }));
        id
    }

    fn set_layer_visible(&mut self, layer: LayerId, visible: bool) {
        js_bridge::send(&json!({ "op": "setVisible", "layer": layer.0, "visible": visible }));
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: u32) {
        js_bridge::send(&json!({
            "op": "fitBounds",
            "bounds": bounds.corners(),
            "padding": padding,
        }));
    }

    fn open_popup(&mut self, shape: ShapeId) {
        js_bridge::send(&json!({ "op": "openPopup", "shape": shape.0 }));
    }

    fn shape_count(&self, layer: LayerId, kind: ShapeKind) -> usize {
        self.counts.get(&(layer, kind)).copied().unwrap_or(0)
    }
}

impl ChartSurface for LeafletSurface {
    fn render_donut(&mut self, target: &str, slices: &[ChartSlice]) -> ChartHandle {
        let id = ChartHandle(self.next_chart);
        self.next_chart += 1;
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        let values: Vec<f64> = slices.iter().map(|s| s.value).collect();
        let colors: Vec<&str> = slices.iter().map(|s| s.color.as_str()).collect();
        js_bridge::send(&json!({
            "op": "donut",
            "chart": id.0,
            "target": target,
            "labels": labels,
            "values": values,
            "colors": colors,
        }));
        id
    }

    fn release_chart(&mut self, chart: ChartHandle) {
        js_bridge::send(&json!({ "op": "releaseChart", "chart": chart.0 }));
    }
}

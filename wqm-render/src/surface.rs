//! Drawing surfaces the pipeline renders onto.
//!
//! [`MapSurface`] is the map library seen as an opaque drawing target:
//! named layer groups holding styled points and polygons with popups.
//! [`ChartSurface`] renders a donut chart into a caller-provided target.

use geojson::{Geometry, Value};
use serde::Serialize;

/// Handle to a layer group on a surface.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId(pub u32);

/// Handle to one drawn shape.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize)]
pub struct ShapeId(pub u32);

/// Handle to a live chart instance.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize)]
pub struct ChartHandle(pub u32);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum ShapeKind {
    Point,
    Polygon,
}

/// Circle marker style, in the map library's option names.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointStyle {
    pub radius: f64,
    /// Stroke color
    pub color: String,
    pub fill_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl PointStyle {
    /// Stroke and fill in the same color.
    pub fn solid(color: &str, radius: f64) -> Self {
        Self {
            radius,
            color: color.to_string(),
            fill_color: color.to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.7,
        }
    }

    /// Colored fill with a thin black outline.
    pub fn outlined(fill: &str, radius: f64) -> Self {
        Self {
            radius,
            color: "#000".to_string(),
            fill_color: fill.to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// Polygon style, in the map library's option names.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonStyle {
    pub color: String,
    pub weight: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
}

/// Hover label bound to a shape.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub direction: &'static str,
    pub permanent: bool,
}

impl Tooltip {
    pub fn above(text: &str) -> Self {
        Self {
            text: text.to_string(),
            direction: "top",
            permanent: false,
        }
    }
}

/// A styled point with popup HTML.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct PointMarker {
    pub lat: f64,
    pub lon: f64,
    pub style: PointStyle,
    pub popup: String,
    /// Extra feature attributes carried into exports.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// A styled polygon with tooltip, popup HTML, and an optional chart target
/// element id inside the popup.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ZoneShape {
    pub geometry: Geometry,
    pub style: PolygonStyle,
    pub tooltip: Option<Tooltip>,
    pub popup: String,
    pub chart_target: Option<String>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// One labeled value of a proportional chart.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

/// Geographic bounding box in degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn point(lat: f64, lon: f64) -> Self {
        Self {
            south: lat,
            west: lon,
            north: lat,
            east: lon,
        }
    }

    pub fn extend(&mut self, lat: f64, lon: f64) {
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
        self.west = self.west.min(lon);
        self.east = self.east.max(lon);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut b = *self;
        b.extend(other.south, other.west);
        b.extend(other.north, other.east);
        b
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Smallest box holding every `(lat, lon)`; `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for (lat, lon) in points {
            match bounds.as_mut() {
                Some(b) => b.extend(lat, lon),
                None => bounds = Some(Bounds::point(lat, lon)),
            }
        }
        bounds
    }

    /// Box around every position of a GeoJSON geometry.
    pub fn from_geometry(geometry: &Geometry) -> Option<Bounds> {
        let mut points = Vec::new();
        collect_positions(&geometry.value, &mut points);
        Bounds::from_points(points)
    }

    /// `[[south, west], [north, east]]`, the map library's bounds shape.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}

fn push_position(position: &[f64], out: &mut Vec<(f64, f64)>) {
    // GeoJSON positions are [lon, lat, ...]
    if let [lon, lat, ..] = position {
        if lat.is_finite() && lon.is_finite() {
            out.push((*lat, *lon));
        }
    }
}

fn collect_positions(value: &Value, out: &mut Vec<(f64, f64)>) {
    match value {
        Value::Point(p) => push_position(p, out),
        Value::MultiPoint(ps) | Value::LineString(ps) => {
            ps.iter().for_each(|p| push_position(p, out))
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => lines
            .iter()
            .flatten()
            .for_each(|p| push_position(p, out)),
        Value::MultiPolygon(polys) => polys
            .iter()
            .flatten()
            .flatten()
            .for_each(|p| push_position(p, out)),
        Value::GeometryCollection(geoms) => geoms
            .iter()
            .for_each(|g| collect_positions(&g.value, out)),
    }
}

/// A map library seen as a drawing target.
pub trait MapSurface {
    /// Create an empty, visible layer group.
    fn create_layer(&mut self, name: &str) -> LayerId;

    /// Remove every shape from a layer group.
    fn clear_layer(&mut self, layer: LayerId);

    fn add_point(&mut self, layer: LayerId, marker: &PointMarker) -> ShapeId;

    fn add_polygon(&mut self, layer: LayerId, zone: &ZoneShape) -> ShapeId;

    /// Add or remove a whole layer group from the map without touching its shapes.
    fn set_layer_visible(&mut self, layer: LayerId, visible: bool);

    fn fit_bounds(&mut self, bounds: &Bounds, padding: u32);

    fn open_popup(&mut self, shape: ShapeId);

    /// Number of shapes of `kind` currently in `layer`.
    fn shape_count(&self, layer: LayerId, kind: ShapeKind) -> usize;
}

/// A charting library seen as a drawing target.
pub trait ChartSurface {
    /// Draw a donut chart into the element `target`.
    fn render_donut(&mut self, target: &str, slices: &[ChartSlice]) -> ChartHandle;

    fn release_chart(&mut self, chart: ChartHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_from_points() {
        assert_eq!(Bounds::from_points(Vec::new()), None);
        let b = Bounds::from_points(vec![(41.3, -96.1), (41.2, -96.3), (41.35, -96.2)]).unwrap();
        assert_eq!(b.south, 41.2);
        assert_eq!(b.north, 41.35);
        assert_eq!(b.west, -96.3);
        assert_eq!(b.east, -96.1);
        assert!(b.contains(41.3, -96.2));
        assert!(!b.contains(42.0, -96.2));
    }

    #[test]
    fn bounds_from_multipolygon_reads_lon_lat() {
        let geometry = Geometry::new(Value::MultiPolygon(vec![
            vec![vec![vec![-96.2, 41.3], vec![-96.1, 41.3], vec![-96.1, 41.4]]],
            vec![vec![vec![-96.5, 41.0], vec![-96.4, 41.1]]],
        ]));
        let b = Bounds::from_geometry(&geometry).unwrap();
        assert_eq!(b.corners(), [[41.0, -96.5], [41.4, -96.1]]);
    }

    #[test]
    fn union_covers_both() {
        let a = Bounds::point(1.0, 1.0);
        let b = Bounds::point(-1.0, 3.0);
        let u = a.union(&b);
        assert!(u.contains(1.0, 1.0) && u.contains(-1.0, 3.0));
    }
}

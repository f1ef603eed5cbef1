//! Point pipeline: rows with coordinates become styled circle markers.

use crate::layer::{Layer, RenderError};
use crate::popup;
use crate::surface::{Bounds, MapSurface, PointMarker, PointStyle};
use serde::Serialize;
use serde_json::{json, Map, Value};
use wqm_core::classify::{
    concentration_color, phosphate_color, treatment_category_color, Palette, DEFAULT_THRESHOLDS,
};
use wqm_core::records::{KpiSample, Located, SampleRecord, TimeseriesRecord, TreatmentRecord};

/// Viewport padding in pixels when fitting to markers.
pub const FIT_PADDING: u32 = 20;

/// Fixed radius for KPI and time-series markers.
pub const FIXED_RADIUS: f64 = 8.0;

/// Sample marker radius: phosphate × 20, clamped to 4..=12; missing counts as 0.
pub fn sample_radius(phosphates_ppm: Option<f64>) -> f64 {
    let scaled = phosphates_ppm.filter(|v| v.is_finite()).unwrap_or(0.0) * 20.0;
    scaled.clamp(4.0, 12.0)
}

/// A row that can be drawn as a point marker.
pub trait ToMarker: Located {
    fn style(&self) -> PointStyle;
    fn popup(&self) -> String;

    fn properties(&self) -> Map<String, Value> {
        Map::new()
    }

    /// The marker, or `None` when either coordinate is missing.
    fn to_marker(&self) -> Option<PointMarker> {
        let (lat, lon) = self.coordinates()?;
        Some(PointMarker {
            lat,
            lon,
            style: self.style(),
            popup: self.popup(),
            properties: self.properties(),
        })
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl ToMarker for SampleRecord {
    fn style(&self) -> PointStyle {
        PointStyle::solid(
            phosphate_color(self.phosphates_ppm),
            sample_radius(self.phosphates_ppm),
        )
    }

    fn popup(&self) -> String {
        popup::sample_popup(self)
    }

    fn properties(&self) -> Map<String, Value> {
        object(json!({
            "sample_location": self.sample_location,
            "sample_date": self.sample_date,
            "phosphates_ppm": self.phosphates_ppm,
            "ammonia_ppm": self.ammonia_ppm,
            "nitrites_ppm": self.nitrites_ppm,
            "ph": self.ph,
        }))
    }
}

impl ToMarker for TreatmentRecord {
    fn style(&self) -> PointStyle {
        PointStyle::outlined(
            treatment_category_color(self.treatment_type.as_deref()),
            FIXED_RADIUS,
        )
    }

    fn popup(&self) -> String {
        popup::treatment_popup(self)
    }

    fn properties(&self) -> Map<String, Value> {
        object(json!({
            "location_name": self.location_name,
            "treatment_date": self.treatment_date,
            "treatment_type": self.treatment_type,
            "product_name": self.product_name,
            "dose_amount": self.dose_amount,
            "dose_unit": self.dose_unit,
        }))
    }
}

impl ToMarker for KpiSample {
    fn style(&self) -> PointStyle {
        PointStyle::outlined(
            concentration_color(self.ammonia_ppm, &DEFAULT_THRESHOLDS, &Palette::NAMED),
            FIXED_RADIUS,
        )
    }

    fn popup(&self) -> String {
        popup::kpi_popup(self)
    }

    fn properties(&self) -> Map<String, Value> {
        object(json!({
            "sample_date": self.sample_date,
            "ammonia_ppm": self.ammonia_ppm,
            "phosphates_ppm": self.phosphates_ppm,
            "nitrites_ppm": self.nitrites_ppm,
        }))
    }
}

impl ToMarker for TimeseriesRecord {
    fn style(&self) -> PointStyle {
        PointStyle::outlined(
            concentration_color(self.ammonia_ppm, &DEFAULT_THRESHOLDS, &Palette::DIVERGING),
            FIXED_RADIUS,
        )
    }

    fn popup(&self) -> String {
        popup::timeseries_popup(self)
    }

    fn properties(&self) -> Map<String, Value> {
        object(json!({
            "location_id": self.location_id,
            "time": self.sample_date,
            "ammonia": self.ammonia_ppm,
        }))
    }
}

/// Outcome of one render pass.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize)]
pub struct RenderSummary {
    /// Shapes drawn.
    pub placed: usize,
    /// Rows dropped for missing coordinates or geometry.
    pub skipped: usize,
    /// Viewport applied, if any shape was drawn.
    pub bounds: Option<Bounds>,
}

/// Clear `layer`, draw one marker per located row, and fit the viewport.
///
/// Rows without both coordinates are skipped silently. The viewport is left
/// alone when nothing was placed.
pub fn render_points<'a, M, R, I>(
    surface: &mut M,
    layer: &mut Layer,
    rows: I,
) -> Result<RenderSummary, RenderError>
where
    M: MapSurface + ?Sized,
    R: ToMarker + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let summary = layer.repopulate(surface, |layer, surface| {
        let mut summary = RenderSummary::default();
        for row in rows {
            match row.to_marker() {
                Some(marker) => {
                    layer.add_point(surface, &marker)?;
                    summary.placed += 1;
                    summary.bounds = Some(match summary.bounds {
                        Some(mut b) => {
                            b.extend(marker.lat, marker.lon);
                            b
                        }
                        None => Bounds::point(marker.lat, marker.lon),
                    });
                }
                None => summary.skipped += 1,
            }
        }
        Ok(summary)
    })?;

    if let Some(bounds) = &summary.bounds {
        surface.fit_bounds(bounds, FIT_PADDING);
    }
    if summary.skipped > 0 {
        log::warn!(
            "{}: skipped {} rows without coordinates",
            layer.name(),
            summary.skipped
        );
    }
    log::info!("{}: placed {} markers", layer.name(), summary.placed);
    Ok(summary)
}

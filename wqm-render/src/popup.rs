//! Popup HTML for each record type.
//!
//! Missing numeric fields display as an em-dash; zone percentages display
//! as 0.

use wqm_core::classify::LandCover;
use wqm_core::date::{display_date, Dated};
use wqm_core::records::{KpiSample, SampleRecord, TimeseriesRecord, TreatmentRecord, ZoneRecord};

/// Placeholder for a missing value.
pub const MISSING: &str = "—";

pub fn value_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn text_or_dash(value: Option<&str>) -> &str {
    value.filter(|s| !s.trim().is_empty()).unwrap_or(MISSING)
}

/// Popup date: parsed dates are formatted, unparseable text shown as-is.
fn date_text<R: Dated>(row: &R) -> String {
    match (row.date(), row.raw_date()) {
        (Some(d), _) => display_date(&d),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => String::new(),
    }
}

pub fn sample_popup(row: &SampleRecord) -> String {
    format!(
        "<b>{}</b><br/>\
         <small>{}</small><br/>\
         Phosphates (PO₄): {} ppm<br/>\
         Ammonia (NH₃): {} ppm<br/>\
         Nitrite (NO₂): {} ppm<br/>\
         pH: {}",
        row.sample_location.as_deref().unwrap_or("Site"),
        date_text(row),
        value_or_dash(row.phosphates_ppm),
        value_or_dash(row.ammonia_ppm),
        value_or_dash(row.nitrites_ppm),
        value_or_dash(row.ph),
    )
}

pub fn treatment_popup(row: &TreatmentRecord) -> String {
    let dose = match (row.dose_amount, row.dose_unit.as_deref()) {
        (Some(amount), Some(unit)) => format!("{} {}", amount, unit),
        (Some(amount), None) => amount.to_string(),
        (None, _) => MISSING.to_string(),
    };
    format!(
        "<b>{}</b><br/>\
         <small>{}</small><br/>\
         Treatment: {}<br/>\
         Product: {}<br/>\
         Dose: {}",
        row.location_name.as_deref().unwrap_or("Site"),
        date_text(row),
        text_or_dash(row.treatment_type.as_deref()),
        text_or_dash(row.product_name.as_deref()),
        dose,
    )
}

pub fn kpi_popup(row: &KpiSample) -> String {
    format!(
        "<b>Date:</b> {}<br>\
         <b>Ammonia:</b> {} ppm<br>\
         <b>Phosphate:</b> {} ppm<br>\
         <b>Nitrite:</b> {} ppm",
        text_or_dash(row.sample_date.as_deref()),
        value_or_dash(row.ammonia_ppm),
        value_or_dash(row.phosphates_ppm),
        value_or_dash(row.nitrites_ppm),
    )
}

pub fn timeseries_popup(row: &TimeseriesRecord) -> String {
    format!(
        "<b>Location:</b> {}<br/>\
         <b>Date:</b> {}<br/>\
         <b>Ammonia:</b> {} ppm",
        row.location_text().as_deref().unwrap_or(MISSING),
        date_text(row),
        value_or_dash(row.ammonia_ppm),
    )
}

/// Zone popup with raw shares and a canvas the donut chart draws into.
pub fn zone_popup(zone: &ZoneRecord, cover: &LandCover, chart_target: &str) -> String {
    format!(
        "<b>{}</b><br/>\
         Urban: {}%<br/>\
         Ag: {}%<br/>\
         Water: {}%<br/>\
         Open: {}%<br/>\
         <canvas id=\"{}\" width=\"120\" height=\"120\"></canvas>",
        zone.display_name(),
        cover.urban,
        cover.agriculture,
        cover.water,
        cover.open,
        chart_target,
    )
}

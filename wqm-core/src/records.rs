//! Declared row schemas, one per backend view.
//!
//! Every field is optional: the views are not guaranteed to populate any
//! column, and absence must never fail deserialization. Unknown columns are
//! ignored.

use crate::classify::LandCover;
use crate::date::Dated;
use crate::views::View;
use serde::{Deserialize, Serialize};

/// A row type tied to the view it is read from.
pub trait ViewRecord: serde::de::DeserializeOwned {
    const VIEW: View;
}

/// A row that may carry a map coordinate.
pub trait Located {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;

    /// `(lat, lon)` when both halves are present and finite.
    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude(), self.longitude()) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Latest chemistry reading at a sampling site (`vw_latest_samples`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleRecord {
    pub location_id: Option<String>,
    pub sample_location: Option<String>,
    pub sample_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Phosphates (PO₄) in ppm
    pub phosphates_ppm: Option<f64>,
    /// Ammonia (NH₃) in ppm
    pub ammonia_ppm: Option<f64>,
    /// Nitrite (NO₂) in ppm
    pub nitrites_ppm: Option<f64>,
    pub ph: Option<f64>,
}

/// A remediation treatment applied at a site (`vw_treatments_geo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentRecord {
    pub location_name: Option<String>,
    pub treatment_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Free-text category, classified by keyword.
    pub treatment_type: Option<String>,
    pub product_name: Option<String>,
    pub dose_amount: Option<f64>,
    pub dose_unit: Option<String>,
}

/// A land-cover zone polygon (`vw_zone_landcover_map`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneRecord {
    pub zone_id: Option<serde_json::Value>,
    pub zone_name: Option<String>,
    pub geometry: Option<geojson::Geometry>,
    pub percent_urban: Option<f64>,
    pub percent_ag: Option<f64>,
    pub percent_water: Option<f64>,
    pub percent_open: Option<f64>,
}

/// One ammonia reading in the nutrient time series (`vw_timeseries_nutrients`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeseriesRecord {
    pub location_id: Option<serde_json::Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sample_date: Option<String>,
    pub ammonia_ppm: Option<f64>,
}

/// Per-site chemistry for the KPI page (`vw_kpi_samples`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSample {
    pub sample_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ammonia_ppm: Option<f64>,
    pub phosphates_ppm: Option<f64>,
    pub nitrites_ppm: Option<f64>,
}

/// Only the date column, for building the KPI date dropdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleDateRow {
    pub sample_date: Option<String>,
}

impl ZoneRecord {
    /// The four land-cover shares, missing values as 0.
    pub fn land_cover(&self) -> LandCover {
        LandCover {
            urban: self.percent_urban.unwrap_or(0.0),
            agriculture: self.percent_ag.unwrap_or(0.0),
            water: self.percent_water.unwrap_or(0.0),
            open: self.percent_open.unwrap_or(0.0),
        }
    }

    pub fn display_name(&self) -> &str {
        self.zone_name.as_deref().unwrap_or("Zone")
    }

    /// The zone id as text; numeric and string ids both occur.
    pub fn id_text(&self) -> Option<String> {
        self.zone_id.as_ref().map(json_scalar_text)
    }
}

impl TimeseriesRecord {
    pub fn location_text(&self) -> Option<String> {
        self.location_id.as_ref().map(json_scalar_text)
    }
}

fn json_scalar_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

macro_rules! view_record {
    ($ty:ty, $view:expr) => {
        impl ViewRecord for $ty {
            const VIEW: View = $view;
        }
    };
}

view_record!(SampleRecord, View::LatestSamples);
view_record!(TreatmentRecord, View::TreatmentsGeo);
view_record!(ZoneRecord, View::ZoneLandcoverMap);
view_record!(TimeseriesRecord, View::TimeseriesNutrients);
view_record!(KpiSample, View::KpiSamples);

macro_rules! located {
    ($($ty:ty),*) => {
        $(impl Located for $ty {
            fn latitude(&self) -> Option<f64> {
                self.latitude
            }
            fn longitude(&self) -> Option<f64> {
                self.longitude
            }
        })*
    };
}

located!(SampleRecord, TreatmentRecord, TimeseriesRecord, KpiSample);

impl Dated for SampleRecord {
    fn raw_date(&self) -> Option<&str> {
        self.sample_date.as_deref()
    }
}

impl Dated for TreatmentRecord {
    fn raw_date(&self) -> Option<&str> {
        self.treatment_date.as_deref()
    }
}

impl Dated for TimeseriesRecord {
    fn raw_date(&self) -> Option<&str> {
        self.sample_date.as_deref()
    }
}

impl Dated for KpiSample {
    fn raw_date(&self) -> Option<&str> {
        self.sample_date.as_deref()
    }
}

impl Dated for SampleDateRow {
    fn raw_date(&self) -> Option<&str> {
        self.sample_date.as_deref()
    }
}

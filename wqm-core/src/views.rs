//! Backend views the map pages read from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A read-only named backend query target.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum View {
    /// Most recent sample per site.
    LatestSamples,
    /// Remediation treatments joined with site coordinates.
    TreatmentsGeo,
    /// Zone polygons with land-cover percentages.
    ZoneLandcoverMap,
    /// Ammonia readings per location and date.
    TimeseriesNutrients,
    /// Per-site chemistry used by the KPI page.
    KpiSamples,
}

impl View {
    pub const ALL: [View; 5] = [
        View::LatestSamples,
        View::TreatmentsGeo,
        View::ZoneLandcoverMap,
        View::TimeseriesNutrients,
        View::KpiSamples,
    ];

    /// The view name as exposed by the REST API.
    pub fn table_name(&self) -> &'static str {
        match self {
            View::LatestSamples => "vw_latest_samples",
            View::TreatmentsGeo => "vw_treatments_geo",
            View::ZoneLandcoverMap => "vw_zone_landcover_map",
            View::TimeseriesNutrients => "vw_timeseries_nutrients",
            View::KpiSamples => "vw_kpi_samples",
        }
    }

    /// Noun used in status messages ("Error loading samples.").
    pub fn noun(&self) -> &'static str {
        match self {
            View::LatestSamples => "samples",
            View::TreatmentsGeo => "treatments",
            View::ZoneLandcoverMap => "zones",
            View::TimeseriesNutrients => "time series",
            View::KpiSamples => "KPI samples",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::View;
    use std::collections::HashSet;

    #[test]
    fn table_names_are_distinct() {
        let names: HashSet<&str> = View::ALL.iter().map(|v| v.table_name()).collect();
        assert_eq!(names.len(), View::ALL.len());
        assert!(names.iter().all(|n| n.starts_with("vw_")));
    }
}

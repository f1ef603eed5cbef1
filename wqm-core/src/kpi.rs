//! Per-date averages shown in the KPI panel.

use crate::records::KpiSample;
use serde::Serialize;

/// Mean phosphate/ammonia/nitrite over the rows of one sample date.
///
/// Each mean covers only rows that report that chemical; a chemical with no
/// readings is `None` and displays as "-".
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize)]
pub struct KpiSummary {
    pub phosphate: Option<f64>,
    pub ammonia: Option<f64>,
    pub nitrite: Option<f64>,
    pub sites: usize,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl KpiSummary {
    pub fn from_samples(rows: &[KpiSample]) -> Self {
        Self {
            phosphate: mean(rows.iter().filter_map(|r| r.phosphates_ppm)),
            ammonia: mean(rows.iter().filter_map(|r| r.ammonia_ppm)),
            nitrite: mean(rows.iter().filter_map(|r| r.nitrites_ppm)),
            sites: rows.len(),
        }
    }

    /// Two-decimal text for a KPI tile.
    pub fn format(value: Option<f64>) -> String {
        value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(p: Option<f64>, a: Option<f64>, n: Option<f64>) -> KpiSample {
        KpiSample {
            phosphates_ppm: p,
            ammonia_ppm: a,
            nitrites_ppm: n,
            ..Default::default()
        }
    }

    #[test]
    fn averages_skip_missing_values() {
        let rows = vec![
            sample(Some(0.2), Some(0.1), None),
            sample(Some(0.4), None, None),
            sample(None, Some(0.3), None),
        ];
        let kpi = KpiSummary::from_samples(&rows);
        assert_eq!(KpiSummary::format(kpi.phosphate), "0.30");
        assert_eq!(KpiSummary::format(kpi.ammonia), "0.20");
        assert_eq!(kpi.nitrite, None);
        assert_eq!(KpiSummary::format(kpi.nitrite), "-");
        assert_eq!(kpi.sites, 3);
    }

    #[test]
    fn empty_date_shows_dashes() {
        let kpi = KpiSummary::from_samples(&[]);
        assert_eq!(kpi, KpiSummary::default());
        assert_eq!(KpiSummary::format(kpi.phosphate), "-");
    }
}

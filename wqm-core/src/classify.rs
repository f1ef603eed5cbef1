//! Color rules for markers and zones.
//!
//! Three independent classifiers:
//! - concentration thresholds (phosphate, ammonia) → severity → palette color
//! - treatment category keywords → category color
//! - dominant land-cover share → land-cover color
//!
//! All of them are total: missing input yields a defined color, never a panic.

use serde::Serialize;

/// Neutral color for a missing measurement.
pub const UNKNOWN_COLOR: &str = "#666666";

/// Default concentration cut points in ppm.
pub const DEFAULT_THRESHOLDS: Thresholds = Thresholds([0.1, 0.25, 0.5]);

/// Severity bucket of a concentration reading.
///
/// Buckets are left-closed/right-open: a value equal to a cut point belongs
/// to the bucket above it.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Unknown,
    Low,
    Moderate,
    Elevated,
    High,
}

impl Severity {
    pub const MEASURED: [Severity; 4] = [
        Severity::Low,
        Severity::Moderate,
        Severity::Elevated,
        Severity::High,
    ];
}

/// Three ascending cut points splitting readings into four severities.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Thresholds(pub [f64; 3]);

impl Default for Thresholds {
    fn default() -> Self {
        DEFAULT_THRESHOLDS
    }
}

impl Thresholds {
    pub fn classify(&self, value: Option<f64>) -> Severity {
        let [low, mid, high] = self.0;
        match value {
            None => Severity::Unknown,
            Some(v) if v.is_nan() => Severity::Unknown,
            Some(v) if v < low => Severity::Low,
            Some(v) if v < mid => Severity::Moderate,
            Some(v) if v < high => Severity::Elevated,
            Some(_) => Severity::High,
        }
    }

    /// Legend labels for the four measured buckets, low to high.
    pub fn labels(&self) -> [String; 4] {
        let [low, mid, high] = self.0;
        [
            format!("<{}", low),
            format!("{} – {}", low, mid),
            format!("{} – {}", mid, high),
            format!(">{}", high),
        ]
    }
}

/// Colors for each severity bucket.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Palette {
    pub unknown: &'static str,
    /// Low → high severity.
    pub measured: [&'static str; 4],
}

impl Palette {
    /// Samples page palette.
    pub const PHOSPHATE: Palette = Palette {
        unknown: UNKNOWN_COLOR,
        measured: ["#2ecc71", "#f1c40f", "#e67e22", "#e74c3c"],
    };

    /// KPI page palette.
    pub const NAMED: Palette = Palette {
        unknown: UNKNOWN_COLOR,
        measured: ["green", "yellow", "orange", "red"],
    };

    /// Time slider palette (diverging green → red).
    pub const DIVERGING: Palette = Palette {
        unknown: UNKNOWN_COLOR,
        measured: ["#1a9850", "#fee08b", "#fc8d59", "#d73027"],
    };

    pub fn color(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Unknown => self.unknown,
            Severity::Low => self.measured[0],
            Severity::Moderate => self.measured[1],
            Severity::Elevated => self.measured[2],
            Severity::High => self.measured[3],
        }
    }
}

/// Color for a concentration reading using the given cut points and palette.
pub fn concentration_color(
    value: Option<f64>,
    thresholds: &Thresholds,
    palette: &Palette,
) -> &'static str {
    palette.color(thresholds.classify(value))
}

/// Phosphate color with the default thresholds and the samples palette.
pub fn phosphate_color(value: Option<f64>) -> &'static str {
    concentration_color(value, &DEFAULT_THRESHOLDS, &Palette::PHOSPHATE)
}

/// One swatch in a map legend.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

impl LegendEntry {
    fn new(color: &str, label: impl Into<String>) -> Self {
        Self {
            color: color.to_string(),
            label: label.into(),
        }
    }
}

/// Legend for a concentration scale.
pub fn concentration_legend(thresholds: &Thresholds, palette: &Palette) -> Vec<LegendEntry> {
    Severity::MEASURED
        .iter()
        .zip(thresholds.labels())
        .map(|(s, label)| LegendEntry::new(palette.color(*s), label))
        .collect()
}

// ───────────────────── Treatments ─────────────────────

/// Color for a treatment that matches no keyword.
pub const OTHER_TREATMENT_COLOR: &str = "#7f8c8d";

/// A keyword rule: a lowercase substring and the color it selects.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TreatmentRule {
    pub keyword: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// Ordered keyword rules; the first match wins.
pub const TREATMENT_RULES: &[TreatmentRule] = &[
    TreatmentRule {
        keyword: "algaecide",
        label: "Algaecide",
        color: "#8e44ad",
    },
    TreatmentRule {
        keyword: "copper",
        label: "Algaecide",
        color: "#8e44ad",
    },
    TreatmentRule {
        keyword: "alum",
        label: "Phosphorus binder",
        color: "#2980b9",
    },
    TreatmentRule {
        keyword: "phoslock",
        label: "Phosphorus binder",
        color: "#2980b9",
    },
    TreatmentRule {
        keyword: "bacteria",
        label: "Biological",
        color: "#27ae60",
    },
    TreatmentRule {
        keyword: "enzyme",
        label: "Biological",
        color: "#27ae60",
    },
    TreatmentRule {
        keyword: "aerat",
        label: "Aeration",
        color: "#16a085",
    },
    TreatmentRule {
        keyword: "dye",
        label: "Dye",
        color: "#34495e",
    },
];

/// First matching rule for a free-text category, case-insensitively.
pub fn treatment_rule(label: &str) -> Option<&'static TreatmentRule> {
    let lowered = label.to_lowercase();
    TREATMENT_RULES
        .iter()
        .find(|rule| lowered.contains(rule.keyword))
}

/// Color for a treatment category. Never fails; unmatched → "other".
pub fn treatment_category_color(label: Option<&str>) -> &'static str {
    label
        .and_then(treatment_rule)
        .map(|rule| rule.color)
        .unwrap_or(OTHER_TREATMENT_COLOR)
}

/// Legend for treatment categories, one entry per distinct label.
pub fn treatment_legend() -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = Vec::new();
    for rule in TREATMENT_RULES {
        if !entries.iter().any(|e| e.label == rule.label) {
            entries.push(LegendEntry::new(rule.color, rule.label));
        }
    }
    entries.push(LegendEntry::new(OTHER_TREATMENT_COLOR, "Other"));
    entries
}

// ───────────────────── Land cover ─────────────────────

/// Land-cover category, in tie-break priority order.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum LandCoverKind {
    Urban,
    Agriculture,
    Water,
    Open,
}

impl LandCoverKind {
    /// Priority order used to break ties.
    pub const PRIORITY: [LandCoverKind; 4] = [
        LandCoverKind::Urban,
        LandCoverKind::Agriculture,
        LandCoverKind::Water,
        LandCoverKind::Open,
    ];

    pub fn color(&self) -> &'static str {
        match self {
            LandCoverKind::Urban => "#1f77b4",
            LandCoverKind::Agriculture => "#2ca02c",
            LandCoverKind::Water => "#17becf",
            LandCoverKind::Open => "#bcbd22",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LandCoverKind::Urban => "Urban",
            LandCoverKind::Agriculture => "Agriculture",
            LandCoverKind::Water => "Water",
            LandCoverKind::Open => "Open",
        }
    }

    /// Label used in popups and chart slices.
    pub fn short_label(&self) -> &'static str {
        match self {
            LandCoverKind::Agriculture => "Ag",
            other => other.label(),
        }
    }
}

/// Four land-cover percentages of a zone; missing values are already 0.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize)]
pub struct LandCover {
    pub urban: f64,
    pub agriculture: f64,
    pub water: f64,
    pub open: f64,
}

impl LandCover {
    pub fn share(&self, kind: LandCoverKind) -> f64 {
        match kind {
            LandCoverKind::Urban => self.urban,
            LandCoverKind::Agriculture => self.agriculture,
            LandCoverKind::Water => self.water,
            LandCoverKind::Open => self.open,
        }
    }

    /// Shares in priority order, for charts.
    pub fn shares(&self) -> [(LandCoverKind, f64); 4] {
        LandCoverKind::PRIORITY.map(|k| (k, self.share(k)))
    }

    /// The category with the largest share; ties go to the earlier category
    /// in [`LandCoverKind::PRIORITY`].
    pub fn dominant(&self) -> LandCoverKind {
        let mut best = LandCoverKind::Urban;
        let mut best_value = f64::NEG_INFINITY;
        for (kind, value) in self.shares() {
            let value = if value.is_nan() { 0.0 } else { value };
            if value > best_value {
                best = kind;
                best_value = value;
            }
        }
        best
    }
}

/// Fill color for a zone: the color of its dominant land cover.
pub fn dominant_zone_color(cover: &LandCover) -> &'static str {
    cover.dominant().color()
}

/// Legend for land-cover fills.
pub fn land_cover_legend() -> Vec<LegendEntry> {
    LandCoverKind::PRIORITY
        .iter()
        .map(|k| LegendEntry::new(k.color(), k.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_is_never_lowest_severity() {
        for palette in [Palette::PHOSPHATE, Palette::NAMED, Palette::DIVERGING] {
            let unknown = concentration_color(None, &DEFAULT_THRESHOLDS, &palette);
            for v in [-1.0, 0.0, 0.05, 0.1, 0.3, 0.5, 10.0] {
                assert_ne!(unknown, concentration_color(Some(v), &DEFAULT_THRESHOLDS, &palette));
            }
        }
        assert_eq!(phosphate_color(Some(f64::NAN)), UNKNOWN_COLOR);
    }

    #[test]
    fn bucket_boundaries_are_left_closed() {
        let t = DEFAULT_THRESHOLDS;
        assert_eq!(t.classify(Some(0.0999)), Severity::Low);
        assert_eq!(t.classify(Some(0.1)), Severity::Moderate);
        assert_eq!(t.classify(Some(0.2499)), Severity::Moderate);
        assert_eq!(t.classify(Some(0.25)), Severity::Elevated);
        assert_eq!(t.classify(Some(0.4999)), Severity::Elevated);
        assert_eq!(t.classify(Some(0.5)), Severity::High);
        assert_eq!(phosphate_color(Some(0.1)), "#f1c40f");
        assert_eq!(phosphate_color(Some(0.05)), "#2ecc71");
    }

    #[test]
    fn concentration_legend_labels() {
        let legend = concentration_legend(&DEFAULT_THRESHOLDS, &Palette::PHOSPHATE);
        let labels: Vec<&str> = legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["<0.1", "0.1 – 0.25", "0.25 – 0.5", ">0.5"]);
        assert_eq!(legend[3].color, "#e74c3c");
    }

    #[test]
    fn treatment_keywords_first_match_wins() {
        assert_eq!(treatment_category_color(Some("Copper Sulfate Algaecide")), "#8e44ad");
        assert_eq!(treatment_category_color(Some("ALUM dosing")), "#2980b9");
        assert_eq!(treatment_category_color(Some("Beneficial Bacteria")), "#27ae60");
        assert_eq!(treatment_category_color(Some("Fountain aeration")), "#16a085");
        // "algaecide" precedes "bacteria" in the rule list
        assert_eq!(treatment_category_color(Some("bacteria + algaecide")), "#8e44ad");
    }

    #[test]
    fn treatment_fallback_is_total() {
        assert_eq!(treatment_category_color(None), OTHER_TREATMENT_COLOR);
        assert_eq!(treatment_category_color(Some("")), OTHER_TREATMENT_COLOR);
        assert_eq!(treatment_category_color(Some("shoreline cleanup")), OTHER_TREATMENT_COLOR);
        let legend = treatment_legend();
        assert_eq!(legend.last().unwrap().label, "Other");
        assert_eq!(legend.iter().filter(|e| e.label == "Biological").count(), 1);
    }

    #[test]
    fn dominant_zone_ties_go_to_urban() {
        let cover = LandCover {
            urban: 10.0,
            agriculture: 10.0,
            water: 10.0,
            open: 10.0,
        };
        assert_eq!(cover.dominant(), LandCoverKind::Urban);
        assert_eq!(dominant_zone_color(&cover), "#1f77b4");
    }

    #[test]
    fn dominant_zone_picks_maximum() {
        let cover = LandCover {
            urban: 5.0,
            agriculture: 40.0,
            water: 40.0,
            open: 15.0,
        };
        assert_eq!(cover.dominant(), LandCoverKind::Agriculture);
        let water = LandCover {
            water: 60.0,
            ..Default::default()
        };
        assert_eq!(dominant_zone_color(&water), "#17becf");
        assert_eq!(LandCover::default().dominant(), LandCoverKind::Urban);
    }
}

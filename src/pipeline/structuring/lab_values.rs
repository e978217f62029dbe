use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::types::{Finding, FindingStatus};

/// mg/dL per mmol/L.
const GLUCOSE_MMOL_FACTOR: f64 = 18.0;
const CHOLESTEROL_MMOL_FACTOR: f64 = 38.67;
const TRIGLYCERIDES_MMOL_FACTOR: f64 = 88.57;

/// How a numeric reading maps to a status. Comparisons are strict, so a
/// value sitting exactly on a threshold stays in the milder band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdRule {
    /// Higher is worse.
    Above { abnormal: f64, warning: f64 },
    /// Lower is worse (HDL).
    Below { abnormal: f64, warning: f64 },
    /// Two-part reading such as systolic/diastolic; either part crossing its
    /// limit is enough.
    Pair {
        abnormal: (f64, f64),
        warning: (f64, f64),
    },
}

impl ThresholdRule {
    pub fn evaluate(&self, primary: f64, secondary: Option<f64>) -> FindingStatus {
        match *self {
            ThresholdRule::Above { abnormal, warning } => {
                if primary > abnormal {
                    FindingStatus::Abnormal
                } else if primary > warning {
                    FindingStatus::Warning
                } else {
                    FindingStatus::Normal
                }
            }
            ThresholdRule::Below { abnormal, warning } => {
                if primary < abnormal {
                    FindingStatus::Abnormal
                } else if primary < warning {
                    FindingStatus::Warning
                } else {
                    FindingStatus::Normal
                }
            }
            ThresholdRule::Pair { abnormal, warning } => {
                let secondary = secondary.unwrap_or(0.0);
                if primary > abnormal.0 || secondary > abnormal.1 {
                    FindingStatus::Abnormal
                } else if primary > warning.0 || secondary > warning.1 {
                    FindingStatus::Warning
                } else {
                    FindingStatus::Normal
                }
            }
        }
    }
}

/// A known lab metric: its display name, how to spot it in report text,
/// and how to grade the value.
///
/// The regex exposes named groups `value`, optionally `second` (two-part
/// readings) and `unit`.
pub struct LabPattern {
    pub name: &'static str,
    pub unit: &'static str,
    pub rule: ThresholdRule,
    regex: Regex,
    /// Converts a value reported in mmol/L into `unit` before grading.
    mmol_factor: Option<f64>,
    /// Words that, placed right before a match, mean the match belongs to a
    /// different metric ("LDL Cholesterol" is not total cholesterol).
    excluded_prefixes: &'static [&'static str],
}

impl LabPattern {
    /// First usable match in `text`, graded.
    pub fn find(&self, text: &str) -> Option<Finding> {
        self.regex
            .captures_iter(text)
            .filter(|caps| !self.is_excluded(text, caps))
            .find_map(|caps| self.to_finding(&caps))
    }

    fn is_excluded(&self, text: &str, caps: &Captures<'_>) -> bool {
        if self.excluded_prefixes.is_empty() {
            return false;
        }
        let start = caps.get(0).map_or(0, |m| m.start());
        // "LDL-Cholesterol" and "LDL Cholesterol" name the same metric.
        let before = text[..start]
            .trim_end_matches(|c: char| c.is_whitespace() || c == '-')
            .to_lowercase();
        self.excluded_prefixes.iter().any(|p| before.ends_with(p))
    }

    fn to_finding(&self, caps: &Captures<'_>) -> Option<Finding> {
        let raw = caps.name("value")?.as_str();
        let primary: f64 = raw.parse().ok()?;
        let second = caps.name("second").map(|m| m.as_str());
        let secondary = match second {
            Some(s) => Some(s.parse::<f64>().ok()?),
            None => None,
        };

        let reported_mmol = caps
            .name("unit")
            .is_some_and(|u| u.as_str().eq_ignore_ascii_case("mmol/l"));
        let (comparable, unit) = match (reported_mmol, self.mmol_factor) {
            (true, Some(factor)) => (primary * factor, "mmol/L"),
            _ => (primary, self.unit),
        };

        let value = match second {
            Some(s) => format!("{raw}/{s} {unit}"),
            None => format!("{raw} {unit}"),
        };

        Some(Finding::new(
            self.name,
            value,
            self.rule.evaluate(comparable, secondary),
        ))
    }
}

fn pattern(
    name: &'static str,
    regex: &str,
    unit: &'static str,
    rule: ThresholdRule,
    mmol_factor: Option<f64>,
    excluded_prefixes: &'static [&'static str],
) -> LabPattern {
    LabPattern {
        name,
        unit,
        rule,
        regex: Regex::new(regex).expect("Invalid lab value regex pattern"),
        mmol_factor,
        excluded_prefixes,
    }
}

/// Known lab metrics, in reporting order.
pub static LAB_PATTERNS: LazyLock<Vec<LabPattern>> = LazyLock::new(|| {
    vec![
        pattern(
            "Blood Glucose",
            r"(?i)\b(?:blood\s+glucose|glucose)[:=\s]+(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>mg/dl|mmol/l)?",
            "mg/dL",
            ThresholdRule::Above { abnormal: 140.0, warning: 100.0 },
            Some(GLUCOSE_MMOL_FACTOR),
            &[],
        ),
        pattern(
            "Total Cholesterol",
            r"(?i)\b(?:total\s+cholesterol|cholesterol)[:=\s]+(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>mg/dl|mmol/l)?",
            "mg/dL",
            ThresholdRule::Above { abnormal: 240.0, warning: 200.0 },
            Some(CHOLESTEROL_MMOL_FACTOR),
            &["hdl", "ldl"],
        ),
        pattern(
            "HDL Cholesterol",
            r"(?i)\bhdl(?:-c\b|[\s-]+cholesterol)?[:=\s]+(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>mg/dl|mmol/l)?",
            "mg/dL",
            ThresholdRule::Below { abnormal: 40.0, warning: 60.0 },
            Some(CHOLESTEROL_MMOL_FACTOR),
            &["non-", "non"],
        ),
        pattern(
            "LDL Cholesterol",
            r"(?i)\bldl(?:-c\b|[\s-]+cholesterol)?[:=\s]+(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>mg/dl|mmol/l)?",
            "mg/dL",
            ThresholdRule::Above { abnormal: 160.0, warning: 130.0 },
            Some(CHOLESTEROL_MMOL_FACTOR),
            &[],
        ),
        pattern(
            "Triglycerides",
            r"(?i)\btriglycerides?[:=\s]+(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>mg/dl|mmol/l)?",
            "mg/dL",
            ThresholdRule::Above { abnormal: 200.0, warning: 150.0 },
            Some(TRIGLYCERIDES_MMOL_FACTOR),
            &[],
        ),
        pattern(
            "Blood Pressure",
            r"(?i)\b(?:blood\s+pressure|bp)[:=\s]+(?P<value>\d{2,3})\s*/\s*(?P<second>\d{2,3})\s*(?P<unit>mmhg)?",
            "mmHg",
            ThresholdRule::Pair {
                abnormal: (140.0, 90.0),
                warning: (120.0, 80.0),
            },
            None,
            &[],
        ),
        pattern(
            "Hemoglobin A1C",
            r"(?i)\b(?:hemoglobin\s+a1c|hba1c|a1c)[:=\s]+(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>%)?",
            "%",
            ThresholdRule::Above { abnormal: 6.5, warning: 5.7 },
            None,
            &[],
        ),
    ]
});

/// Pull known lab values straight out of report text.
///
/// Every pattern is tried independently and contributes at most one
/// finding. Returns an empty list when nothing matches; callers supply
/// their own placeholder.
pub fn extract_lab_values(text: &str) -> Vec<Finding> {
    LAB_PATTERNS.iter().filter_map(|p| p.find(text)).collect()
}

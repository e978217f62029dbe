use std::sync::LazyLock;

use regex::Regex;

use super::classify::classify_status;
use super::fallback::{default_recommendations, findings_or_placeholder, DEFAULT_SUMMARY};
use super::lab_values::extract_lab_values;
use super::types::{AnalysisRecord, Finding};

/// Recommendation fragments at or below this many characters are dropped
/// (stray list numbers, lone punctuation).
const MIN_RECOMMENDATION_CHARS: usize = 10;

static SUMMARY_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)SUMMARY:(.*?)(?:KEY FINDINGS:|RECOMMENDATIONS:|$)")
        .expect("Invalid summary section regex")
});

static FINDINGS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)KEY FINDINGS:(.*?)(?:RECOMMENDATIONS:|$)")
        .expect("Invalid findings section regex")
});

static RECOMMENDATIONS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)RECOMMENDATIONS:(.*)").expect("Invalid recommendations section regex")
});

/// `- Name: value text - status`, bullet optional, one line. Only the first
/// word after the dash is the status; anything after it is commentary.
static FINDING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[•*\-][ \t]*)?(?P<label>[^\s:•*\-,;][^:\n]*?)[ \t]*:[ \t]*(?P<value>[^\n]+?)[ \t]*-[ \t]*(?P<status>[A-Za-z]+)",
    )
    .expect("Invalid finding line regex")
});

/// Bullet glyphs and list numbers at the start of an item, or a bare line break.
static RECOMMENDATION_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:[•*\-]|\d+[.)])\s+|\n").expect("Invalid recommendation split regex")
});

/// Parse free-form model output into an [`AnalysisRecord`].
///
/// `source_text` is the report the model was asked about; it is scanned for
/// lab values when the model's own findings section yields nothing. The
/// returned record is always complete.
pub fn parse_model_response(generated: &str, source_text: &str) -> AnalysisRecord {
    let summary = section(&SUMMARY_SECTION, generated)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    let mut key_findings = section(&FINDINGS_SECTION, generated)
        .map(parse_findings)
        .unwrap_or_default();
    if key_findings.is_empty() {
        tracing::debug!("No findings in model output, scanning source text for lab values");
        key_findings = extract_lab_values(source_text);
    }

    let mut recommendations = section(&RECOMMENDATIONS_SECTION, generated)
        .map(parse_recommendations)
        .unwrap_or_default();
    if recommendations.is_empty() {
        recommendations = default_recommendations();
    }

    AnalysisRecord {
        summary,
        key_findings: findings_or_placeholder(key_findings),
        recommendations,
        error: None,
    }
}

/// Content of the first match of `re`, with surrounding whitespace and
/// markdown emphasis stripped.
fn section<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| trim_section(m.as_str()))
}

fn trim_section(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '*')
}

/// Every `name: value - status` fragment, in order of appearance.
pub fn parse_findings(section: &str) -> Vec<Finding> {
    FINDING_LINE
        .captures_iter(section)
        .filter_map(|caps| {
            let name = caps
                .name("label")?
                .as_str()
                .trim_matches(|c: char| c.is_whitespace() || c == '*');
            let value = caps.name("value")?.as_str().trim();
            let status = caps.name("status")?.as_str().trim().to_lowercase();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some(Finding::new(name, value, classify_status(&status)))
        })
        .collect()
}

/// Split a recommendations block into list items.
pub fn parse_recommendations(section: &str) -> Vec<String> {
    RECOMMENDATION_SPLIT
        .split(section)
        .map(|item| item.trim_matches(|c: char| c.is_whitespace() || c == '*'))
        .filter(|item| item.chars().count() > MIN_RECOMMENDATION_CHARS)
        .map(str::to_string)
        .collect()
}

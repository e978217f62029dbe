use super::types::FindingStatus;

/// Tokens that mark a finding as abnormal. Checked before [`WARNING_KEYWORDS`],
/// so "borderline high" lands here.
const ABNORMAL_KEYWORDS: &[&str] = &["abnormal", "high", "low", "critical", "elevated"];

const WARNING_KEYWORDS: &[&str] = &["warning", "borderline", "moderate"];

/// Map a free-text status word from model output to a [`FindingStatus`].
///
/// Case-insensitive substring match; anything unrecognised is `Normal`.
pub fn classify_status(token: &str) -> FindingStatus {
    let token = token.trim().to_lowercase();

    if ABNORMAL_KEYWORDS.iter().any(|k| token.contains(k)) {
        FindingStatus::Abnormal
    } else if WARNING_KEYWORDS.iter().any(|k| token.contains(k)) {
        FindingStatus::Warning
    } else {
        FindingStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abnormal_keywords() {
        for token in ["abnormal", "high", "low", "critical", "elevated"] {
            assert_eq!(classify_status(token), FindingStatus::Abnormal, "{token}");
        }
    }

    #[test]
    fn warning_keywords() {
        for token in ["warning", "borderline", "moderate"] {
            assert_eq!(classify_status(token), FindingStatus::Warning, "{token}");
        }
    }

    #[test]
    fn abnormal_wins_over_warning() {
        assert_eq!(classify_status("Borderline High"), FindingStatus::Abnormal);
        assert_eq!(classify_status("moderately elevated"), FindingStatus::Abnormal);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(classify_status("HIGH"), FindingStatus::Abnormal);
        assert_eq!(classify_status("  Borderline "), FindingStatus::Warning);
        assert_eq!(classify_status("Critical"), FindingStatus::Abnormal);
    }

    #[test]
    fn substring_match() {
        assert_eq!(classify_status("highest"), FindingStatus::Abnormal);
        assert_eq!(classify_status("lowish"), FindingStatus::Abnormal);
        assert_eq!(classify_status("warnings"), FindingStatus::Warning);
    }

    #[test]
    fn unrecognised_defaults_to_normal() {
        assert_eq!(classify_status("normal"), FindingStatus::Normal);
        assert_eq!(classify_status("optimal"), FindingStatus::Normal);
        assert_eq!(classify_status(""), FindingStatus::Normal);
        assert_eq!(classify_status("within range"), FindingStatus::Normal);
    }
}

//! Target-group classification
//!
//! `target_group` is free text in the source data, so caste eligibility is a
//! best-effort keyword scan. All keywords live in the two tables below and are
//! matched case-insensitively on word boundaries.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::CasteCategory;

/// Phrases that open a scheme to every caste category
pub const OPEN_MARKERS: &[&str] = &[
    "all",
    "all citizens",
    "all households",
    "eligible citizens",
    "everyone",
];

/// Keywords identifying each reserved category in target-group text
pub const CASTE_KEYWORDS: &[(CasteCategory, &[&str])] = &[
    (CasteCategory::Sc, &["sc", "scheduled caste", "scheduled castes"]),
    (
        CasteCategory::St,
        &["st", "scheduled tribe", "scheduled tribes", "tribal", "tribals"],
    ),
    (
        CasteCategory::Obc,
        &["obc", "bc", "other backward", "backward class", "backward classes"],
    ),
    (CasteCategory::General, &["general", "unreserved"]),
];

lazy_static! {
    static ref OPEN_PATTERN: Regex = keyword_pattern(OPEN_MARKERS, false);
    static ref CASTE_PATTERNS: Vec<(CasteCategory, Regex)> = CASTE_KEYWORDS
        .iter()
        .map(|(caste, keywords)| (*caste, keyword_pattern(keywords, true)))
        .collect();
}

/// Build a case-insensitive alternation anchored on word boundaries
///
/// With `plural` set, each keyword also matches with a trailing `s`, so
/// abbreviations such as `SCs` or `OBCs` are recognized.
fn keyword_pattern(keywords: &[&str], plural: bool) -> Regex {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|keyword| regex::escape(keyword).replace(' ', r"\s+"))
        .collect();
    let suffix = if plural { "s?" } else { "" };

    Regex::new(&format!(r"(?i)\b(?:{}){}\b", alternatives.join("|"), suffix))
        .expect("keyword table must compile")
}

/// Parsed view of a target-group description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetGroup {
    /// An open-to-everyone marker was present
    pub open_to_all: bool,
    /// Categories named explicitly, in table order
    pub categories: Vec<CasteCategory>,
}

impl TargetGroup {
    /// No restriction applies: either a marker says so or no keyword matched
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open_to_all || self.categories.is_empty()
    }

    #[inline]
    pub fn admits(&self, caste: CasteCategory) -> bool {
        self.is_open() || self.categories.contains(&caste)
    }

    /// The text names this caste explicitly
    #[inline]
    pub fn names(&self, caste: CasteCategory) -> bool {
        self.categories.contains(&caste)
    }

    pub fn label(&self) -> String {
        if self.is_open() {
            return CasteCategory::All.to_string();
        }
        self.categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// How a user's caste relates to a scheme's target group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasteMatch {
    /// The target group names the user's caste
    Specific,
    /// Eligible only because the scheme is open
    Generic,
    Ineligible,
}

impl CasteMatch {
    pub fn is_eligible(&self) -> bool {
        !matches!(self, CasteMatch::Ineligible)
    }
}

pub fn classify_target_group(text: &str) -> TargetGroup {
    let open_to_all = OPEN_PATTERN.is_match(text);
    let categories = CASTE_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(caste, _)| *caste)
        .collect();

    TargetGroup {
        open_to_all,
        categories,
    }
}

pub fn match_caste(user_caste: CasteCategory, text: &str) -> CasteMatch {
    let group = classify_target_group(text);

    if group.names(user_caste) {
        CasteMatch::Specific
    } else if group.admits(user_caste) {
        CasteMatch::Generic
    } else {
        CasteMatch::Ineligible
    }
}

/// Whether a user of `user_caste` may receive a scheme aimed at `text`
///
/// Text with no recognizable keyword is treated as open to all.
#[inline]
pub fn caste_eligible(user_caste: CasteCategory, text: &str) -> bool {
    classify_target_group(text).admits(user_caste)
}

/// Normalized caste label for a target group, e.g. `SC, ST` or `All`
pub fn normalize_target_group(text: &str) -> String {
    classify_target_group(text).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_tribes_only() {
        let text = "Scheduled Tribes only";

        assert!(caste_eligible(CasteCategory::St, text));
        assert_eq!(match_caste(CasteCategory::St, text), CasteMatch::Specific);
        assert!(!caste_eligible(CasteCategory::Obc, text));
        assert!(!caste_eligible(CasteCategory::Sc, text));
        assert_eq!(normalize_target_group(text), "ST");
    }

    #[test]
    fn test_open_markers() {
        assert!(caste_eligible(CasteCategory::Sc, "All citizens"));
        assert!(caste_eligible(CasteCategory::General, "Eligible citizens of the state"));
        assert!(caste_eligible(CasteCategory::Obc, "All households below poverty line"));
        assert_eq!(normalize_target_group("All citizens"), "All");
    }

    #[test]
    fn test_open_marker_with_named_caste_is_specific() {
        let text = "All SC families";
        assert_eq!(match_caste(CasteCategory::Sc, text), CasteMatch::Specific);
        assert_eq!(match_caste(CasteCategory::General, text), CasteMatch::Generic);
    }

    #[test]
    fn test_multiple_categories() {
        let text = "SC/ST students pursuing higher education";
        let group = classify_target_group(text);

        assert_eq!(group.categories, vec![CasteCategory::Sc, CasteCategory::St]);
        assert_eq!(normalize_target_group(text), "SC, ST");
        assert!(caste_eligible(CasteCategory::Sc, text));
        assert!(caste_eligible(CasteCategory::St, text));
        assert!(!caste_eligible(CasteCategory::General, text));
    }

    #[test]
    fn test_ambiguous_text_is_open() {
        let text = "Small and marginal farmers";

        // "small" must not trigger the "all" marker, and nothing else matches
        assert!(!classify_target_group(text).open_to_all);
        assert!(classify_target_group(text).categories.is_empty());
        assert!(caste_eligible(CasteCategory::Sc, text));
        assert_eq!(match_caste(CasteCategory::Obc, text), CasteMatch::Generic);
        assert_eq!(normalize_target_group(text), "All");
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        // "st" inside "students" and "sc" inside "scholarship" are not caste hits
        let text = "Students applying for a scholarship";
        assert!(classify_target_group(text).categories.is_empty());
    }

    #[test]
    fn test_backward_classes() {
        let text = "Other Backward Classes";
        assert_eq!(match_caste(CasteCategory::Obc, text), CasteMatch::Specific);
        assert_eq!(match_caste(CasteCategory::Sc, text), CasteMatch::Ineligible);

        let text = "BC Welfare Corporation beneficiaries";
        assert!(caste_eligible(CasteCategory::Obc, text));
    }

    #[test]
    fn test_unreserved() {
        let text = "Unreserved category youth";
        assert!(caste_eligible(CasteCategory::General, text));
        assert!(!caste_eligible(CasteCategory::St, text));
        assert_eq!(normalize_target_group(text), "General");
    }

    #[test]
    fn test_empty_text_is_open() {
        assert!(caste_eligible(CasteCategory::St, ""));
        assert_eq!(normalize_target_group(""), "All");
    }

    #[test]
    fn test_plural_abbreviations() {
        let text = "SCs and STs only";
        assert_eq!(normalize_target_group(text), "SC, ST");
        assert!(!caste_eligible(CasteCategory::General, text));
        assert_eq!(match_caste(CasteCategory::St, text), CasteMatch::Specific);

        let text = "Reserved for OBCs";
        assert_eq!(normalize_target_group(text), "OBC");
        assert!(!caste_eligible(CasteCategory::General, text));

        let text = "SC/STs";
        assert_eq!(normalize_target_group(text), "SC, ST");
        assert!(caste_eligible(CasteCategory::St, text));
    }

    #[test]
    fn test_multiword_keyword_spacing() {
        assert!(caste_eligible(CasteCategory::Sc, "Scheduled   Castes"));
        assert!(!caste_eligible(CasteCategory::Obc, "Scheduled   Castes"));
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// State value marking a scheme as available nationwide
pub const NATIONWIDE: &str = "All";

/// Incomes at or above this are displayed as an open-ended bracket
pub const INCOME_UNBOUNDED: u64 = 999_999;

/// Date format used by `last_updated`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Government welfare scheme as loaded from the catalog
///
/// Numeric bounds are `None` when the source cell could not be parsed.
/// Every predicate that needs a missing bound fails closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRecord {
    #[serde(rename = "scheme_id")]
    pub id: String,
    #[serde(rename = "scheme_name")]
    pub name: String,
    #[serde(default)]
    pub level: String,
    pub state: String,
    pub category: String,
    pub min_income: Option<u64>,
    pub max_income: Option<u64>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    #[serde(default)]
    pub target_group: String,
    #[serde(default)]
    pub benefits: String,
    pub is_active: bool,
    #[serde(default)]
    pub last_updated: String,
}

impl SchemeRecord {
    /// Income bracket, or `None` if a bound is malformed or inverted
    pub fn income_bounds(&self) -> Option<(u64, u64)> {
        match (self.min_income, self.max_income) {
            (Some(min), Some(max)) if min <= max => Some((min, max)),
            _ => None,
        }
    }

    /// Age bracket, or `None` if a bound is malformed or inverted
    pub fn age_bounds(&self) -> Option<(u32, u32)> {
        match (self.min_age, self.max_age) {
            (Some(min), Some(max)) if min <= max => Some((min, max)),
            _ => None,
        }
    }

    pub fn is_nationwide(&self) -> bool {
        self.state == NATIONWIDE
    }

    pub fn last_updated_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.last_updated.trim(), DATE_FORMAT).ok()
    }

    /// Display label such as `₹0 - ₹300,000` or `₹50,000+`
    pub fn income_range_label(&self) -> String {
        match self.income_bounds() {
            Some((min, max)) if max >= INCOME_UNBOUNDED => {
                format!("₹{}+", group_thousands(min))
            }
            Some((min, max)) => {
                format!("₹{} - ₹{}", group_thousands(min), group_thousands(max))
            }
            None => "Not specified".to_string(),
        }
    }

    pub fn age_range_label(&self) -> String {
        match self.age_bounds() {
            Some((min, max)) => format!("{} - {} years", min, max),
            None => "Not specified".to_string(),
        }
    }
}

/// Format an integer with comma thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Normalized caste category used for reservation matching
///
/// Deserialization goes through [`FromStr`], so wire values are
/// case-insensitive and accept the `BC` alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum CasteCategory {
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "OBC")]
    Obc,
    #[default]
    General,
    All,
}

impl CasteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CasteCategory::Sc => "SC",
            CasteCategory::St => "ST",
            CasteCategory::Obc => "OBC",
            CasteCategory::General => "General",
            CasteCategory::All => "All",
        }
    }
}

impl fmt::Display for CasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CasteCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SC" => Ok(CasteCategory::Sc),
            "ST" => Ok(CasteCategory::St),
            // BC and OBC are the same reservation category
            "OBC" | "BC" => Ok(CasteCategory::Obc),
            "GENERAL" => Ok(CasteCategory::General),
            "ALL" => Ok(CasteCategory::All),
            other => Err(format!(
                "Unknown caste category '{}', expected one of SC, ST, OBC, BC, General, All",
                other
            )),
        }
    }
}

impl TryFrom<String> for CasteCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Citizen attributes a recommendation is computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub state: String,
    pub income: u64,
    #[serde(default)]
    pub age: Option<u32>,
    pub category: String,
    #[serde(default)]
    pub caste_category: CasteCategory,
}

impl UserProfile {
    /// Age assumed for scoring when the profile does not declare one
    pub const DEFAULT_AGE: u32 = 30;

    pub fn effective_age(&self) -> u32 {
        self.age.unwrap_or(Self::DEFAULT_AGE)
    }
}

/// A scheme scored against one profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub scheme: SchemeRecord,
    pub score: u32,
    pub match_percentage: String,
    pub income_range: String,
    /// Normalized target group of the scheme (e.g. `SC, ST` or `All`)
    pub caste_category: String,
    pub age_eligible: bool,
    pub caste_eligible: bool,
}

/// Match results split by score band, each preserving ranking order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorityBuckets {
    pub high: Vec<MatchResult>,
    pub medium: Vec<MatchResult>,
    pub low: Vec<MatchResult>,
}

/// Scoring weights, in points
///
/// `base + category + age + caste + state` must equal 100 so that a
/// perfect match on every axis scores exactly 100. The `*_related`,
/// `*_generic` and `*_nationwide` values are partial credits and may not
/// exceed their full counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub base: u32,
    pub category: u32,
    pub category_related: u32,
    pub age: u32,
    pub caste: u32,
    pub caste_generic: u32,
    pub state: u32,
    pub state_nationwide: u32,
}

impl ScoringWeights {
    pub fn total(&self) -> u32 {
        self.base + self.category + self.age + self.caste + self.state
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.total() != 100 {
            return Err(format!(
                "scoring weights must total 100 points, got {}",
                self.total()
            ));
        }
        if self.category_related > self.category
            || self.caste_generic > self.caste
            || self.state_nationwide > self.state
        {
            return Err("partial credit may not exceed its full weight".to_string());
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 25,
            category: 25,
            category_related: 10,
            age: 20,
            caste: 20,
            caste_generic: 15,
            state: 10,
            state_nationwide: 5,
        }
    }
}

/// One scheme inside a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeSnapshot {
    #[serde(flatten)]
    pub scheme: SchemeRecord,
    pub age_range: String,
    pub income_range: String,
    pub eligibility_score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Income,
    Age,
    Category,
    Eligibility,
}

/// Derived fact about a set of compared schemes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// Best pick among compared schemes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub scheme_name: String,
    pub reason: String,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonBundle {
    pub schemes: Vec<SchemeSnapshot>,
    pub insights: Vec<Insight>,
    pub recommendation: Option<Recommendation>,
}

/// Optional narrowing applied on top of a text search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub caste_category: Option<CasteCategory>,
    #[serde(default)]
    pub min_income: Option<u64>,
    #[serde(default)]
    pub max_income: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBracketCount {
    pub bracket: String,
    pub count: usize,
}

/// Aggregate counts over the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeStatistics {
    pub total_schemes: usize,
    pub active_schemes: usize,
    pub inactive_schemes: usize,
    pub categories: BTreeMap<String, usize>,
    pub states: BTreeMap<String, usize>,
    /// Central, State, ...; blank levels count as `Unknown`
    pub levels: BTreeMap<String, usize>,
    pub caste_categories: BTreeMap<String, usize>,
    pub income_ranges: Vec<IncomeBracketCount>,
    pub top_categories: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Update,
    New,
    Deadline,
    Priority,
    CategoryMatch,
}

/// Alert urgency; declaration order is the sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub scheme_id: String,
    pub scheme_name: String,
    pub category: String,
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub message: String,
    pub benefits: String,
    pub target_group: String,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_ago: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_required: Option<String>,
}

impl fmt::Display for Alert {
    /// One human-readable line per alert, worded by alert type
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alert_type {
            AlertType::Update => match self.days_ago {
                Some(days) => write!(f, "{} was updated {} days ago", self.scheme_name, days),
                None => write!(f, "{} was updated", self.scheme_name),
            },
            AlertType::Priority => write!(
                f,
                "High Priority: {} - {}",
                self.scheme_name,
                self.reason.as_deref().unwrap_or(&self.message)
            ),
            AlertType::Deadline => write!(
                f,
                "Deadline Alert: {} - {}",
                self.scheme_name,
                self.deadline_info.as_deref().unwrap_or("Action required")
            ),
            AlertType::New => write!(f, "New Scheme: {} - {}", self.scheme_name, self.message),
            AlertType::CategoryMatch => write!(f, "{} - {}", self.scheme_name, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertBundle {
    pub recent_updates: Vec<Alert>,
    pub high_priority: Vec<Alert>,
    pub category_alerts: Vec<Alert>,
    pub deadlines: Vec<Alert>,
    pub new_schemes: Vec<Alert>,
    pub count: usize,
}

/// Scheme entering or leaving the eligible set after an income change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeChange {
    pub scheme_id: String,
    pub scheme_name: String,
    pub category: String,
    pub benefits: String,
    pub income_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityChange {
    pub gained: Vec<SchemeChange>,
    pub lost: Vec<SchemeChange>,
    pub current_income: u64,
    pub new_income: u64,
    pub total_current: usize,
    pub total_new: usize,
    pub income_change: i64,
    pub impact_summary: String,
}

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    group_thousands, Alert, AlertBundle, AlertPriority, AlertType, CasteCategory, ComparisonBundle,
    EligibilityChange, IncomeBracketCount, Insight, InsightKind, MatchResult, PriorityBuckets,
    Recommendation, SchemeChange, SchemeRecord, SchemeSnapshot, SchemeStatistics, ScoringWeights,
    SearchFilters, UserProfile, DATE_FORMAT, INCOME_UNBOUNDED, NATIONWIDE,
};
pub use requests::{CompareRequest, EligibilityChangeRequest, ProfileRequest, RecommendRequest, SearchRequest};
pub use responses::{ErrorResponse, HealthResponse, RecommendResponse, RefreshResponse, SearchResponse};

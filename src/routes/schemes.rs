use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::core::{scheme_details, scheme_statistics, search_schemes, AlertGenerator, Matcher};
use crate::error::SchemeError;
use crate::models::{
    CompareRequest, EligibilityChangeRequest, HealthResponse, ProfileRequest, RecommendRequest,
    RecommendResponse, RefreshResponse, SearchRequest, SearchResponse,
};
use crate::services::{Catalog, CatalogCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogCache>,
    pub catalog_path: String,
    pub matcher: Matcher,
    pub alerts: AlertGenerator,
    pub default_limit: Option<usize>,
    pub max_limit: usize,
}

impl AppState {
    async fn current_catalog(&self) -> Result<Arc<Catalog>, SchemeError> {
        self.catalog.get(&self.catalog_path).await
    }

    /// Requested limit, falling back to the default and capped at the maximum
    fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .or(self.default_limit)
            .unwrap_or(self.max_limit)
            .min(self.max_limit)
    }
}

/// Configure all scheme-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommend", web::post().to(recommend))
        .route("/compare", web::post().to(compare))
        .route("/search", web::post().to(search))
        .route("/statistics", web::get().to(statistics))
        .route("/schemes/{name}", web::get().to(get_scheme))
        .route("/alerts", web::post().to(alerts))
        .route("/alerts/eligibility-change", web::post().to(eligibility_change))
        .route("/catalog/refresh", web::post().to(refresh_catalog));
}

/// Health check endpoint
///
/// Reports "degraded" when the catalog cannot be loaded.
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let status = match state.current_catalog().await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!("Health check could not load catalog: {}", e);
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommend schemes for a profile
///
/// POST /api/recommend
///
/// Request body:
/// ```json
/// {
///   "state": "Maharashtra",
///   "income": 100000,
///   "age": 35,
///   "category": "Agriculture",
///   "caste_category": "OBC",
///   "min_score": 80,
///   "limit": 20
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> Result<HttpResponse, SchemeError> {
    let req = req.into_inner();
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: {:?}", errors);
        return Err(errors.into());
    }

    let profile = req.profile.into_profile()?;
    let limit = state.effective_limit(req.limit);
    let catalog = state.current_catalog().await?;

    tracing::info!(
        "Recommending schemes: state={}, category={}, caste={}, limit={}",
        profile.state,
        profile.category,
        profile.caste_category,
        limit
    );

    let start = std::time::Instant::now();
    let result = if req.annotate {
        state
            .matcher
            .recommend_annotated(catalog.schemes(), &profile, req.min_score, Some(limit))
    } else {
        state
            .matcher
            .recommend(catalog.schemes(), &profile, req.min_score, Some(limit))
    };

    tracing::info!(
        "Recommended {} of {} schemes in {}ms",
        result.matches.len(),
        result.total_candidates,
        start.elapsed().as_millis()
    );

    Ok(HttpResponse::Ok().json(RecommendResponse {
        success: true,
        count: result.matches.len(),
        total_candidates: result.total_candidates,
        schemes: result.matches,
    }))
}

/// Compare two to four schemes side by side
async fn compare(
    state: web::Data<AppState>,
    req: web::Json<CompareRequest>,
) -> Result<HttpResponse, SchemeError> {
    let req = req.into_inner();
    let profile = req
        .user_profile
        .map(ProfileRequest::into_profile)
        .transpose()?;

    let catalog = state.current_catalog().await?;
    let bundle = state
        .matcher
        .compare(catalog.schemes(), &req.scheme_names, profile.as_ref())?;

    tracing::debug!(
        "Compared {} of {} requested schemes",
        bundle.schemes.len(),
        req.scheme_names.len()
    );

    Ok(HttpResponse::Ok().json(bundle))
}

/// Keyword search over active schemes
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, SchemeError> {
    let catalog = state.current_catalog().await?;
    let schemes: Vec<_> = search_schemes(catalog.schemes(), &req.query, req.filters.as_ref())
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!("Search '{}' matched {} schemes", req.query, schemes.len());

    Ok(HttpResponse::Ok().json(SearchResponse {
        success: true,
        count: schemes.len(),
        schemes,
    }))
}

/// Aggregate catalog statistics
async fn statistics(state: web::Data<AppState>) -> Result<HttpResponse, SchemeError> {
    let catalog = state.current_catalog().await?;
    Ok(HttpResponse::Ok().json(scheme_statistics(catalog.schemes())))
}

/// Full record of one scheme by exact name
async fn get_scheme(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, SchemeError> {
    let name = path.into_inner();
    let catalog = state.current_catalog().await?;

    match scheme_details(catalog.schemes(), &name) {
        Some(scheme) => Ok(HttpResponse::Ok().json(scheme)),
        None => Err(SchemeError::NotFound(format!("Scheme '{}'", name))),
    }
}

/// Alerts for a profile
async fn alerts(
    state: web::Data<AppState>,
    req: web::Json<ProfileRequest>,
) -> Result<HttpResponse, SchemeError> {
    let profile = req.into_inner().into_profile()?;
    let catalog = state.current_catalog().await?;
    let today = chrono::Local::now().date_naive();

    let bundle = state.alerts.generate_alerts(catalog.schemes(), &profile, today);
    tracing::info!("Generated {} alerts for state={}", bundle.count, profile.state);

    Ok(HttpResponse::Ok().json(bundle))
}

/// Simulate an income change
async fn eligibility_change(
    state: web::Data<AppState>,
    req: web::Json<EligibilityChangeRequest>,
) -> Result<HttpResponse, SchemeError> {
    let req = req.into_inner();
    let profile = req.profile.into_profile()?;
    let catalog = state.current_catalog().await?;

    let change = state
        .alerts
        .check_eligibility_change(catalog.schemes(), &profile, req.income_change);

    Ok(HttpResponse::Ok().json(change))
}

/// Reload the catalog from its source
///
/// On failure the previously loaded catalog keeps serving.
async fn refresh_catalog(state: web::Data<AppState>) -> Result<HttpResponse, SchemeError> {
    let catalog = state.catalog.refresh(&state.catalog_path).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        success: true,
        schemes: catalog.len(),
        loaded_at: catalog.loaded_at(),
    }))
}

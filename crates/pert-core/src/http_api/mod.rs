use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    Activity, Analysis, CrashingOptions, CrashingScheme, EngineConfig, Probability,
    ProjectReport, ReportMetadata, ScheduleError, analyze_with, calculate_crashing_options_with,
    calculate_crashing_scheme_with, network::diagram,
};

/// Shared state: only the engine configuration. Each request analyzes the
/// network it carries.
#[derive(Clone, Default)]
pub struct AppState {
    config: Arc<RwLock<EngineConfig>>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn with_shared(config: Arc<RwLock<EngineConfig>>) -> Self {
        Self { config }
    }

    fn config(&self) -> EngineConfig {
        self.config.read().clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Schedule(ScheduleError),
    Invalid(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Schedule(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Invalid(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            ApiError::Schedule(err) => (Some(err.code()), err.to_string()),
            ApiError::Invalid(message) => (None, message),
        };
        warn!(code = code.unwrap_or("-"), %message, "rejected request");
        let body = Json(ErrorBody {
            error: "invalid_request",
            code,
            message,
        });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesPayload {
    pub activities: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityPayload {
    pub activities: Vec<Activity>,
    pub deadline: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityResponse {
    pub project_duration: f64,
    pub project_variance: f64,
    pub deadline: f64,
    #[serde(flatten)]
    pub probability: Probability,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemePayload {
    pub activities: Vec<Activity>,
    #[serde(default, deserialize_with = "crate::activity::number_or_numeric_text")]
    pub target_duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub metadata: ReportMetadata,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config).put(update_config))
        .route("/analyze", post(analyze_handler))
        .route("/probability", post(probability_handler))
        .route("/crashing/options", post(crashing_options_handler))
        .route("/crashing/scheme", post(crashing_scheme_handler))
        .route("/report", post(report_handler))
        .route("/diagram", post(diagram_handler))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, config: EngineConfig) -> std::io::Result<()> {
    let state = AppState::new(config);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_config(State(state): State<AppState>) -> Json<EngineConfig> {
    Json(state.config())
}

async fn update_config(
    State(state): State<AppState>,
    config: Result<Json<EngineConfig>, JsonRejection>,
) -> Result<Json<EngineConfig>, ApiError> {
    let Json(config) = config?;
    config
        .validate()
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    *state.config.write() = config.clone();
    info!(?config, "engine config updated");
    Ok(Json(config))
}

async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActivitiesPayload>, JsonRejection>,
) -> Result<Json<Analysis>, ApiError> {
    let Json(payload) = payload?;
    let analysis = analyze_with(&payload.activities, &state.config())?;
    Ok(Json(analysis))
}

async fn probability_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProbabilityPayload>, JsonRejection>,
) -> Result<Json<ProbabilityResponse>, ApiError> {
    let Json(payload) = payload?;
    if !payload.deadline.is_finite() {
        return Err(ApiError::invalid("deadline must be a finite number"));
    }
    let analysis = analyze_with(&payload.activities, &state.config())?;
    Ok(Json(ProbabilityResponse {
        project_duration: analysis.project_duration,
        project_variance: analysis.project_variance,
        deadline: payload.deadline,
        probability: analysis.probability(payload.deadline),
    }))
}

async fn crashing_options_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActivitiesPayload>, JsonRejection>,
) -> Result<Json<CrashingOptions>, ApiError> {
    let Json(payload) = payload?;
    let options = calculate_crashing_options_with(&payload.activities, &state.config())?;
    Ok(Json(options))
}

async fn crashing_scheme_handler(
    State(state): State<AppState>,
    payload: Result<Json<SchemePayload>, JsonRejection>,
) -> Result<Json<CrashingScheme>, ApiError> {
    let Json(payload) = payload?;
    let scheme = calculate_crashing_scheme_with(
        &payload.activities,
        payload.target_duration,
        &state.config(),
    )?;
    Ok(Json(scheme))
}

async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let report = ProjectReport::build(payload.metadata, &payload.activities, &state.config())?;
    let disposition = format!("attachment; filename={}", report.suggested_file_name());
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(report)).into_response())
}

async fn diagram_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActivitiesPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let dot = diagram::to_dot(&payload.activities, &state.config())?;
    Ok(([(header::CONTENT_TYPE, "text/vnd.graphviz")], dot).into_response())
}

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn, from_fn_with_state},
    response::{Json, Response},
    routing::{get, post},
};
use claim_wise::{
    ClaimAnalyzer, ClaimField, ClaimInput, ClaimWiseError, ClaimsTable, DashboardSummary,
    FileFlagStorage, FlagStorage, HistorySummary, InMemoryFlagStorage, MockPredictionService,
    PredictionHistoryEntry, PredictionResult, SessionGate, SubmissionState, View,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::config::Config;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiResult<T> = Result<Json<T>, ApiError>;
type ApiError = (StatusCode, Json<Value>);

fn unauthorized_error(message: &str) -> ApiError {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
}

fn api_error(e: ClaimWiseError) -> ApiError {
    match e {
        ClaimWiseError::InvalidCredentials => unauthorized_error(&e.to_string()),
        ClaimWiseError::SubmissionInProgress => {
            (StatusCode::CONFLICT, Json(json!({ "error": e.to_string() })))
        }
        other => {
            error!(error = %other, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal error",
                    "details": other.to_string()
                })),
            )
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionGate>,
    pub analyzer: Arc<ClaimAnalyzer>,
    pub dashboard: Arc<DashboardSummary>,
    pub claims_csv_path: Arc<PathBuf>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn FlagStorage> = match &config.session_store_path {
            Some(path) => {
                info!(path = %path.display(), "Using file session storage");
                Arc::new(FileFlagStorage::new(path))
            }
            None => {
                info!("Using in-memory session storage (set SESSION_STORE_PATH to persist it)");
                Arc::new(InMemoryFlagStorage::new())
            }
        };

        let session = SessionGate::new(storage, config.credentials.clone())
            .with_login_delay(config.login_delay);
        let analyzer = ClaimAnalyzer::new(Arc::new(MockPredictionService::new()))
            .with_delay(config.prediction_delay);

        Self {
            session: Arc::new(session),
            analyzer: Arc::new(analyzer),
            dashboard: Arc::new(DashboardSummary::new(config.report_url.clone())),
            claims_csv_path: Arc::new(config.claims_csv_path.clone()),
        }
    }
}

pub fn create_app(config: &Config) -> Router {
    build_router(AppState::from_config(config))
}

pub fn build_router(app_state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/claims/form", get(claim_form))
        .route("/predictions", post(submit_prediction))
        .route("/predictions/state", get(prediction_state))
        .route("/predictions/history", get(prediction_history))
        .route("/predictions/summary", get(prediction_summary))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/claims", get(claims_preview))
        .route_layer(from_fn_with_state(app_state.clone(), require_session));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/session", get(session_status))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
        .merge(dashboard_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
        .with_state(app_state)
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

/// Dashboard routes render only behind an open session.
async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authenticated = state.session.is_authenticated().await.map_err(api_error)?;
    if !authenticated {
        warn!(path = %request.uri().path(), "request without session");
        return Err(unauthorized_error("Login required"));
    }
    Ok(next.run(request).await)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Claim Wise Fraud Analytics",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Insurance claim dashboard with mock fraud predictions. Predictions are randomly generated for demonstration purposes.",
        "endpoints": {
            "GET /session": "Session state and the view to render",
            "POST /session/login": "Open a session",
            "POST /session/logout": "Close the session",
            "GET /claims/form": "Default claim form and field bounds",
            "POST /predictions": "Analyze a claim",
            "GET /predictions/state": "Current submission state",
            "GET /predictions/history": "Last predictions, newest first",
            "GET /predictions/summary": "History statistics",
            "GET /dashboard": "Claims dataset indicators",
            "GET /dashboard/claims": "Claims dataset preview",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub view: View,
}

impl SessionResponse {
    fn from_authenticated(authenticated: bool) -> Self {
        Self {
            authenticated,
            view: if authenticated {
                View::Dashboard
            } else {
                View::Login
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

async fn session_status(State(state): State<AppState>) -> ApiResult<SessionResponse> {
    let authenticated = state.session.is_authenticated().await.map_err(api_error)?;
    Ok(Json(SessionResponse::from_authenticated(authenticated)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    state
        .session
        .login(&request.username, &request.password)
        .await
        .map_err(api_error)?;
    Ok(Json(SessionResponse::from_authenticated(true)))
}

async fn logout(State(state): State<AppState>) -> ApiResult<SessionResponse> {
    state.session.logout().await.map_err(api_error)?;
    Ok(Json(SessionResponse::from_authenticated(false)))
}

#[derive(Debug, Serialize)]
struct FormField {
    name: ClaimField,
    label: &'static str,
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ClaimForm {
    defaults: ClaimInput,
    fields: Vec<FormField>,
}

async fn claim_form() -> Json<ClaimForm> {
    let fields = ClaimField::ALL
        .into_iter()
        .map(|field| {
            let bounds = field.bounds();
            FormField {
                name: field,
                label: field.label(),
                min: bounds.min,
                max: bounds.max,
            }
        })
        .collect();

    Json(ClaimForm {
        defaults: ClaimInput::default(),
        fields,
    })
}

async fn submit_prediction(
    State(state): State<AppState>,
    Json(input): Json<ClaimInput>,
) -> ApiResult<PredictionResult> {
    let out_of_bounds = input.out_of_bounds();
    if !out_of_bounds.is_empty() {
        warn!(fields = ?out_of_bounds, "claim values outside form bounds");
    }

    let result = state.analyzer.submit(input).await.map_err(api_error)?;
    Ok(Json(result))
}

async fn prediction_state(State(state): State<AppState>) -> Json<SubmissionState> {
    Json(state.analyzer.state())
}

async fn prediction_history(State(state): State<AppState>) -> Json<Vec<PredictionHistoryEntry>> {
    Json(state.analyzer.history().await)
}

async fn prediction_summary(State(state): State<AppState>) -> Json<HistorySummary> {
    Json(state.analyzer.summary().await)
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    Json(DashboardSummary::clone(&state.dashboard))
}

async fn claims_preview(State(state): State<AppState>) -> Json<ClaimsTable> {
    Json(ClaimsTable::load_or_empty(state.claims_csv_path.as_path()).await)
}

//! # API REST
//!
//! REST API implementation for RxPad.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! All behaviour lives in `rxpad-core`; handlers only extract arguments and map
//! `PrescriptionError` onto status codes.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ErrorRes, GeneratePrescriptionReq, GeneratePrescriptionRes, HealthRes, HealthService, Patient,
};
use rxpad_core::{
    PrescriptionError, PrescriptionService, EMPTY_HISTORY_PLACEHOLDER, PATIENT_NOT_FOUND_MESSAGE,
};

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub prescriptions: PrescriptionService,
}

type ApiError = (StatusCode, Json<ErrorRes>);

#[derive(OpenApi)]
#[openapi(
    paths(health, list_patients, get_patient, history, generate_prescription),
    components(schemas(
        HealthRes,
        Patient,
        GeneratePrescriptionReq,
        GeneratePrescriptionRes,
        ErrorRes
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and a permissive CORS layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients))
        .route("/patients/:id", get(get_patient))
        .route("/history", get(history))
        .route("/generate_prescription", post(generate_prescription))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patients in load order", body = [Patient])
    )
)]
/// List all patients in the directory
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Json<Vec<Patient>> {
    Json(state.prescriptions.list_patients())
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient identifier (exact, case-sensitive)")
    ),
    responses(
        (status = 200, description = "Patient record", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Fetch a single patient by id
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    state
        .prescriptions
        .get_patient(&id)
        .map(Json)
        .map_err(error_response)
}

#[utoipa::path(
    get,
    path = "/history",
    responses(
        (
            status = 200,
            description = "Raw prescription history log",
            body = String,
            content_type = "text/plain"
        )
    )
)]
/// Return the prescription history log verbatim
///
/// Responds with a fixed placeholder when nothing has been recorded yet.
#[axum::debug_handler]
async fn history(State(state): State<AppState>) -> String {
    let history = state.prescriptions.history();
    if history.is_empty() {
        EMPTY_HISTORY_PLACEHOLDER.to_owned()
    } else {
        history
    }
}

#[utoipa::path(
    post,
    path = "/generate_prescription",
    request_body = GeneratePrescriptionReq,
    responses(
        (status = 200, description = "Prescription generated and recorded", body = GeneratePrescriptionRes),
        (status = 400, description = "patient_id or symptoms missing, or malformed body", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Generation or history log failure", body = ErrorRes)
    )
)]
/// Generate a prescription for a patient
///
/// Calls the text generation service once, applies the optional `final_prescription`
/// override and appends the result to the history log.
///
/// # Errors
/// - `400 Bad Request` if the body is not JSON or required fields are blank.
/// - `404 Not Found` if the patient is unknown.
/// - `500 Internal Server Error` if generation fails or the history log cannot be written. In
///   the latter case the body still carries the unrecorded prescription.
#[axum::debug_handler]
async fn generate_prescription(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePrescriptionReq>, JsonRejection>,
) -> Result<Json<GeneratePrescriptionRes>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!("Rejected prescription request body: {}", rejection);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorRes::new(rejection.body_text())),
        )
    })?;

    state
        .prescriptions
        .generate(req)
        .await
        .map(Json)
        .map_err(error_response)
}

fn error_response(err: PrescriptionError) -> ApiError {
    let detail = err.to_string();
    match err {
        PrescriptionError::InvalidInput(msg) => {
            (StatusCode::BAD_REQUEST, Json(ErrorRes::new(msg)))
        }
        PrescriptionError::PatientNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorRes::new(PATIENT_NOT_FOUND_MESSAGE)),
        ),
        PrescriptionError::HistoryAppend { outcome, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorRes {
                detail,
                generated: Some(outcome.generated),
                prescription: Some(outcome.prescription),
            }),
        ),
        other => {
            tracing::error!("Prescription request failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorRes::new(detail)))
        }
    }
}

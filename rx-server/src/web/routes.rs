//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::alternatives::AlternativesError;
use crate::analysis::{AnalysisReport, Upload, UploadError, analyze};
use crate::dashboard::Dashboard;
use crate::domain::{Coordinate, InvalidCoordinate};
use crate::facilities::FacilityError;
use crate::graph::{Criterion, UnknownCriterion};
use crate::routing::{HospitalRoutes, plan_routes};
use crate::store::{Medication, MedicationCache, Prescription, Reminder, StoreError};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Largest accepted request body (uploads included).
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Create the application router.
///
/// Saved uploads are served back from the state's upload directory.
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.upload_dir.as_path());

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/upload", post(upload_prescription))
        .route(
            "/prescriptions",
            get(list_prescriptions).post(create_prescription),
        )
        .route(
            "/medications",
            get(list_medications).post(create_medication),
        )
        .route("/reminders", get(list_reminders).post(create_reminder))
        .route("/alternatives", get(find_alternatives))
        .route("/dashboard", get(dashboard))
        .route("/get-hospital-graph", get(hospital_graph))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Backend is running",
    })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Analyse an uploaded prescription.
async fn upload_prescription(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| AppError::BadRequest {
            message: e.body_text(),
        })?;
        file = Some((name, bytes));
        break;
    }

    let (name, bytes) = file.ok_or(UploadError::MissingFile)?;
    let report = process_upload(&state, &name, bytes.to_vec()).await?;

    Ok(Json(report))
}

/// Save, analyse and record one upload.
async fn process_upload(
    state: &AppState,
    name: &str,
    bytes: Vec<u8>,
) -> Result<AnalysisReport, AppError> {
    let upload = Upload::new(name, bytes)?;

    let upload_dir = state.upload_dir.as_path();
    let saved = upload_dir.join(&upload.filename);
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| StoreError::io(upload_dir, e))?;
    tokio::fs::write(&saved, &upload.bytes)
        .await
        .map_err(|e| StoreError::io(&saved, e))?;

    let report = analyze(
        state.gemini.as_ref(),
        state.gemini.as_ref(),
        &state.generic_names,
        &upload,
    )
    .await;

    let output_dir = state.store.output_dir();
    let output = output_dir.join(format!("{}.json", upload.filename));
    let document = serde_json::to_vec_pretty(&report).map_err(|e| AppError::Internal {
        message: format!("Failed to serialise analysis: {e}"),
    })?;
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| StoreError::io(&output_dir, e))?;
    tokio::fs::write(&output, document)
        .await
        .map_err(|e| StoreError::io(&output, e))?;

    let record = Prescription {
        id: Uuid::new_v4(),
        filename: report.filename.clone(),
        extracted_text: report.extracted_text.clone(),
        structured_text: report.structured_text.clone(),
        generic_predictions: report.generic_predictions.clone(),
        created_at: Utc::now(),
    };
    state.store.prescriptions.insert(record).await?;

    info!(file = %upload.filename, output = %output.display(), "Upload processed");
    Ok(report)
}

async fn list_prescriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Prescription>>, AppError> {
    Ok(Json(state.store.prescriptions.load().await?))
}

async fn create_prescription(
    State(state): State<AppState>,
    Json(req): Json<NewPrescription>,
) -> Result<(StatusCode, Json<Prescription>), AppError> {
    if req.filename.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "filename is required".into(),
        });
    }

    let record = req.into_record(Utc::now());
    state.store.prescriptions.insert(record.clone()).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// List medications, optionally only those with a given name.
async fn list_medications(
    State(state): State<AppState>,
    Query(query): Query<MedicationQuery>,
) -> Result<Json<Vec<Medication>>, AppError> {
    let all = state.store.medications.load().await?;

    let Some(name) = query.name.filter(|n| !n.trim().is_empty()) else {
        return Ok(Json(all));
    };

    let cache = state.medication_cache.read().await;
    let ids = cache.lookup(&name);
    let matching = all.into_iter().filter(|m| ids.contains(&m.id)).collect();

    Ok(Json(matching))
}

async fn create_medication(
    State(state): State<AppState>,
    Json(req): Json<NewMedication>,
) -> Result<(StatusCode, Json<Medication>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "name is required".into(),
        });
    }

    let record = req.into_record(Utc::now());

    // The cache lock spans the insert so rebuilds land in write order.
    let mut cache = state.medication_cache.write().await;
    let all = state.store.medications.insert(record.clone()).await?;

    *cache = MedicationCache::rebuild(&all);
    cache.save(state.store.medication_cache_path()).await?;
    debug!(names = cache.len(), "Medication cache rebuilt");

    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_reminders(State(state): State<AppState>) -> Result<Json<Vec<Reminder>>, AppError> {
    Ok(Json(state.store.reminders.load().await?))
}

async fn create_reminder(
    State(state): State<AppState>,
    Json(req): Json<NewReminder>,
) -> Result<(StatusCode, Json<Reminder>), AppError> {
    if req.medication.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "medication is required".into(),
        });
    }

    let record = req.into_record(Utc::now());
    state.store.reminders.insert(record.clone()).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Other drug names for the same ingredient.
async fn find_alternatives(
    State(state): State<AppState>,
    Query(query): Query<AlternativesQuery>,
) -> Result<Json<AlternativesResponse>, AppError> {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "Medicine name is required".into(),
        })?;

    let alternatives = state.alternatives.alternatives(name).await?;

    Ok(Json(AlternativesResponse {
        name: name.to_string(),
        alternatives: alternatives.as_ref().clone(),
    }))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    let prescriptions = state.store.prescriptions.load().await?;
    let medications = state.store.medications.load().await?;
    let reminders = state.store.reminders.load().await?;

    Ok(Json(Dashboard::summarize(
        prescriptions,
        &medications,
        reminders,
        Utc::now(),
    )))
}

/// Nearby hospitals as a graph, plus the best one by the requested criterion.
async fn hospital_graph(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HospitalGraphQuery>,
) -> Result<Response, AppError> {
    let user = user_location(&query)?;
    let criterion = match query.criteria.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.parse::<Criterion>()?,
        _ => Criterion::default(),
    };

    let routes: HospitalRoutes = plan_routes(
        state.facilities.as_ref(),
        user,
        criterion,
        &state.routing,
        state.export,
    )
    .await?;

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = HospitalListTemplate::new(&routes, criterion.as_str());
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(routes).into_response())
    }
}

fn user_location(query: &HospitalGraphQuery) -> Result<Coordinate, AppError> {
    let (Some(lat), Some(lon)) = (query.lat.as_deref(), query.lon.as_deref()) else {
        return Err(AppError::BadRequest {
            message: "Latitude and longitude are required".into(),
        });
    };

    let parse = |label: &str, raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| AppError::BadRequest {
                message: format!("Invalid {label}: {raw}"),
            })
    };

    Ok(Coordinate::new(parse("latitude", lat)?, parse("longitude", lon)?)?)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<FacilityError> for AppError {
    fn from(e: FacilityError) -> Self {
        AppError::BadGateway {
            message: format!("Hospital lookup failed: {e}"),
        }
    }
}

impl From<AlternativesError> for AppError {
    fn from(e: AlternativesError) -> Self {
        AppError::BadGateway {
            message: format!("Alternatives lookup failed: {e}"),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<UnknownCriterion> for AppError {
    fn from(e: UnknownCriterion) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

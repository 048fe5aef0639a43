use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use anyhow::Context;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use models::errors::RegistryError;
use models::patient::{Patient, PatientUpdate, PatientView};
use storage::sort::{SortField, SortOrder};
use storage::store::{Collection, PatientStore};

pub mod config;
use crate::config::RestApiConfig;

// Define the REST API error enum
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// Implement IntoResponse for ApiError to convert it into an HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Registry(err) = self;
        let status = match &err {
            RegistryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Conflict(_) => StatusCode::BAD_REQUEST,
            RegistryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            RegistryError::Storage(_) | RegistryError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": err.to_string(),
        }));

        (status, body).into_response()
    }
}

// Shared state for the Axum application
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn PatientStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        AppState { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    sort_by: String,
    #[serde(default = "default_order")]
    order: String,
}

fn default_order() -> String {
    "asc".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    patient_id: String,
}

// Handler for the / endpoint
async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Patient Management System API" }))
}

// Handler for the /about endpoint
async fn about_handler() -> Json<Value> {
    Json(json!({ "message": "A fully functional API to manage your patient records" }))
}

// Handler for the /view endpoint: the stored document as-is, derived fields
// excluded.
async fn view_handler(State(state): State<AppState>) -> Result<Json<Collection>, ApiError> {
    Ok(Json(state.store.view_all().await?))
}

// Handler for the /patient/{id} endpoint
async fn view_patient_handler(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientView>, ApiError> {
    Ok(Json(state.store.get(&patient_id).await?))
}

// Handler for the /sort endpoint
async fn sort_handler(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<PatientView>>, ApiError> {
    let field = SortField::from_str(&params.sort_by)?;
    let order = SortOrder::from_str(&params.order)?;
    Ok(Json(state.store.sorted_view(field, order).await?))
}

// Handler for the /add endpoint
async fn create_patient_handler(
    State(state): State<AppState>,
    Json(patient): Json<Patient>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state.store.insert(patient).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Patient added successfully"
        })),
    ))
}

// Handler for the /update endpoint
async fn update_patient_handler(
    State(state): State<AppState>,
    Query(params): Query<UpdateParams>,
    Json(patch): Json<PatientUpdate>,
) -> Result<Json<Value>, ApiError> {
    state.store.update(&params.patient_id, patch).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Patient updated successfully"
    })))
}

// Handler for the /delete/{id} endpoint
async fn delete_patient_handler(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(&patient_id).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Patient deleted successfully"
    })))
}

/// Builds the application router over the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/about", get(about_handler))
        .route("/view", get(view_handler))
        .route("/patient/:patient_id", get(view_patient_handler))
        .route("/sort", get(sort_handler))
        .route("/add", post(create_patient_handler))
        .route("/update", put(update_patient_handler))
        .route("/delete/:patient_id", delete(delete_patient_handler))
        .with_state(state)
        .layer(cors)
}

// Main function to start the REST API server
pub async fn start_server(
    config: &RestApiConfig,
    store: Arc<dyn PatientStore>,
    shutdown_rx: oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let app = router(AppState::new(store));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid host/port for REST API listener")?;
    info!("Patient registry REST API listening on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
            info!("Received shutdown signal.");
        })
        .await
        .context("REST API server failed to start or run")?;

    info!("REST API server stopped.");
    Ok(())
}

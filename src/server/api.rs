//! Note API.
//!
//! - POST /submit_note
//! - GET /notes
//! - POST /summarize
//! - GET /ws
//! - GET /health
//! - GET /metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::broadcast::Broadcaster;
use crate::config::{Config, Pipeline};
use crate::formatter::Formatter;
use crate::inference::engine::{ModelHandle, ModelOp};
use crate::inference::model::{ModelError, NoteModel};
use crate::metrics::Metrics;
use crate::server::error::ApiError;
use crate::server::ws::ws_upgrade;
use crate::store::{Note, NoteStore};

/// Acknowledgement returned by `/submit_note`.
pub const SAVED_MESSAGE: &str = "Note saved successfully";

/// Application state shared across handlers.
pub struct AppState {
    pub model: ModelHandle,
    pub formatter: Formatter,
    pub pipeline: Pipeline,
    pub store: NoteStore,
    pub broadcaster: Broadcaster,
    pub metrics: Metrics,
    pub start_time: Instant,
}

impl AppState {
    /// Assemble state around an already loaded model.
    pub async fn new(config: &Config, model: Arc<dyn NoteModel>) -> anyhow::Result<Self> {
        let store = NoteStore::open(&config.storage.data_file).await?;

        Ok(Self {
            model: ModelHandle::spawn(model, config.model.queue_depth),
            formatter: Formatter::new(config.notes.title.clone()),
            pipeline: config.notes.pipeline,
            store,
            broadcaster: Broadcaster::new(config.broadcast.queue_capacity),
            metrics: Metrics::new()?,
            start_time: Instant::now(),
        })
    }

    /// Run `op` through the model worker, counting the outcome.
    async fn infer(&self, request_id: &str, op: ModelOp, text: String) -> Result<String, ModelError> {
        let result = self.model.run(request_id, op, text).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        self.metrics
            .model_requests
            .with_label_values(&[op.as_str(), outcome])
            .inc();
        result
    }

    /// Turn submitted text into a note and persist it.
    pub async fn submit(&self, request_id: &str, text: String) -> Result<Note, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::EmptyText);
        }

        let body = match self.pipeline {
            Pipeline::Structure => {
                let raw = self.infer(request_id, ModelOp::Generate, text).await?;
                self.formatter.format(&raw)
            }
            Pipeline::Summarize => self.infer(request_id, ModelOp::Summarize, text).await?,
        };

        let note = self.store.append(body).await?;
        self.metrics.notes_submitted.inc();
        Ok(note)
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let http = Router::new()
        .route("/submit_note", post(submit_note))
        .route("/notes", get(list_notes))
        .route("/summarize", post(summarize))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/ws", get(ws_upgrade))
        .merge(http)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Request/Response Types ────────────────────────────────────────────────

/// Form body carrying the note text.
#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub model: String,
    pub notes: usize,
    pub connections: usize,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn submit_note(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NoteForm>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    info!(
        request_id = request_id,
        chars = form.text.len(),
        pipeline = ?state.pipeline,
        "Received note"
    );

    let note = state.submit(&request_id, form.text).await?;

    info!(request_id = request_id, id = note.id, "Note saved");

    Ok(Json(SubmitResponse {
        message: SAVED_MESSAGE.to_string(),
    }))
}

async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NoteForm>,
) -> Result<Json<SummaryResponse>, ApiError> {
    if form.text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }

    let request_id = Uuid::new_v4().to_string();
    info!(request_id = request_id, chars = form.text.len(), "Summary request");

    let summary = state
        .infer(&request_id, ModelOp::Summarize, form.text)
        .await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        model: state.model.model_name().to_string(),
        notes: state.store.list().await?.len(),
        connections: state.broadcaster.len().await,
    }))
}

async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics.render()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

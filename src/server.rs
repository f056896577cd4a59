//! JSON-over-HTTP surface for the browser UI.
//!
//! Requests the core silently ignores (blank input, busy feature,
//! cancelled analysis) answer `204 No Content`. State changes are pushed to
//! the UI as server-sent events on `/api/events`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::assistant::{LabAssistant, Stats};
use crate::catalog::{self, CATEGORIES, DIFFICULTIES, Experiment, ExperimentQuery};
use crate::diagnosis::{DiagnosisResult, QUICK_TIPS, QuickTip};
use crate::error::Rejection;
use crate::message::Message;
use crate::recognition::{ImagePayload, RECENT_RECOGNITIONS, RecentRecognition, RecognitionResult};
use crate::settings::{PreferencesPatch, Settings};

type Shared = Arc<LabAssistant>;

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        debug!(reason = %self, "request ignored");
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Build the API router over a shared [`LabAssistant`].
pub fn router(assistant: Shared) -> Router {
    let upload_limit = assistant.upload_limit();
    Router::new()
        .route("/api/messages", get(messages))
        .route("/api/chat", post(chat))
        .route("/api/chat/suggestions", get(suggestions))
        .route("/api/diagnose", post(diagnose))
        .route("/api/diagnose/tips", get(tips))
        .route("/api/recognize", post(recognize))
        .route(
            "/api/recognize/image",
            put(load_image)
                .delete(clear_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/recognize/recent", get(recent))
        .route("/api/experiments", get(experiments))
        .route("/api/experiments/:id", get(experiment))
        .route("/api/filters", get(filters))
        .route("/api/settings", get(settings).put(update_settings))
        .route("/api/stats", get(stats))
        .route("/api/events", get(events))
        .with_state(assistant)
}

/// Bind `addr` and serve the API on a background task.
pub async fn run_server(assistant: Shared, addr: SocketAddr) -> anyhow::Result<JoinHandle<()>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = router(assistant);
    Ok(tokio::spawn(async move {
        info!(%addr, "serving lab assistant api");
        if let Err(e) = axum::serve(listener, app).await {
            error!(?e, "server stopped");
        }
    }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct DiagnoseRequest {
    symptoms: String,
}

#[derive(Debug, Serialize)]
struct Filters {
    categories: [&'static str; 5],
    difficulties: [&'static str; 4],
}

async fn messages(State(a): State<Shared>) -> Json<Vec<Message>> {
    Json(a.chat.history())
}

async fn chat(
    State(a): State<Shared>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Message>, Rejection> {
    a.chat.send(&req.text).await.map(Json)
}

async fn suggestions(State(a): State<Shared>) -> Json<Vec<&'static str>> {
    Json(a.chat.suggestions())
}

async fn diagnose(
    State(a): State<Shared>,
    Json(req): Json<DiagnoseRequest>,
) -> Result<Json<DiagnosisResult>, Rejection> {
    a.diagnosis.diagnose(&req.symptoms).await.map(Json)
}

async fn tips() -> Json<&'static [QuickTip]> {
    Json(&QUICK_TIPS[..])
}

async fn load_image(
    State(a): State<Shared>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, Rejection> {
    let mut image = ImagePayload::new(body.to_vec());
    if let Some(ct) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        image = image.with_content_type(ct);
    }
    a.recognition.load(image)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_image(State(a): State<Shared>) -> StatusCode {
    a.recognition.clear();
    StatusCode::NO_CONTENT
}

async fn recognize(State(a): State<Shared>) -> Result<Json<RecognitionResult>, Rejection> {
    a.recognition.analyze().await.map(Json)
}

async fn recent() -> Json<&'static [RecentRecognition]> {
    Json(&RECENT_RECOGNITIONS[..])
}

async fn experiments(
    State(a): State<Shared>,
    Query(q): Query<ExperimentQuery>,
) -> Json<Vec<&'static Experiment>> {
    Json(q.apply(a.experiments()))
}

async fn experiment(
    State(a): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<&'static Experiment>, StatusCode> {
    catalog::find(a.experiments(), &id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn filters() -> Json<Filters> {
    Json(Filters {
        categories: CATEGORIES,
        difficulties: DIFFICULTIES,
    })
}

async fn settings(State(a): State<Shared>) -> Json<Settings> {
    Json(a.settings.get())
}

async fn update_settings(
    State(a): State<Shared>,
    Json(patch): Json<PreferencesPatch>,
) -> Json<Settings> {
    Json(a.settings.update(patch))
}

async fn stats(State(a): State<Shared>) -> Json<Stats> {
    Json(a.stats())
}

async fn events(
    State(a): State<Shared>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = BroadcastStream::new(a.events().subscribe())
        .filter_map(|evt| match evt {
            Ok(evt) => Some(evt),
            Err(e) => {
                warn!(?e, "event subscriber lagged");
                None
            }
        })
        .map(|evt| Event::default().json_data(evt));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

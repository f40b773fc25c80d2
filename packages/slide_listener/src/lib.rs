//! Slide Listener - the local endpoint slide-change notifications are sent to
//!
//! Serves `GET /slide-change?hash=#slide=id.<objectId>` on 127.0.0.1:8765,
//! maps the slide object id to its index and broadcasts a [`SlideEvent`] to
//! whoever in the process wants to react to slide changes.

pub mod mapping;

pub use mapping::{DEFAULT_SLIDE_INDEX, SlideMapping};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{RwLock, broadcast};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Hash prefix carrying a slide object id.
pub const SLIDE_OBJECT_PREFIX: &str = "#slide=id.";

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The presenter moved to another slide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlideEvent {
    pub slide_id: String,
    pub index: usize,
}

#[derive(Clone)]
pub struct ListenerState {
    pub mapping: Arc<RwLock<SlideMapping>>,
    events: broadcast::Sender<SlideEvent>,
}

impl ListenerState {
    pub fn new(mapping: SlideMapping) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            mapping: Arc::new(RwLock::new(mapping)),
            events,
        }
    }

    /// Subscribe to slide changes received from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SlideEvent> {
        self.events.subscribe()
    }

    /// Apply a received hash. Returns the event when it named a slide object.
    pub async fn apply_hash(&self, raw_hash: &str) -> Option<SlideEvent> {
        let Some(slide_id) = slide_object_id(raw_hash) else {
            info!("Received non-slide hash: {:?}", raw_hash);
            return None;
        };

        let index = self.mapping.write().await.update_current_slide(slide_id);
        info!("Received hash {:?} -> slide {:?} (index {})", raw_hash, slide_id, index);

        let event = SlideEvent {
            slide_id: slide_id.to_string(),
            index,
        };
        // No subscribers is fine.
        let _ = self.events.send(event.clone());
        Some(event)
    }
}

/// Object id from `#slide=id.<objectId>`, if the hash has that shape.
pub fn slide_object_id(raw_hash: &str) -> Option<&str> {
    raw_hash.strip_prefix(SLIDE_OBJECT_PREFIX)
}

pub fn create_router(state: ListenerState) -> Router {
    Router::new()
        .route("/slide-change", get(slide_change).options(slide_options))
        .route("/current", get(current_slide))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: ListenerState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[derive(Deserialize)]
struct SlideChangeQuery {
    #[serde(default)]
    hash: String,
}

async fn slide_change(
    State(state): State<ListenerState>,
    Query(params): Query<SlideChangeQuery>,
) -> impl IntoResponse {
    state.apply_hash(&params.hash).await;
    "ok"
}

async fn slide_options() -> impl IntoResponse {
    debug!("OPTIONS /slide-change");
    StatusCode::OK
}

async fn current_slide(State(state): State<ListenerState>) -> impl IntoResponse {
    let mapping = state.mapping.read().await;
    Json(serde_json::json!({
        "slide_id": mapping.current_slide_id(),
        "index": mapping.current_slide_index(),
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

use crate::room_store::{RoomStore, StoreError};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use padlink_core::{HostKey, JoinKey, RoomCredentials, RoomId, SessionDescription};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Every response carries `Cache-Control: no-store`; clients poll for values to appear.
fn reply<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    reply(status, json!({ "error": message }))
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match self {
            StoreError::RoomNotFound => StatusCode::NOT_FOUND,
            StoreError::InvalidKey => StatusCode::FORBIDDEN,
            StoreError::AlreadyPublished => StatusCode::CONFLICT,
        };
        error_reply(status, &self.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomResponse {
    #[serde(flatten)]
    credentials: RoomCredentials,
    ttl_seconds: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishOfferRequest {
    #[serde(default)]
    room_id: String,
    #[serde(default)]
    host_key: String,
    #[serde(default)]
    offer: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishAnswerRequest {
    #[serde(default)]
    room_id: String,
    #[serde(default)]
    join_key: String,
    #[serde(default)]
    answer: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomQuery {
    #[serde(default)]
    room_id: String,
}

async fn create_room(State(store): State<Arc<RoomStore>>) -> Response {
    let credentials = store.create_room();
    reply(
        StatusCode::OK,
        CreateRoomResponse {
            credentials,
            ttl_seconds: store.config().room_ttl.as_secs(),
        },
    )
}

async fn publish_offer(
    State(store): State<Arc<RoomStore>>,
    Json(body): Json<PublishOfferRequest>,
) -> Response {
    if body.room_id.is_empty() || body.host_key.is_empty() || body.offer.is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "missing fields");
    }

    let room_id = RoomId(body.room_id);
    match store.publish_offer(&room_id, &HostKey(body.host_key), SessionDescription::from(body.offer)) {
        Ok(()) => reply(StatusCode::OK, json!({ "ok": true })),
        Err(e) => {
            warn!("Rejected offer for room {}: {}", room_id, e);
            e.into_response()
        }
    }
}

async fn publish_answer(
    State(store): State<Arc<RoomStore>>,
    Json(body): Json<PublishAnswerRequest>,
) -> Response {
    if body.room_id.is_empty() || body.join_key.is_empty() || body.answer.is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "missing fields");
    }

    let room_id = RoomId(body.room_id);
    match store.publish_answer(&room_id, &JoinKey(body.join_key), SessionDescription::from(body.answer)) {
        Ok(()) => reply(StatusCode::OK, json!({ "ok": true })),
        Err(e) => {
            warn!("Rejected answer for room {}: {}", room_id, e);
            e.into_response()
        }
    }
}

async fn fetch_offer(State(store): State<Arc<RoomStore>>, Query(query): Query<RoomQuery>) -> Response {
    if query.room_id.is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "roomId is required");
    }
    let offer = store.offer(&RoomId(query.room_id));
    reply(StatusCode::OK, json!({ "offer": offer }))
}

async fn fetch_answer(State(store): State<Arc<RoomStore>>, Query(query): Query<RoomQuery>) -> Response {
    if query.room_id.is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "roomId is required");
    }
    let answer = store.answer(&RoomId(query.room_id));
    reply(StatusCode::OK, json!({ "answer": answer }))
}

/// The `/api/rtc/*` routes over `store`, open to any origin.
pub fn router(store: Arc<RoomStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/rtc/create", post(create_room))
        .route("/api/rtc/offer", post(publish_offer).get(fetch_offer))
        .route("/api/rtc/answer", post(publish_answer).get(fetch_answer))
        .layer(cors)
        .with_state(store)
}

/// Serve the store on `listener` until the task is dropped or the listener fails.
pub async fn serve(listener: TcpListener, store: Arc<RoomStore>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Signaling server listening on http://{}", addr);
    }
    axum::serve(listener, router(store)).await
}

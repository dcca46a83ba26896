use crate::signaling::SignalingClient;
use async_trait::async_trait;
use padlink_core::{HostKey, JoinKey, RoomCredentials, RoomId, SessionDescription, SignalingError};
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

const CREATE_PATH: &str = "/api/rtc/create";
const OFFER_PATH: &str = "/api/rtc/offer";
const ANSWER_PATH: &str = "/api/rtc/answer";

#[derive(Debug, Clone)]
pub struct HttpSignalingConfig {
    /// Origin serving the `/api/rtc/*` endpoints.
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl HttpSignalingConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishOfferBody<'a> {
    room_id: &'a RoomId,
    host_key: &'a HostKey,
    offer: &'a SessionDescription,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishAnswerBody<'a> {
    room_id: &'a RoomId,
    join_key: &'a JoinKey,
    answer: &'a SessionDescription,
}

// Browser peers may have published the description as an object rather than a string.
#[derive(Deserialize)]
struct OfferResponse {
    #[serde(default)]
    offer: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct AnswerResponse {
    #[serde(default)]
    answer: Option<serde_json::Value>,
}

fn into_description(value: Option<serde_json::Value>) -> Option<SessionDescription> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(SessionDescription::from(s)),
        other => Some(SessionDescription::from(other.to_string())),
    }
}

fn unavailable(e: impl std::fmt::Display) -> SignalingError {
    SignalingError::Unavailable(e.to_string())
}

/// [`SignalingClient`] over the JSON HTTP room store served by `padlink-signaling`.
#[derive(Clone)]
pub struct HttpSignalingClient {
    client: Client,
    base_url: Url,
}

impl HttpSignalingClient {
    pub fn new(config: HttpSignalingConfig) -> Result<Self, SignalingError> {
        // Polls watch for a value to appear, so nothing between us and the store may cache.
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(unavailable)?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SignalingError> {
        self.base_url.join(path).map_err(unavailable)
    }

    async fn publish<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), SignalingError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(SignalingError::RoomNotFound),
            s => Err(status_error(s)),
        }
    }

    /// `None` for 404 so that an unknown or expired room reads the same as "not yet published".
    async fn fetch(&self, path: &str, room_id: &RoomId) -> Result<Option<Response>, SignalingError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().append_pair("roomId", room_id.as_str());

        let response = self.client.get(url).send().await.map_err(unavailable)?;

        match response.status() {
            s if s.is_success() => Ok(Some(response)),
            StatusCode::NOT_FOUND => Ok(None),
            s => Err(status_error(s)),
        }
    }
}

fn status_error(status: StatusCode) -> SignalingError {
    match status {
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => SignalingError::Unauthorized,
        StatusCode::CONFLICT => SignalingError::AlreadyPublished,
        s => SignalingError::Unavailable(format!("signaling responded {s}")),
    }
}

#[async_trait]
impl SignalingClient for HttpSignalingClient {
    async fn create_room(&self) -> Result<RoomCredentials, SignalingError> {
        let response = self
            .client
            .post(self.endpoint(CREATE_PATH)?)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignalingError::Unavailable(format!("create room responded {status}")));
        }

        let credentials: RoomCredentials = response.json().await.map_err(unavailable)?;
        debug!("Created room {}", credentials.room_id);
        Ok(credentials)
    }

    async fn publish_offer(
        &self,
        room_id: &RoomId,
        host_key: &HostKey,
        offer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        let body = PublishOfferBody {
            room_id,
            host_key,
            offer,
        };
        self.publish(OFFER_PATH, &body).await
    }

    async fn fetch_offer(&self, room_id: &RoomId) -> Result<Option<SessionDescription>, SignalingError> {
        let Some(response) = self.fetch(OFFER_PATH, room_id).await? else {
            return Ok(None);
        };
        let body: OfferResponse = response.json().await.map_err(unavailable)?;
        Ok(into_description(body.offer))
    }

    async fn publish_answer(
        &self,
        room_id: &RoomId,
        join_key: &JoinKey,
        answer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        let body = PublishAnswerBody {
            room_id,
            join_key,
            answer,
        };
        self.publish(ANSWER_PATH, &body).await
    }

    async fn fetch_answer(&self, room_id: &RoomId) -> Result<Option<SessionDescription>, SignalingError> {
        let Some(response) = self.fetch(ANSWER_PATH, room_id).await? else {
            return Ok(None);
        };
        let body: AnswerResponse = response.json().await.map_err(unavailable)?;
        Ok(into_description(body.answer))
    }
}

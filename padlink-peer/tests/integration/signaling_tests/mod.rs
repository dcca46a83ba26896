mod test_http_handshake;
mod test_http_signaling_client;

use anyhow::Result;
use padlink_peer::{HttpSignalingClient, HttpSignalingConfig};
use padlink_signaling::{RoomStore, StoreConfig, serve};
use std::sync::Arc;
use tokio::net::TcpListener;
use url::Url;

/// Start a signaling server on an ephemeral port and return a client for it.
pub async fn start_signaling() -> Result<HttpSignalingClient> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = Url::parse(&format!("http://{}", listener.local_addr()?))?;
    let store = Arc::new(RoomStore::new(StoreConfig::default()));
    tokio::spawn(serve(listener, store));

    Ok(HttpSignalingClient::new(HttpSignalingConfig::new(base_url))?)
}

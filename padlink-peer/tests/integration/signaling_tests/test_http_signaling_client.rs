use anyhow::Result;
use padlink_core::{HostKey, RoomId, SessionDescription, SignalingError};
use padlink_peer::{HttpSignalingClient, HttpSignalingConfig, SignalingClient};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

use super::start_signaling;
use crate::integration::{ANSWER_B, OFFER_A, init_tracing};

#[tokio::test]
async fn test_client_round_trip() -> Result<()> {
    init_tracing();
    let client = start_signaling().await?;

    let creds = client.create_room().await?;
    assert_eq!(client.fetch_offer(&creds.room_id).await?, None);
    assert_eq!(client.fetch_answer(&creds.room_id).await?, None);

    client
        .publish_offer(&creds.room_id, &creds.host_key, &OFFER_A.into())
        .await?;
    assert_eq!(
        client.fetch_offer(&creds.room_id).await?,
        Some(SessionDescription::from(OFFER_A))
    );

    client
        .publish_answer(&creds.room_id, &creds.join_key, &ANSWER_B.into())
        .await?;
    assert_eq!(
        client.fetch_answer(&creds.room_id).await?,
        Some(SessionDescription::from(ANSWER_B))
    );

    Ok(())
}

#[tokio::test]
async fn test_client_maps_rejections() -> Result<()> {
    init_tracing();
    let client = start_signaling().await?;
    let creds = client.create_room().await?;

    let wrong_key = client
        .publish_offer(&creds.room_id, &HostKey::from("guess"), &OFFER_A.into())
        .await;
    assert!(matches!(wrong_key, Err(SignalingError::Unauthorized)));

    client
        .publish_offer(&creds.room_id, &creds.host_key, &OFFER_A.into())
        .await?;
    let second = client
        .publish_offer(&creds.room_id, &creds.host_key, &"OFFER_X".into())
        .await;
    assert!(matches!(second, Err(SignalingError::AlreadyPublished)));

    let missing = RoomId::from("missing");
    let unknown_room = client
        .publish_offer(&missing, &creds.host_key, &OFFER_A.into())
        .await;
    assert!(matches!(unknown_room, Err(SignalingError::RoomNotFound)));
    assert_eq!(client.fetch_offer(&missing).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() -> Result<()> {
    init_tracing();

    // Grab a free port, then close it again.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let mut config = HttpSignalingConfig::new(Url::parse(&format!("http://{addr}"))?);
    config.request_timeout = Duration::from_secs(2);
    let client = HttpSignalingClient::new(config)?;

    assert!(matches!(client.create_room().await, Err(SignalingError::Unavailable(_))));
    assert!(matches!(
        client.fetch_answer(&RoomId::from("r1")).await,
        Err(SignalingError::Unavailable(_))
    ));

    Ok(())
}

use padlink_core::{NegotiationError, SignalingError};
use padlink_peer::{GuestState, HostState, PollPolicy, SignalingClient};
use std::time::Duration;

use crate::integration::{MockPair, OFFER_A, init_tracing};
use crate::utils::MockTransport;

#[tokio::test]
async fn test_create_room_failure_is_fatal() {
    init_tracing();

    let pair = MockPair::new();
    pair.signaling.fail_create();
    let host = pair.host();

    let err = host.run().await.err().expect("negotiation should fail");

    assert!(err.is_signaling_unavailable());
    assert!(err.status_message().contains("signaling unavailable"));
    assert!(matches!(host.state(), HostState::Failed(msg) if msg.contains("signaling unavailable")));
    assert_eq!(pair.journal.entries(), vec!["signaling:create_room".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_failures_are_retried() {
    init_tracing();

    let pair = MockPair::new();
    let creds = pair.signaling.credentials().clone();
    pair.signaling
        .publish_offer(&creds.room_id, &creds.host_key, &OFFER_A.into())
        .await
        .unwrap();

    let guest = pair.guest();
    pair.signaling.fail_fetches(3);
    let session = guest.run().await.expect("guest should ride out the outage");

    assert_eq!(session.poll_stats.failures, 3);
    assert_eq!(session.poll_stats.attempts, 4);
    assert_eq!(guest.state(), GuestState::Connected);
}

#[tokio::test(start_paused = true)]
async fn test_host_poll_times_out_without_guest() {
    init_tracing();

    let pair = MockPair::new();
    let host = pair
        .host()
        .with_poll_policy(PollPolicy::default().with_timeout(Duration::from_secs(31)));

    let err = host.run().await.err().expect("poll should time out");

    assert!(matches!(err, NegotiationError::PollTimeout(d) if d == Duration::from_secs(31)));
    assert!(!err.is_signaling_unavailable());
    assert!(matches!(host.state(), HostState::Failed(_)));
    assert_eq!(pair.journal.count("signaling:publish_offer"), 1);
    assert_eq!(pair.journal.count("signaling:fetch_answer"), 25);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_join_key_is_not_retried() {
    init_tracing();

    let pair = MockPair::new();
    let host = pair
        .host()
        .with_poll_policy(PollPolicy::default().with_timeout(Duration::from_secs(5)));
    let guest = pair.guest_with_key("not-the-key");

    let (_, guest_result) = tokio::join!(host.run(), guest.run());
    let err = guest_result.err().expect("publish should be rejected");

    assert!(matches!(err, NegotiationError::Signaling(SignalingError::Unauthorized)));
    assert_eq!(pair.journal.count("signaling:publish_answer"), 1);
    assert!(matches!(guest.state(), GuestState::Failed(_)));
}

#[tokio::test]
async fn test_gathering_failure_stops_before_publish() {
    init_tracing();

    let mut pair = MockPair::new();
    pair.host_transport = MockTransport::new("host", OFFER_A, pair.journal.clone()).failing_gathering();
    let host = pair.host();

    let err = host.run().await.err().expect("gathering failure is fatal");

    assert!(matches!(err, NegotiationError::Transport(_)));
    assert_eq!(pair.journal.count("signaling:publish_offer"), 0);
    assert!(pair.signaling.offer().is_none());
}

use crate::integration::{MockPair, init_tracing};

#[tokio::test(start_paused = true)]
async fn test_host_attaches_everything_before_generating_offer() {
    init_tracing();

    let pair = MockPair::new();
    let (host, guest) = (pair.host(), pair.guest());
    let (host_result, guest_result) = tokio::join!(host.run(), guest.run());
    host_result.unwrap();
    guest_result.unwrap();

    pair.journal.assert_order(&[
        "signaling:create_room",
        "host:attach_media",
        "host:create_control_channel",
        "host:create_offer",
        "host:wait_gathering_complete",
        "host:local_description",
        "signaling:publish_offer",
        "signaling:fetch_answer",
        "host:set_remote_description(answer)",
    ]);
}

#[tokio::test(start_paused = true)]
async fn test_guest_applies_offer_before_publishing_answer() {
    init_tracing();

    let pair = MockPair::new();
    let (host, guest) = (pair.host(), pair.guest());
    let (host_result, guest_result) = tokio::join!(host.run(), guest.run());
    host_result.unwrap();
    guest_result.unwrap();

    pair.journal.assert_order(&[
        "signaling:publish_offer",
        "guest:set_remote_description(offer)",
        "guest:create_answer",
        "guest:wait_gathering_complete",
        "guest:local_description",
        "signaling:publish_answer",
    ]);

    // The guest never creates a channel of its own.
    assert_eq!(pair.journal.count("guest:create_control_channel"), 0);
    assert_eq!(pair.journal.count("guest:attach_media"), 0);
}

use bytes::Bytes;
use padlink_core::{ButtonState, HeldKeys, Key, KeyboardSampler};
use padlink_peer::{
    ChannelState, ControlToggle, GuestSender, HostReceiver, InputSampler, TransportEvent, VirtualPad,
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::integration::{ANSWER_B, init_tracing};
use crate::utils::{Journal, MockChannel, MockTransport};

#[tokio::test]
async fn test_keyboard_input_reaches_host_pad() {
    init_tracing();

    let channel = MockChannel::new(ChannelState::Open);
    let transport =
        MockTransport::new("guest", ANSWER_B, Journal::new()).with_remote_channel(Arc::clone(&channel));
    let held = HeldKeys::new();
    let mut sender = GuestSender::new(
        Arc::new(transport),
        InputSampler::keyboard_only(KeyboardSampler::new(held.clone())),
        ControlToggle::new(true),
    );

    let (events_tx, mut events_rx) = mpsc::channel(16);
    let mut receiver = HostReceiver::new(VirtualPad::new());

    held.press(Key::W);
    held.press(Key::Enter);
    sender.tick().await;

    held.release(Key::Enter);
    held.press(Key::A);
    sender.tick().await;

    events_tx
        .send(TransportEvent::Message(Bytes::from_static(b"\x00\x01 not json")))
        .await
        .unwrap();
    for text in channel.take_sent() {
        events_tx.send(TransportEvent::Message(Bytes::from(text))).await.unwrap();
    }
    events_tx.send(TransportEvent::ControlChannelClosed).await.unwrap();

    let stats = receiver.run(&mut events_rx).await;

    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.field_failures, 0);

    let pad = receiver.actuator();
    assert_eq!(pad.axis(0), Some(-1.0));
    assert_eq!(pad.axis(1), Some(-1.0));
    assert_eq!(pad.button(9), Some(ButtonState::RELEASED));
}

#[tokio::test]
async fn test_browser_payload_is_applied() {
    init_tracing();

    let mut receiver = HostReceiver::new(VirtualPad::new());
    let report = receiver
        .handle_message(br#"{"t":"pad","s":{"axes":[1,-1,0,0],"buttons":[{"pressed":true,"value":1}]}}"#)
        .expect("pad message should apply");

    assert_eq!(report.axes_applied, 4);
    assert_eq!(report.buttons_applied, 1);

    let pad = receiver.actuator();
    assert_eq!(pad.axis(0), Some(1.0));
    assert_eq!(pad.axis(1), Some(-1.0));
    assert_eq!(pad.button(0), Some(ButtonState::digital(true)));
    assert_eq!(pad.button(1), Some(ButtonState::RELEASED));
}

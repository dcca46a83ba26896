use anyhow::{Context, Result, bail};
use padlink_core::{HeldKeys, Invite, JoinKey, Key, KeyboardSampler};
use padlink_peer::{
    ChannelState, ControlChannel, ControlToggle, GuestNegotiator, GuestSender, HostNegotiator, HostReceiver,
    InputSampler, PollPolicy, SessionTransport, TickOutcome, TransportConfig, TransportEvent,
    VirtualPad, WebRtcTransport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::integration::{init_tracing, invite_base};
use crate::utils::{Journal, MockSignaling};

fn local_config() -> TransportConfig {
    TransportConfig {
        ice_servers: vec![],
        ..TransportConfig::default()
    }
}

async fn wait_for_open(transport: &WebRtcTransport) -> Result<()> {
    timeout(Duration::from_secs(10), async {
        loop {
            if let Some(channel) = transport.control_channel().await {
                if channel.state() == ChannelState::Open {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .context("guest control channel never opened")
}

#[tokio::test]
async fn test_control_input_over_real_peer_connection() -> Result<()> {
    init_tracing();

    let signaling = Arc::new(MockSignaling::new(Journal::new()));
    let fast = PollPolicy {
        interval: Duration::from_millis(50),
        max_interval: Duration::from_millis(50),
        ..PollPolicy::default()
    }
    .with_timeout(Duration::from_secs(10));

    let (host_tx, mut host_rx) = mpsc::channel(256);
    let host_transport = Arc::new(WebRtcTransport::new(local_config(), host_tx).await?);
    let (guest_tx, _guest_rx) = mpsc::channel(256);
    let guest_transport = Arc::new(WebRtcTransport::new(local_config(), guest_tx).await?);

    let host = HostNegotiator::new(signaling.clone(), host_transport.clone(), invite_base())
        .with_poll_policy(fast);
    let invite = Invite::new(invite_base(), "r1".into(), JoinKey::from("jk"));
    let guest = GuestNegotiator::new(signaling.clone(), guest_transport.clone(), invite)
        .with_poll_policy(fast);

    let (host_result, guest_result) = tokio::join!(host.run(), guest.run());
    host_result?;
    guest_result?;

    let offer = signaling.offer().context("offer was never published")?;
    let offer: serde_json::Value = serde_json::from_str(offer.as_str())?;
    assert_eq!(offer["type"], "offer");
    assert!(offer["sdp"].as_str().unwrap_or_default().contains("a=candidate"));

    wait_for_open(&guest_transport).await?;

    let held = HeldKeys::new();
    held.press(Key::D);
    held.press(Key::Space);
    let mut sender = GuestSender::new(
        guest_transport.clone(),
        InputSampler::keyboard_only(KeyboardSampler::new(held)),
        ControlToggle::new(true),
    );
    assert!(matches!(sender.tick().await, TickOutcome::Sent(_)));

    let mut receiver = HostReceiver::new(VirtualPad::new());
    let applied = timeout(Duration::from_secs(10), async {
        while let Some(event) = host_rx.recv().await {
            if let TransportEvent::Message(data) = event {
                return receiver.handle_message(&data).is_some();
            }
        }
        false
    })
    .await
    .context("host never received a control message")?;

    if !applied {
        bail!("control message was not applied");
    }
    assert_eq!(receiver.actuator().axis(0), Some(1.0));
    assert!(receiver.actuator().button(0).is_some_and(|b| b.pressed));

    guest_transport.close().await?;
    host_transport.close().await?;
    Ok(())
}

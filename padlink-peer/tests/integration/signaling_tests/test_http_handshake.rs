use anyhow::Result;
use padlink_core::{Invite, SessionDescription};
use padlink_peer::{DescriptionKind, GuestNegotiator, HostNegotiator, HostState, PollPolicy};
use std::sync::Arc;
use std::time::Duration;

use super::start_signaling;
use crate::integration::{ANSWER_B, OFFER_A, init_tracing, invite_base};
use crate::utils::{Journal, MockTransport};

#[tokio::test]
async fn test_negotiators_over_http_signaling() -> Result<()> {
    init_tracing();

    let signaling = Arc::new(start_signaling().await?);
    let journal = Journal::new();
    let host_transport = MockTransport::new("host", OFFER_A, journal.clone());
    let guest_transport = MockTransport::new("guest", ANSWER_B, journal.clone());
    let fast = PollPolicy {
        interval: Duration::from_millis(20),
        max_interval: Duration::from_millis(20),
        ..PollPolicy::default()
    }
    .with_timeout(Duration::from_secs(10));

    let host = HostNegotiator::new(
        signaling.clone(),
        Arc::new(host_transport.clone()),
        invite_base(),
    )
    .with_poll_policy(fast);
    let mut invite_rx = host.invite();
    let status = host.subscribe();
    let host_task = tokio::spawn(async move { host.run().await });

    let invite = invite_rx.wait_for(Option::is_some).await?.clone();
    let invite = Invite::parse(invite.expect("invite published").to_url().as_str())?;

    let guest = GuestNegotiator::new(signaling.clone(), Arc::new(guest_transport.clone()), invite)
        .with_poll_policy(fast);
    guest.run().await?;

    let host_session = host_task.await??;
    assert_eq!(*status.borrow(), HostState::Connected);
    assert_eq!(host_session.invite.room_id, host_session.credentials.room_id);
    assert_eq!(
        host_transport.remote_description(),
        Some((DescriptionKind::Answer, SessionDescription::from(ANSWER_B)))
    );
    assert_eq!(
        guest_transport.remote_description(),
        Some((DescriptionKind::Offer, SessionDescription::from(OFFER_A)))
    );

    Ok(())
}

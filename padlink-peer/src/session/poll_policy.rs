use padlink_core::{NegotiationError, SessionDescription, SignalingError};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How a negotiator waits for the remote description to show up in the store.
///
/// The default polls every 1200 ms forever. Dropping the negotiation future stops the poll; set
/// `timeout` to give up on a peer that never arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Multiplier applied to the interval after each empty or failed fetch. `1.0` keeps it fixed.
    pub backoff_factor: f64,
    pub max_interval: Duration,
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1200),
            backoff_factor: 1.0,
            max_interval: Duration::from_millis(1200),
            timeout: None,
        }
    }
}

impl PollPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor;
        self.max_interval = max_interval;
        self
    }

    fn next_interval(&self, current: Duration) -> Duration {
        if self.backoff_factor <= 1.0 {
            return current;
        }
        let cap = self.max_interval.max(self.interval);
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .unwrap_or(cap)
            .min(cap)
    }
}

/// Counters for one polling wait. Absent results are neither failures nor successes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub attempts: u32,
    pub failures: u32,
}

/// Whether the first fetch happens immediately or after one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollOrder {
    FetchFirst,
    SleepFirst,
}

/// Call `fetch` until it yields a description. Fetch errors are logged and retried.
pub(crate) async fn poll_for_description<F, Fut>(
    policy: &PollPolicy,
    order: PollOrder,
    what: &str,
    stats: &mut PollStats,
    mut fetch: F,
) -> Result<SessionDescription, NegotiationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<SessionDescription>, SignalingError>>,
{
    let poll = async {
        let mut delay = policy.interval;
        loop {
            if order == PollOrder::SleepFirst {
                tokio::time::sleep(delay).await;
            }

            stats.attempts += 1;
            match fetch().await {
                Ok(Some(description)) => return description,
                Ok(None) => debug!("No {} yet (attempt {})", what, stats.attempts),
                Err(e) => {
                    stats.failures += 1;
                    warn!("Fetching {} failed, retrying: {}", what, e);
                }
            }

            if order == PollOrder::FetchFirst {
                tokio::time::sleep(delay).await;
            }
            delay = policy.next_interval(delay);
        }
    };

    match policy.timeout {
        Some(limit) => tokio::time::timeout(limit, poll)
            .await
            .map_err(|_| NegotiationError::PollTimeout(limit)),
        None => Ok(poll.await),
    }
}

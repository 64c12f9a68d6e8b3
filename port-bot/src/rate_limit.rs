//! Rate limiting for the GitHub API.
//!
//! A single port makes around eight sequential API calls, and a merge with
//! several port labels multiplies that. Before each call the core budget is
//! checked; when it is nearly exhausted the bot sleeps until the window resets.

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Longest the bot sleeps for a reset unless told otherwise.
///
/// Callers running under a deadline pass a shorter cap so a wait cannot
/// outlive the work it is waiting for.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(3600);

/// Below this many remaining requests the bot waits for the reset.
const LOW_WATERMARK: u32 = 5;

/// Snapshot of the core rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix timestamp when the window resets.
    pub reset: u64,
    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// How long to wait before the next call, given the current Unix time.
    ///
    /// `None` when there is enough budget left or the reset already passed.
    /// The wait is capped at `max_wait`.
    #[must_use]
    pub fn wait_at(&self, now_secs: u64, max_wait: Duration) -> Option<Duration> {
        if self.remaining >= LOW_WATERMARK || self.reset <= now_secs {
            return None;
        }

        let wait = Duration::from_secs(self.reset - now_secs);
        if wait > max_wait {
            warn!(
                wait_secs = wait.as_secs(),
                max_wait_secs = max_wait.as_secs(),
                "Rate limit reset too far in future, capping wait time"
            );
        }
        Some(wait.min(max_wait))
    }
}

/// Fetches the core rate limit.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(
    octocrab: &Octocrab,
) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: u32::try_from(core.remaining).unwrap_or(u32::MAX),
        reset: core.reset,
        limit: u32::try_from(core.limit).unwrap_or(u32::MAX),
    })
}

/// Sleeps until the reset, at most `max_wait`, if the budget is low.
/// Returns whether it slept.
pub async fn wait_if_needed(info: &RateLimitInfo, max_wait: Duration) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let Some(wait) = info.wait_at(now, max_wait) else {
        return false;
    };

    info!(
        remaining = info.remaining,
        limit = info.limit,
        wait_secs = wait.as_secs(),
        "Rate limit low, waiting for reset"
    );
    tokio::time::sleep(wait).await;
    true
}

/// Checks the core budget and waits for a reset when it is nearly spent.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(
    octocrab: &Octocrab,
    max_wait: Duration,
) -> Result<(), octocrab::Error> {
    let info = check_core_rate_limit(octocrab).await?;
    wait_if_needed(&info, max_wait).await;
    Ok(())
}

//! Bounded waits for browser conditions.
//!
//! Every wait polls a condition at a fixed interval until it holds or the
//! timeout elapses; an elapsed wait is a [`BrowserError::WaitTimeout`].
//! Page loads go through [`LoadState`], which mirrors `document.readyState`.

use crate::error::{BrowserError, Result};
use shopcheck_config::UiSettings;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Default timeout for element waits (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default poll interval for checking conditions (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Creates a config with custom timeout and default poll interval.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// How far a document has to be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// `DOMContentLoaded` fired: `readyState` is `interactive` or `complete`.
    DomContentLoaded,
    /// The `load` event fired: `readyState` is `complete`.
    Load,
}

impl LoadState {
    pub fn is_reached_by(self, ready_state: &str) -> bool {
        match self {
            LoadState::DomContentLoaded => matches!(ready_state, "interactive" | "complete"),
            LoadState::Load => ready_state == "complete",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            LoadState::DomContentLoaded => "DOM content loaded",
            LoadState::Load => "page load",
        }
    }
}

/// Timeouts for the two-tier navigation wait.
///
/// The first tier waits for [`LoadState::DomContentLoaded`] for `primary`.
/// Only when that times out does the second tier wait for [`LoadState::Load`]
/// for `fallback`; a timeout there is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationWait {
    pub primary: Duration,
    pub fallback: Duration,
}

impl Default for NavigationWait {
    fn default() -> Self {
        Self {
            primary: Duration::from_secs(10),
            fallback: Duration::from_secs(5),
        }
    }
}

impl From<&UiSettings> for NavigationWait {
    fn from(settings: &UiSettings) -> Self {
        Self {
            primary: settings.navigation_timeout(),
            fallback: settings.fallback_timeout(),
        }
    }
}

/// Waits for a condition to become true, with timeout.
///
/// The condition function is called repeatedly at `poll_interval` until
/// it returns true or the timeout expires.
pub async fn wait_for<F, Fut>(condition: F, config: WaitConfig, description: &str) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();

    loop {
        if condition().await {
            return Ok(());
        }

        if start.elapsed() >= config.timeout {
            return Err(BrowserError::WaitTimeout {
                condition: description.to_string(),
                timeout: config.timeout,
            });
        }

        sleep(config.poll_interval).await;
    }
}

/// Waits for a condition that returns a Result<bool>.
///
/// Errors from the condition count as "not yet": a page that is mid-navigation
/// rejects script evaluation until the new document exists.
pub async fn wait_for_result<F, Fut>(
    condition: F,
    config: WaitConfig,
    description: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    wait_for(
        || {
            let check = condition();
            async move { matches!(check.await, Ok(true)) }
        },
        config,
        description,
    )
    .await
}

/// Runs the first wait tier, falling back to the second only on a timeout.
///
/// Any other error from the first tier is returned unchanged.
pub async fn with_fallback<F, Fut>(tier: F, wait: NavigationWait) -> Result<()>
where
    F: Fn(LoadState, Duration) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match tier(LoadState::DomContentLoaded, wait.primary).await {
        Err(err) if err.is_timeout() => {
            tracing::warn!(
                "{err}; falling back to waiting for full load for {:?}",
                wait.fallback
            );
            tier(LoadState::Load, wait.fallback).await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn wait_for_succeeds_immediately() {
        let result = wait_for(|| async { true }, WaitConfig::default(), "test condition").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn wait_for_succeeds_eventually() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = wait_for(
            move || {
                let c = counter_clone.clone();
                async move { c.fetch_add(1, Ordering::SeqCst) >= 3 }
            },
            WaitConfig::with_timeout(Duration::from_secs(5)),
            "counter >= 3",
        )
        .await;

        assert!(result.is_ok());
        assert!(counter.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn wait_for_times_out() {
        let result = wait_for(
            || async { false },
            WaitConfig::new(Duration::from_millis(100), Duration::from_millis(10)),
            "impossible condition",
        )
        .await;

        assert!(matches!(result, Err(BrowserError::WaitTimeout { .. })));
    }

    #[tokio::test]
    async fn wait_for_result_treats_errors_as_not_ready() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = wait_for_result(
            move || {
                let c = calls_clone.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(BrowserError::ScriptExecutionFailed("navigating".into()))
                    } else {
                        Ok(true)
                    }
                }
            },
            WaitConfig::new(Duration::from_secs(1), Duration::from_millis(5)),
            "eventually evaluable",
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn load_state_thresholds() {
        assert!(!LoadState::DomContentLoaded.is_reached_by("loading"));
        assert!(LoadState::DomContentLoaded.is_reached_by("interactive"));
        assert!(LoadState::DomContentLoaded.is_reached_by("complete"));
        assert!(!LoadState::Load.is_reached_by("interactive"));
        assert!(LoadState::Load.is_reached_by("complete"));
    }

    #[test]
    fn navigation_wait_from_settings() {
        let settings = UiSettings {
            navigation_timeout_ms: 2_000,
            fallback_timeout_ms: 500,
            ..UiSettings::default()
        };
        let wait = NavigationWait::from(&settings);
        assert_eq!(wait.primary, Duration::from_secs(2));
        assert_eq!(wait.fallback, Duration::from_millis(500));
        assert_eq!(NavigationWait::from(&UiSettings::default()), NavigationWait::default());
    }

    fn timeout(condition: &str) -> BrowserError {
        BrowserError::WaitTimeout {
            condition: condition.into(),
            timeout: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn fallback_not_used_when_first_tier_succeeds() {
        let tiers = Arc::new(Mutex::new(Vec::new()));
        let seen = tiers.clone();

        with_fallback(
            move |state, budget| {
                seen.lock().unwrap().push((state, budget));
                async { Ok(()) }
            },
            NavigationWait::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            *tiers.lock().unwrap(),
            vec![(LoadState::DomContentLoaded, Duration::from_secs(10))]
        );
    }

    #[tokio::test]
    async fn fallback_runs_second_tier_after_timeout() {
        let tiers = Arc::new(Mutex::new(Vec::new()));
        let seen = tiers.clone();

        let result = with_fallback(
            move |state, budget| {
                seen.lock().unwrap().push((state, budget));
                async move {
                    match state {
                        LoadState::DomContentLoaded => Err(timeout("dom")),
                        LoadState::Load => Ok(()),
                    }
                }
            },
            NavigationWait::default(),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(
            *tiers.lock().unwrap(),
            vec![
                (LoadState::DomContentLoaded, Duration::from_secs(10)),
                (LoadState::Load, Duration::from_secs(5)),
            ]
        );
    }

    #[tokio::test]
    async fn second_timeout_propagates() {
        let result = with_fallback(
            |state, _| async move { Err::<(), _>(timeout(state.describe())) },
            NavigationWait::default(),
        )
        .await;

        match result {
            Err(BrowserError::WaitTimeout { condition, .. }) => assert_eq!(condition, "page load"),
            other => panic!("expected second-tier timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_timeout_errors_skip_the_fallback() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_fallback(
            move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(BrowserError::AlreadyClosed) }
            },
            NavigationWait::default(),
        )
        .await;

        assert!(matches!(result, Err(BrowserError::AlreadyClosed)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

//! Widget driver for the top coins tracker
//!
//! Owns the poll lifecycle: an immediate fetch on mount, a repeating fetch
//! every [`POLL_INTERVAL_MS`](crate::constants::POLL_INTERVAL_MS), and
//! suppression of in-flight results after unmount. View state updates are
//! published over a [`watch`] channel so hosts can redraw on change instead
//! of relying on an implicit re-render.

use crate::{
    constants::{POLL_INTERVAL_MS, TOP_COINS_COUNT},
    metrics::{PollMetrics, PollMetricsCollector},
    source::MarketDataSource,
    types::ViewState,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Cancellation handle tied to one mounted widget instance
///
/// The handle is passed into the fetch routine and checked before every
/// state mutation, so a fetch that resolves after unmount becomes a no-op
/// instead of mutating a torn-down widget.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// True while the owning widget is still mounted
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn deactivate(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Polls a market data source and publishes view state updates
///
/// One tracker instance corresponds to one mounted widget. The state machine
/// is `Initial -> Loading -> {Success, Error} -> Loading -> ...` until
/// [`CoinTracker::unmount`] makes it terminal.
///
/// # Example
/// ```no_run
/// use coin_tracker_sdk::{render, CoinGeckoSource, CoinTracker};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = Arc::new(CoinGeckoSource::new()?);
/// let tracker = CoinTracker::new(source);
/// let mut state_rx = tracker.subscribe();
/// tracker.mount();
///
/// while state_rx.changed().await.is_ok() {
///     println!("{}", render(&state_rx.borrow_and_update()));
/// }
/// # Ok(())
/// # }
/// ```
pub struct CoinTracker {
    state_tx: Arc<watch::Sender<ViewState>>,
    source: Arc<dyn MarketDataSource>,
    metrics: Arc<PollMetricsCollector>,
    liveness: Liveness,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    poll_interval: Duration,
}

impl CoinTracker {
    /// Creates a tracker with the default 30 second poll interval
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self::with_interval(source, Duration::from_millis(POLL_INTERVAL_MS))
    }

    /// Creates a tracker with a custom poll interval
    ///
    /// This is primarily for testing. Use `new()` in production code.
    pub fn with_interval(source: Arc<dyn MarketDataSource>, poll_interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(ViewState::new());
        let metrics = Arc::new(PollMetricsCollector::new(source.source_name()));

        Self {
            state_tx: Arc::new(state_tx),
            source,
            metrics,
            liveness: Liveness::new(),
            poll_task: Mutex::new(None),
            poll_interval,
        }
    }

    /// Subscribes to view state updates
    ///
    /// The receiver always holds the latest state; `changed()` is the redraw
    /// trigger for the host.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    /// Returns a copy of the current view state
    pub fn current_state(&self) -> ViewState {
        self.state_tx.borrow().clone()
    }

    /// Returns the cancellation handle for this instance
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Returns the name of the underlying source
    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Activates the widget: polls once immediately, then on every interval
    ///
    /// Polls run sequentially on a single task, so a slow fetch delays the
    /// next tick rather than overlapping with it. Mounting twice is a no-op.
    pub fn mount(&self) {
        let mut poll_task = self
            .poll_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if poll_task.is_some() {
            tracing::warn!("mount called on an already mounted tracker");
            return;
        }

        let source = self.source.clone();
        let state_tx = self.state_tx.clone();
        let metrics = self.metrics.clone();
        let liveness = self.liveness.clone();
        let poll_interval = self.poll_interval;

        *poll_task = Some(tokio::spawn(async move {
            tracing::info!(
                source = source.source_name(),
                poll_interval_ms = poll_interval.as_millis() as u64,
                "Starting coin tracker poll loop"
            );

            // The first tick completes immediately: fetch-on-mount.
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                poll_once(&source, &state_tx, &metrics, &liveness).await;
            }
        }));
    }

    /// Deactivates the widget
    ///
    /// Stops the repeating timer and flips the liveness flag so a fetch
    /// already in flight cannot mutate state when it resolves. Terminal:
    /// a tracker cannot be remounted after unmount.
    pub fn unmount(&self) {
        self.liveness.deactivate();
        // Recover from poisoning: unmount also runs from Drop and must not
        // panic.
        let mut poll_task = self
            .poll_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(task) = poll_task.take() {
            task.abort();
            tracing::info!(source = self.source.source_name(), "Coin tracker unmounted");
        }
    }

    /// Forces an immediate poll, bypassing the repeating timer
    pub async fn refresh_now(&self) {
        poll_once(&self.source, &self.state_tx, &self.metrics, &self.liveness).await;
    }

    /// Gets poll metrics including latency percentiles and success rate
    pub async fn metrics(&self) -> PollMetrics {
        self.metrics.get_metrics().await
    }
}

impl Drop for CoinTracker {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Runs one poll: flags the fetch in flight, performs it, and applies the
/// outcome - unless the widget was unmounted in the meantime
///
/// On success the snapshot set is replaced wholesale and any recorded error
/// is cleared; on failure the error is recorded and the stale snapshot set
/// is left untouched. A 429 keeps the regular cadence and is only logged
/// and counted distinctly.
pub(crate) async fn poll_once(
    source: &Arc<dyn MarketDataSource>,
    state_tx: &watch::Sender<ViewState>,
    metrics: &PollMetricsCollector,
    liveness: &Liveness,
) {
    if !liveness.is_active() {
        return;
    }
    state_tx.send_modify(|state| state.begin_fetch());

    let start = Instant::now();
    let result = source.fetch_top_coins(TOP_COINS_COUNT).await;
    let latency = start.elapsed();

    // The widget may have been torn down while the request was in flight.
    if !liveness.is_active() {
        tracing::debug!(
            source = source.source_name(),
            "Widget unmounted mid-fetch, dropping result"
        );
        return;
    }

    match result {
        Ok(coins) => {
            tracing::debug!(
                count = coins.len(),
                source = source.source_name(),
                latency_ms = latency.as_millis() as u64,
                "Successfully fetched coin markets"
            );
            metrics.record_poll(latency, true, false).await;
            state_tx.send_modify(|state| state.apply_success(coins));
        }
        Err(error) => {
            if error.is_rate_limited() {
                tracing::warn!(
                    source = source.source_name(),
                    "Rate limit exceeded, next poll keeps the regular interval"
                );
            } else {
                tracing::warn!(
                    error = %error,
                    source = source.source_name(),
                    "Failed to fetch coin markets"
                );
            }
            metrics.record_poll(latency, false, error.is_rate_limited()).await;
            state_tx.send_modify(|state| state.apply_failure(error));
        }
    }
}

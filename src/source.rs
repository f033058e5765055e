//! Source abstraction for fetching ranked market data from external APIs

use crate::{error::FetchError, types::CoinSnapshot};
use async_trait::async_trait;

/// Trait for ranked market data sources
///
/// Implementations fetch the top coins by market capitalization from an
/// external service (CoinGecko, or a mock in tests).
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches the top `count` coins by market capitalization, best rank first
    ///
    /// # Arguments
    /// * `count` - Number of ranked entries to fetch
    ///
    /// # Returns
    /// The ranked snapshot set, or an error if the fetch fails
    async fn fetch_top_coins(&self, count: usize) -> Result<Vec<CoinSnapshot>, FetchError>;

    /// Returns the name of this source
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Builds a well-formed snapshot for tests
    pub fn coin(id: &str, symbol: &str, price: f64, change: f64) -> CoinSnapshot {
        CoinSnapshot {
            id: id.to_string(),
            name: id.to_string(),
            symbol: symbol.to_string(),
            image: format!("https://assets.example.com/{id}.png"),
            current_price: price,
            price_change_percentage_24h: change,
        }
    }

    /// Builds `n` distinct snapshots in rank order
    pub fn sample_coins(n: usize) -> Vec<CoinSnapshot> {
        (0..n)
            .map(|i| coin(&format!("coin-{i}"), &format!("c{i}"), 100.0 * (i + 1) as f64, 1.5))
            .collect()
    }

    /// Mock source for testing
    ///
    /// Responses are scripted in order. An optional gate lets a test hold a
    /// fetch in flight and release it at a chosen point.
    pub struct MockSource {
        responses: Mutex<VecDeque<Result<Vec<CoinSnapshot>, FetchError>>>,
        requested_counts: Mutex<Vec<usize>>,
        gate: Mutex<Option<Arc<Notify>>>,
    }

    impl Default for MockSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockSource {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                requested_counts: Mutex::new(Vec::new()),
                gate: Mutex::new(None),
            }
        }

        /// Queues a successful response
        pub fn push_success(&self, coins: Vec<CoinSnapshot>) {
            self.responses.lock().unwrap().push_back(Ok(coins));
        }

        /// Queues a failed response
        pub fn push_error(&self, error: FetchError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        /// Installs an await-gate; each fetch parks until the returned handle
        /// is notified
        pub fn gate(&self) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            *self.gate.lock().unwrap() = Some(notify.clone());
            notify
        }

        /// Number of fetches issued so far
        pub fn call_count(&self) -> usize {
            self.requested_counts.lock().unwrap().len()
        }

        /// The `count` argument of the most recent fetch
        pub fn last_requested_count(&self) -> Option<usize> {
            self.requested_counts.lock().unwrap().last().copied()
        }
    }

    #[async_trait]
    impl MarketDataSource for MockSource {
        async fn fetch_top_coins(&self, count: usize) -> Result<Vec<CoinSnapshot>, FetchError> {
            self.requested_counts.lock().unwrap().push(count);

            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            match self.responses.lock().unwrap().pop_front() {
                Some(response) => response,
                None => Err(FetchError::InvalidResponse(
                    "mock response queue empty".to_string(),
                )),
            }
        }

        fn source_name(&self) -> &'static str {
            "mock"
        }
    }
}

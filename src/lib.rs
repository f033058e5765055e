//! # Top Coins Tracker SDK
//!
//! Polls the CoinGecko markets API for the top 10 cryptocurrencies by market
//! capitalization and reduces every poll into a renderable tri-state view:
//! loading, error, or a ranked list of coin cards.
//!
//! The tracker follows the polling-widget lifecycle: one immediate fetch on
//! mount, one fetch every 30 seconds afterwards, and suppression of any
//! in-flight result once the widget is unmounted. State updates are published
//! over a `tokio::sync::watch` channel; subscribing to it is the host's
//! redraw trigger.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_tracker_sdk::{render, CoinGeckoSource, CoinTracker};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(CoinGeckoSource::new()?);
//! let tracker = CoinTracker::new(source);
//! let mut state_rx = tracker.subscribe();
//! tracker.mount();
//!
//! // Redraw on each of the first few view transitions, then tear down.
//! for _ in 0..4 {
//!     state_rx.changed().await?;
//!     println!("{}", render(&state_rx.borrow_and_update()));
//! }
//!
//! tracker.unmount();
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod metrics;
pub mod render;
pub mod source;
pub mod sources;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use error::FetchError;
pub use metrics::PollMetrics;
pub use render::{render, CoinCard, RenderedView};
pub use source::MarketDataSource;
pub use sources::CoinGeckoSource;
pub use tracker::{CoinTracker, Liveness};
pub use types::{ChangeDirection, CoinSnapshot, ViewState};

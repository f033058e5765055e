//! Types for the top coins tracker

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked market entry, as returned by the markets endpoint
///
/// Snapshots are volatile: every successful poll replaces the whole set.
/// Unknown response fields are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    /// Stable identifier, unique within a snapshot set
    pub id: String,

    /// Display name
    pub name: String,

    /// Ticker symbol, lowercase on the wire
    pub symbol: String,

    /// URL of the logo asset
    pub image: String,

    /// Current price in USD
    pub current_price: f64,

    /// Signed 24h price change, in percent
    pub price_change_percentage_24h: f64,
}

impl CoinSnapshot {
    /// Ticker symbol normalized to uppercase for display
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// Direction of the 24h change; exactly zero counts as positive
    pub fn change_direction(&self) -> ChangeDirection {
        if self.price_change_percentage_24h >= 0.0 {
            ChangeDirection::Positive
        } else {
            ChangeDirection::Negative
        }
    }
}

/// Semantic direction of a 24h price change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    /// Change of zero or more percent
    Positive,
    /// Change below zero percent
    Negative,
}

/// View model owned by one mounted widget instance
///
/// `coins` is only overwritten on a successful poll; a failed poll leaves the
/// previous snapshot set in place and records the error instead. The render
/// priority (loading, then error, then coins) lives in [`crate::render`].
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Ranked snapshots from the last successful poll, rank = array order
    pub coins: Vec<CoinSnapshot>,

    /// True only while a fetch is in flight
    pub loading: bool,

    /// Failure descriptor from the last poll; cleared on the next success
    pub error: Option<FetchError>,

    /// When the last successful poll completed
    pub last_updated: Option<DateTime<Utc>>,
}

impl ViewState {
    /// Initial state at mount: loading, no data, no error
    pub fn new() -> Self {
        Self {
            coins: Vec::new(),
            loading: true,
            error: None,
            last_updated: None,
        }
    }

    /// Marks a fetch as in flight
    pub(crate) fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Applies a successful poll: the snapshot set is replaced wholesale
    pub(crate) fn apply_success(&mut self, coins: Vec<CoinSnapshot>) {
        self.coins = coins;
        self.error = None;
        self.loading = false;
        self.last_updated = Some(Utc::now());
    }

    /// Applies a failed poll; the stale snapshot set is kept
    pub(crate) fn apply_failure(&mut self, error: FetchError) {
        self.error = Some(error);
        self.loading = false;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

//! Render contract: a pure reduction of [`ViewState`] into displayable output
//!
//! Priority is fixed: loading wins over everything, then a recorded error,
//! then the ranked coin list. A stale snapshot set is therefore invisible
//! while an error is recorded, even though the state still holds it.

use crate::constants::LIST_HEADING;
use crate::error::FetchError;
use crate::types::{ChangeDirection, ViewState};
use std::fmt;

/// User-visible message for any failed poll
const GENERIC_ERROR_MESSAGE: &str = "Failed to load data.";

/// User-visible message when the source rate-limited us
const RATE_LIMIT_MESSAGE: &str = "Failed to load data. Rate limit exceeded, please wait.";

/// One displayable card of the ranked list
#[derive(Debug, Clone, PartialEq)]
pub struct CoinCard {
    /// 1-based rank, equal to the position in the snapshot set
    pub rank: usize,
    /// Display name
    pub name: String,
    /// Uppercased ticker symbol
    pub symbol: String,
    /// Logo asset URL
    pub image: String,
    /// Price formatted as USD currency, e.g. `$64,321.50`
    pub price: String,
    /// 24h change formatted to two decimals, e.g. `-1.24%`
    pub change: String,
    /// Semantic direction of the change (zero counts as positive)
    pub direction: ChangeDirection,
}

/// Displayable reduction of one view state
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView {
    /// A fetch is in flight
    Loading,
    /// The last poll failed
    Error {
        message: String,
        rate_limited: bool,
    },
    /// Ranked list from the last successful poll
    List {
        heading: String,
        cards: Vec<CoinCard>,
    },
}

/// Reduces a view state into displayable output
pub fn render(state: &ViewState) -> RenderedView {
    if state.loading {
        return RenderedView::Loading;
    }

    if let Some(error) = &state.error {
        return RenderedView::Error {
            message: error_message(error).to_string(),
            rate_limited: error.is_rate_limited(),
        };
    }

    let cards = state
        .coins
        .iter()
        .enumerate()
        .map(|(index, coin)| CoinCard {
            rank: index + 1,
            name: coin.name.clone(),
            symbol: coin.display_symbol(),
            image: coin.image.clone(),
            price: format_usd(coin.current_price),
            change: format_change(coin.price_change_percentage_24h),
            direction: coin.change_direction(),
        })
        .collect();

    RenderedView::List {
        heading: LIST_HEADING.to_string(),
        cards,
    }
}

fn error_message(error: &FetchError) -> &'static str {
    if error.is_rate_limited() {
        RATE_LIMIT_MESSAGE
    } else {
        GENERIC_ERROR_MESSAGE
    }
}

/// Formats an amount as USD currency with two decimals and comma grouping
pub fn format_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, frac)
}

/// Formats a 24h change percentage to two decimals
pub fn format_change(percent: f64) -> String {
    format!("{percent:.2}%")
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedView::Loading => write!(f, "Loading..."),
            RenderedView::Error { message, .. } => write!(f, "{message}"),
            RenderedView::List { heading, cards } => {
                writeln!(f, "{heading}")?;
                for card in cards {
                    writeln!(
                        f,
                        "{:>2}. {} ({})  {}  {}",
                        card.rank, card.name, card.symbol, card.price, card.change
                    )?;
                }
                Ok(())
            }
        }
    }
}

//! Constants for the top coins tracker
//!
//! All configuration for the tracker is centralized here. No runtime
//! configuration (config.yml) is used - the system operates transparently
//! with these compile-time constants.

/// How often to poll the markets endpoint (in milliseconds)
pub const POLL_INTERVAL_MS: u64 = 30_000;

/// HTTP request timeout when fetching market data (in seconds)
///
/// The original widget imposed no timeout and relied on the HTTP client
/// defaults. A bounded timeout is applied here so a stalled request cannot
/// wedge the poll loop indefinitely.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of top-ranked coins to fetch per poll
pub const TOP_COINS_COUNT: usize = 10;

/// Page of ranked results to fetch (the markets endpoint is paginated)
pub const MARKETS_PAGE: u32 = 1;

/// Currency the prices are quoted in
pub const VS_CURRENCY: &str = "usd";

/// Ranking order requested from the markets endpoint
pub const MARKET_ORDER: &str = "market_cap_desc";

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for ranked market data
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-tracker-sdk/0.1.0";

/// Heading rendered above the coin list
pub const LIST_HEADING: &str = "Top 10 Cryptocurrencies";

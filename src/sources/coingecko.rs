//! CoinGecko market data source implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT, MARKETS_PAGE, MARKET_ORDER,
        REQUEST_TIMEOUT_SECS, USER_AGENT, VS_CURRENCY,
    },
    error::FetchError,
    source::MarketDataSource,
    types::CoinSnapshot,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// CoinGecko market data source
///
/// Fetches ranked market data from the `/coins/markets` endpoint with fixed
/// query parameters: USD quotes, market-cap-descending order, one page, no
/// sparkline data.
pub struct CoinGeckoSource {
    client: Client,
}

impl CoinGeckoSource {
    /// Creates a new CoinGecko source
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::from)?;

        Ok(Self { client })
    }

    /// Builds the markets URL for fetching `count` ranked entries
    fn markets_url(&self, count: usize) -> String {
        format!(
            "{}{}?vs_currency={}&order={}&per_page={}&page={}&sparkline=false",
            COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT, VS_CURRENCY, MARKET_ORDER, count,
            MARKETS_PAGE
        )
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoSource {
    async fn fetch_top_coins(&self, count: usize) -> Result<Vec<CoinSnapshot>, FetchError> {
        let url = self.markets_url(count);
        tracing::debug!(%url, "Fetching coin markets from CoinGecko");

        let response = self.client.get(&url).send().await.map_err(FetchError::from)?;

        // Rate limiting is surfaced as its own error kind so callers can log
        // and message it distinctly.
        if response.status().as_u16() == 429 {
            return Err(FetchError::RateLimited);
        }

        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(FetchError::from)?;

        let coins: Vec<CoinSnapshot> = serde_json::from_str(&body).map_err(|e| {
            FetchError::InvalidResponse(format!("Failed to parse CoinGecko response: {e}"))
        })?;

        tracing::debug!(count = coins.len(), "Successfully fetched coin markets");

        Ok(coins)
    }

    fn source_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markets_url_carries_the_fixed_query_parameters() {
        let source = CoinGeckoSource::new().unwrap();
        let url = source.markets_url(10);

        assert!(url.starts_with("https://api.coingecko.com/api/v3/coins/markets?"));
        assert!(url.contains("vs_currency=usd"));
        assert!(url.contains("order=market_cap_desc"));
        assert!(url.contains("per_page=10"));
        assert!(url.contains("page=1"));
        assert!(url.contains("sparkline=false"));
    }

    #[test]
    fn parses_markets_response_ignoring_unknown_fields() {
        let body = r#"[
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
                "current_price": 64321.5,
                "market_cap": 1268000000000,
                "market_cap_rank": 1,
                "price_change_percentage_24h": -1.24
            },
            {
                "id": "ethereum",
                "symbol": "eth",
                "name": "Ethereum",
                "image": "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
                "current_price": 3400.12,
                "market_cap": 409000000000,
                "market_cap_rank": 2,
                "price_change_percentage_24h": 0.0
            }
        ]"#;

        let coins: Vec<CoinSnapshot> = serde_json::from_str(body).unwrap();

        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].id, "bitcoin");
        assert_eq!(coins[0].display_symbol(), "BTC");
        assert_eq!(coins[0].current_price, 64321.5);
        assert_eq!(coins[1].price_change_percentage_24h, 0.0);
    }
}

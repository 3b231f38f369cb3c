use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::providers::util::with_retry;
use crate::stock_provider::StockQuoteSource;

// Financial Modeling Prep stock listing. One request returns the whole
// exchange listing; watched symbols are picked out client-side.
pub struct FmpStockQuotes {
    base_url: String,
    api_key: String,
}

impl FmpStockQuotes {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        FmpStockQuotes {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

// Prices arrive as numbers for most listings and strings for a few, so
// the field stays loose until a watched symbol needs it
#[derive(Deserialize, Debug)]
struct StockListEntry {
    symbol: Option<String>,
    price: Option<serde_json::Value>,
}

fn parse_price(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl StockQuoteSource for FmpStockQuotes {
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<HashMap<String, f64>> {
        let url = format!(
            "{}/api/v3/stock/list?apikey={}",
            self.base_url, self.api_key
        );
        // The key rides in the query string, keep it out of the logs
        debug!("Requesting stock list from {}/api/v3/stock/list", self.base_url);

        let client = reqwest::Client::builder().user_agent("moneta/1.0").build()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .map_err(|e| anyhow!("Request error: {} for the stock list", e))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for the stock list",
                response.status()
            ));
        }

        let entries = response.json::<Vec<StockListEntry>>().await?;
        let mut quotes = HashMap::new();
        for entry in entries {
            let Some(symbol) = entry.symbol else {
                continue;
            };
            if !symbols.contains(&symbol) {
                continue;
            }
            let price = entry
                .price
                .as_ref()
                .and_then(parse_price)
                .ok_or_else(|| anyhow!("Malformed price {:?} for {}", entry.price, symbol))?;
            quotes.insert(symbol, price);
        }
        debug!("Matched {} of {} watched symbols", quotes.len(), symbols.len());
        Ok(quotes)
    }
}

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Quotes for the watched symbols. Symbols the source does not list are
/// simply absent from the result.
#[async_trait]
pub trait StockQuoteSource: Send + Sync {
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<HashMap<String, f64>>;
}

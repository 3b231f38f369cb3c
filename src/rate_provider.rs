//! Provides date-indexed currency rates for the application.
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Source of one day's rate table, keyed by currency code. A rate is the
/// price of one unit of foreign currency in the reporting currency.
#[async_trait]
pub trait DailyRateSource: Send + Sync {
    async fn fetch_daily(&self, on: NaiveDate) -> Result<HashMap<String, f64>>;
}

/// Resolved per-currency lookup. `None` covers both a failed fetch and a
/// currency absent from the day's table.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn rate_on(&self, currency: &str, on: NaiveDate) -> Option<f64>;
}

use crate::rate_provider::{DailyRateSource, RateProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Memoizing wrapper around a [`DailyRateSource`].
///
/// A fetched table is kept for the process lifetime, so each date costs at
/// most one fetch. A failed fetch is not recorded and the next lookup for
/// that date retries. A currency missing from a cached table is a plain
/// miss; the table is not fetched again. The lock is held across the inner
/// fetch, so concurrent lookups for one date collapse into a single call.
#[derive(Clone)]
pub struct RateCache<T: DailyRateSource> {
    inner: T,
    tables: Arc<Mutex<HashMap<NaiveDate, HashMap<String, f64>>>>,
}

impl<T: DailyRateSource> RateCache<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            tables: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl<T: DailyRateSource + Send + Sync> RateProvider for RateCache<T> {
    async fn rate_on(&self, currency: &str, on: NaiveDate) -> Option<f64> {
        let mut tables = self.tables.lock().await;
        if let Some(table) = tables.get(&on) {
            debug!("Cache hit for rate table: {}", on);
            return lookup(table, currency, on);
        }

        debug!("Cache miss for rate table: {}", on);
        match self.inner.fetch_daily(on).await {
            Ok(table) => {
                let rate = lookup(&table, currency, on);
                tables.insert(on, table);
                rate
            }
            Err(e) => {
                warn!("Rate fetch for {} failed: {}", on, e);
                None
            }
        }
    }
}

fn lookup(table: &HashMap<String, f64>, currency: &str, on: NaiveDate) -> Option<f64> {
    let rate = table.get(currency).copied();
    if rate.is_none() {
        warn!("No {} rate in the table for {}", currency, on);
    }
    rate
}

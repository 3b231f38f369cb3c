use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::providers::util::with_retry;
use crate::rate_provider::DailyRateSource;

// Bank of Russia daily rates, one XML document per date
pub struct CbrDailyRates {
    base_url: String,
}

impl CbrDailyRates {
    pub fn new(base_url: &str) -> Self {
        CbrDailyRates {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ValCurs {
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

// Entries with missing elements are skipped rather than failing the day
#[derive(Deserialize, Debug)]
struct Valute {
    #[serde(rename = "CharCode")]
    char_code: Option<String>,
    #[serde(rename = "VunitRate")]
    unit_rate: Option<String>,
}

#[async_trait]
impl DailyRateSource for CbrDailyRates {
    async fn fetch_daily(&self, on: NaiveDate) -> Result<HashMap<String, f64>> {
        let url = format!(
            "{}/scripts/XML_daily.asp?date_req={}",
            self.base_url,
            on.format("%d/%m/%Y")
        );
        debug!("Requesting daily rates from {}", url);

        let client = reqwest::Client::builder().user_agent("moneta/1.0").build()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .map_err(|e| anyhow!("Request error: {} for rates on {}", e, on))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for rates on {}",
                response.status(),
                on
            ));
        }

        let text = response.text().await?;
        let document: ValCurs = quick_xml::de::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rates XML for {}: {}", on, e))?;

        let mut rates = HashMap::new();
        for valute in document.valutes {
            let (Some(code), Some(raw_rate)) = (valute.char_code, valute.unit_rate) else {
                continue;
            };
            // The feed writes decimals with a comma
            let rate: f64 = raw_rate
                .replace(',', ".")
                .parse()
                .map_err(|_| anyhow!("Malformed rate {:?} for {} on {}", raw_rate, code, on))?;
            rates.insert(code, rate);
        }
        debug!("Parsed {} rates for {}", rates.len(), on);
        Ok(rates)
    }
}

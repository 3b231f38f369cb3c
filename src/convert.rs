use crate::error::ReportError;
use crate::rate_provider::RateProvider;
use chrono::NaiveDate;
use tracing::debug;

/// Converts amounts into the reporting currency with the rate of the day
/// the amount was paid.
pub struct CurrencyConverter<'a> {
    rates: &'a dyn RateProvider,
    reporting: &'a str,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(rates: &'a dyn RateProvider, reporting: &'a str) -> Self {
        CurrencyConverter { rates, reporting }
    }

    /// Amounts already in the reporting currency pass through untouched.
    pub async fn convert(
        &self,
        amount: f64,
        currency: &str,
        on: NaiveDate,
    ) -> Result<f64, ReportError> {
        if currency == self.reporting {
            return Ok(amount);
        }
        match self.rates.rate_on(currency, on).await {
            Some(rate) => {
                debug!("Converting {} {} at rate {} on {}", amount, currency, rate, on);
                Ok(amount * rate)
            }
            None => Err(ReportError::RateUnavailable {
                currency: currency.to_string(),
                date: on,
            }),
        }
    }
}

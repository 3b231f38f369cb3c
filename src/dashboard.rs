use crate::cards::{self, CardSummary};
use crate::config::UserSettings;
use crate::convert::CurrencyConverter;
use crate::dates;
use crate::error::ReportError;
use crate::model::Transaction;
use crate::rate_provider::RateProvider;
use crate::stock_provider::StockQuoteSource;
use crate::top::{self, RankedTransaction};
use anyhow::Result;
use chrono::{Local, NaiveTime, Timelike};
use futures::future::join_all;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPrice {
    pub stock: String,
    pub price: f64,
}

/// Everything the dashboard shows, in its output order.
#[derive(Debug, Serialize)]
pub struct DashboardPayload {
    pub greeting: String,
    pub cards: Vec<CardSummary>,
    pub top_transactions: Vec<RankedTransaction>,
    pub currency_rates: Vec<CurrencyRate>,
    pub stock_prices: Vec<StockPrice>,
}

/// Greeting for the wall-clock time of day.
pub fn greeting(time: NaiveTime) -> &'static str {
    if time.hour() < 6 {
        "Доброй ночи"
    } else if time.hour() < 12 {
        "Доброе утро"
    } else if time.hour() < 18 {
        "Добрый день"
    } else {
        "Добрый вечер"
    }
}

/// Builds the dashboard payload.
///
/// `at` anchors the card summary and the ranking month; the greeting and
/// the quoted currency rates always follow the current moment. The card,
/// ranking and stock sections degrade to empty on their own failures; a
/// malformed `at` or missing settings abort the whole payload.
pub async fn assemble(
    transactions: &[Transaction],
    at: Option<&str>,
    settings: Option<&UserSettings>,
    rates: &dyn RateProvider,
    stocks: &dyn StockQuoteSource,
    reporting: &str,
) -> Result<DashboardPayload, ReportError> {
    let now = Local::now();
    let date = match at {
        Some(raw) => dates::parse_timestamp(raw)?.date(),
        None => now.date_naive(),
    };

    let converter = CurrencyConverter::new(rates, reporting);
    let cards = match cards::cards_for_month(transactions, date, &converter).await {
        Ok(cards) => cards,
        Err(e) => {
            error!("Card summary failed: {}", e);
            Vec::new()
        }
    };
    let top_transactions =
        match top::top_transactions(transactions, date, &converter, top::TOP_COUNT).await {
            Ok(top) => top,
            Err(e) => {
                error!("Transaction ranking failed: {}", e);
                Vec::new()
            }
        };

    let settings = settings.ok_or(ReportError::SettingsUnavailable)?;

    // Quoted rates are for today, not the anchor date; a miss shows as 0
    let today = now.date_naive();
    let rate_futures = settings.user_currencies.iter().map(|currency| async move {
        CurrencyRate {
            currency: currency.clone(),
            rate: rates.rate_on(currency, today).await.unwrap_or(0.0),
        }
    });
    let currency_rates = join_all(rate_futures).await;

    let stock_prices = match stocks.fetch_quotes(&settings.user_stocks).await {
        Ok(quotes) => settings
            .user_stocks
            .iter()
            .filter_map(|symbol| {
                quotes.get(symbol).map(|price| StockPrice {
                    stock: symbol.clone(),
                    price: *price,
                })
            })
            .collect(),
        Err(e) => {
            error!("Stock quotes failed: {}", e);
            Vec::new()
        }
    };

    Ok(DashboardPayload {
        greeting: greeting(now.time()).to_string(),
        cards,
        top_transactions,
        currency_rates,
        stock_prices,
    })
}

/// Payload JSON the way the dashboard serves it: four-space indentation,
/// non-ASCII text as is.
pub fn render(payload: &DashboardPayload) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    payload.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    struct MockRates(HashMap<String, f64>);

    impl MockRates {
        fn new(pairs: &[(&str, f64)]) -> Self {
            MockRates(pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect())
        }
    }

    #[async_trait]
    impl RateProvider for MockRates {
        async fn rate_on(&self, currency: &str, _on: NaiveDate) -> Option<f64> {
            self.0.get(currency).copied()
        }
    }

    struct MockQuotes(HashMap<String, f64>);

    #[async_trait]
    impl StockQuoteSource for MockQuotes {
        async fn fetch_quotes(&self, symbols: &[String]) -> anyhow::Result<HashMap<String, f64>> {
            Ok(self
                .0
                .iter()
                .filter(|(symbol, _)| symbols.contains(symbol))
                .map(|(symbol, price)| (symbol.clone(), *price))
                .collect())
        }
    }

    struct FailingQuotes;

    #[async_trait]
    impl StockQuoteSource for FailingQuotes {
        async fn fetch_quotes(&self, _symbols: &[String]) -> anyhow::Result<HashMap<String, f64>> {
            Err(anyhow::anyhow!("quota exhausted"))
        }
    }

    fn tx(card: &str, amount: f64, currency: &str, paid_on: &str, cashback: Option<f64>) -> Transaction {
        Transaction {
            operation_date: paid_on.to_string(),
            payment_date: paid_on.to_string(),
            card: Some(card.to_string()),
            status: Status::Ok,
            operation_amount: amount,
            operation_currency: currency.to_string(),
            payment_amount: amount,
            payment_currency: currency.to_string(),
            cashback,
            category: "Разное".to_string(),
            mcc: None,
            description: "Магазин".to_string(),
        }
    }

    fn settings() -> UserSettings {
        UserSettings {
            user_currencies: vec!["USD".to_string(), "EUR".to_string()],
            user_stocks: vec!["AAPL".to_string()],
        }
    }

    #[test]
    fn test_greeting_follows_the_hour() {
        let cases = [
            (0, "Доброй ночи"),
            (5, "Доброй ночи"),
            (6, "Доброе утро"),
            (11, "Доброе утро"),
            (12, "Добрый день"),
            (17, "Добрый день"),
            (18, "Добрый вечер"),
            (23, "Добрый вечер"),
        ];
        for (hour, expected) in cases {
            let time = NaiveTime::from_hms_opt(hour, 30, 0).unwrap();
            assert_eq!(greeting(time), expected, "hour {hour}");
        }
    }

    #[tokio::test]
    async fn test_assembles_all_sections() {
        let transactions = vec![
            tx("*7197", -1000.0, "RUB", "15.12.2021", Some(100.0)),
            tx("*7197", -800.0, "RUB", "16.12.2021", Some(80.0)),
            tx("*5091", -600.0, "RUB", "10.12.2021", None),
        ];
        let rates = MockRates::new(&[("USD", 100.0), ("EUR", 110.0)]);
        let stocks = MockQuotes(HashMap::from([("AAPL".to_string(), 150.0)]));
        let settings = settings();

        let payload = assemble(
            &transactions,
            Some("2021-12-20 14:30:00"),
            Some(&settings),
            &rates,
            &stocks,
            "RUB",
        )
        .await
        .unwrap();

        assert_eq!(
            payload.cards,
            vec![
                CardSummary {
                    last_digits: "5091".to_string(),
                    total_spent: 600.0,
                    cashback: 0.0,
                },
                CardSummary {
                    last_digits: "7197".to_string(),
                    total_spent: 1800.0,
                    cashback: 180.0,
                },
            ]
        );
        assert_eq!(payload.top_transactions.len(), 3);
        assert_eq!(payload.top_transactions[0].amount, -1000.0);
        assert_eq!(
            payload.currency_rates,
            vec![
                CurrencyRate {
                    currency: "USD".to_string(),
                    rate: 100.0,
                },
                CurrencyRate {
                    currency: "EUR".to_string(),
                    rate: 110.0,
                },
            ]
        );
        assert_eq!(
            payload.stock_prices,
            vec![StockPrice {
                stock: "AAPL".to_string(),
                price: 150.0,
            }]
        );
    }

    #[tokio::test]
    async fn test_malformed_timestamp_aborts() {
        let rates = MockRates::new(&[]);
        let stocks = MockQuotes(HashMap::new());
        let settings = settings();

        let result = assemble(
            &[],
            Some("1998-12-30 24:00:01"),
            Some(&settings),
            &rates,
            &stocks,
            "RUB",
        )
        .await;

        assert_eq!(
            result.err(),
            Some(ReportError::MalformedTimestamp(
                "1998-12-30 24:00:01".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_missing_settings_abort() {
        let rates = MockRates::new(&[]);
        let stocks = MockQuotes(HashMap::new());

        let result = assemble(
            &[],
            Some("2021-12-20 14:30:00"),
            None,
            &rates,
            &stocks,
            "RUB",
        )
        .await;

        assert_eq!(result.err(), Some(ReportError::SettingsUnavailable));
    }

    #[tokio::test]
    async fn test_failed_sections_degrade_to_empty() {
        // The USD row cannot be converted, which kills cards and ranking;
        // the stock fetch fails; rate misses render as zero
        let transactions = vec![tx("*7197", -9.0, "USD", "20.12.2021", None)];
        let rates = MockRates::new(&[]);
        let settings = settings();

        let payload = assemble(
            &transactions,
            Some("2021-12-20 14:30:00"),
            Some(&settings),
            &rates,
            &FailingQuotes,
            "RUB",
        )
        .await
        .unwrap();

        assert!(payload.cards.is_empty());
        assert!(payload.top_transactions.is_empty());
        assert_eq!(
            payload.currency_rates,
            vec![
                CurrencyRate {
                    currency: "USD".to_string(),
                    rate: 0.0,
                },
                CurrencyRate {
                    currency: "EUR".to_string(),
                    rate: 0.0,
                },
            ]
        );
        assert!(payload.stock_prices.is_empty());
        assert!(!payload.greeting.is_empty());
    }

    #[test]
    fn test_render_uses_four_space_indent() {
        let payload = DashboardPayload {
            greeting: "Добрый день".to_string(),
            cards: vec![],
            top_transactions: vec![],
            currency_rates: vec![CurrencyRate {
                currency: "USD".to_string(),
                rate: 100.0,
            }],
            stock_prices: vec![],
        };

        let json = render(&payload).unwrap();

        assert!(json.starts_with("{\n"));
        assert!(json.contains("    \"greeting\": \"Добрый день\""));
        assert!(json.contains("\"currency\": \"USD\""));
    }
}

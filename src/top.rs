use crate::convert::CurrencyConverter;
use crate::dates;
use crate::error::ReportError;
use crate::filter::TransactionFilter;
use crate::model::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// How many transactions the dashboard ranks.
pub const TOP_COUNT: usize = 5;

/// Dashboard view of a ranked transaction. Date and amount echo the
/// source row; conversion is only used for ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTransaction {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

/// The `limit` largest completed transactions of the month ending at
/// `date`, by absolute amount in the reporting currency. Credits rank
/// alongside debits. Equal amounts keep their input order.
pub async fn top_transactions(
    transactions: &[Transaction],
    date: NaiveDate,
    converter: &CurrencyConverter<'_>,
    limit: usize,
) -> Result<Vec<RankedTransaction>, ReportError> {
    let start = dates::month_start(date);
    let selected = TransactionFilter::new()
        .ok_only()
        .paid_between(start, date)
        .select_dated(transactions)?;
    if selected.is_empty() {
        warn!("No operations to rank between {} and {}", start, date);
        return Ok(Vec::new());
    }

    let mut ranked = Vec::with_capacity(selected.len());
    for (transaction, paid_on) in selected {
        let converted = converter
            .convert(
                transaction.payment_amount,
                &transaction.payment_currency,
                paid_on,
            )
            .await?;
        ranked.push((converted.abs(), transaction));
    }
    // Stable sort keeps the source order between equal amounts
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    Ok(ranked
        .into_iter()
        .take(limit)
        .map(|(_, transaction)| RankedTransaction {
            date: transaction.payment_date.clone(),
            amount: transaction.payment_amount,
            category: transaction.category.clone(),
            description: transaction.description.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::rate_provider::RateProvider;
    use async_trait::async_trait;
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

    fn tx(amount: f64, currency: &str, paid_on: &str, description: &str) -> Transaction {
        Transaction {
            operation_date: paid_on.to_string(),
            payment_date: paid_on.to_string(),
            card: Some("*7197".to_string()),
            status: Status::Ok,
            operation_amount: amount,
            operation_currency: currency.to_string(),
            payment_amount: amount,
            payment_currency: currency.to_string(),
            cashback: None,
            category: "Разное".to_string(),
            mcc: None,
            description: description.to_string(),
        }
    }

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 12, 20).unwrap()
    }

    #[tokio::test]
    async fn test_ranks_by_absolute_converted_amount() {
        let transactions = vec![
            tx(-100.0, "RUB", "15.12.2021", "аптека"),
            tx(-9.0, "USD", "15.12.2021", "подписка"),
            tx(250.0, "RUB", "16.12.2021", "возврат"),
            tx(-400.0, "RUB", "17.12.2021", "магазин"),
        ];
        let rates = MockRates::new(&[("USD", 100.0)]);
        let converter = CurrencyConverter::new(&rates, "RUB");

        let top = top_transactions(&transactions, anchor(), &converter, TOP_COUNT)
            .await
            .unwrap();

        let order: Vec<&str> = top.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["подписка", "магазин", "возврат", "аптека"]);
        // The output echoes the source row, not the converted value
        assert_eq!(top[0].amount, -9.0);
        assert_eq!(top[0].date, "15.12.2021");
    }

    #[tokio::test]
    async fn test_truncates_to_limit() {
        let transactions: Vec<Transaction> = (1..=8)
            .map(|i| tx(-(i as f64) * 100.0, "RUB", "15.12.2021", "ряд"))
            .collect();
        let rates = MockRates::new(&[]);
        let converter = CurrencyConverter::new(&rates, "RUB");

        let top = top_transactions(&transactions, anchor(), &converter, TOP_COUNT)
            .await
            .unwrap();

        let amounts: Vec<f64> = top.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![-800.0, -700.0, -600.0, -500.0, -400.0]);
    }

    #[tokio::test]
    async fn test_equal_amounts_keep_source_order() {
        let transactions = vec![
            tx(-300.0, "RUB", "15.12.2021", "первый"),
            tx(-300.0, "RUB", "16.12.2021", "второй"),
        ];
        let rates = MockRates::new(&[]);
        let converter = CurrencyConverter::new(&rates, "RUB");

        let top = top_transactions(&transactions, anchor(), &converter, TOP_COUNT)
            .await
            .unwrap();

        assert_eq!(top[0].description, "первый");
        assert_eq!(top[1].description, "второй");
    }

    #[tokio::test]
    async fn test_missing_rate_fails_the_ranking() {
        let transactions = vec![tx(-9.0, "USD", "15.12.2021", "подписка")];
        let rates = MockRates::new(&[]);
        let converter = CurrencyConverter::new(&rates, "RUB");

        let result = top_transactions(&transactions, anchor(), &converter, TOP_COUNT).await;

        assert_eq!(
            result,
            Err(ReportError::RateUnavailable {
                currency: "USD".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 12, 15).unwrap(),
            })
        );
    }
}

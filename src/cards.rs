use crate::convert::CurrencyConverter;
use crate::dates;
use crate::error::ReportError;
use crate::filter::TransactionFilter;
use crate::model::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-card spend and cashback for the dashboard, in the reporting
/// currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub last_digits: String,
    pub total_spent: f64,
    pub cashback: f64,
}

/// Masked card identifier as shown on the dashboard.
pub fn mask_card(card: &str) -> String {
    let count = card.chars().count();
    card.chars().skip(count.saturating_sub(4)).collect()
}

/// Spend and cashback per card between the first of the month and `date`,
/// both converted with the rate of each row's own payment day. Rows with
/// no card identifier are skipped. Cards come out ordered by identifier.
pub async fn cards_for_month(
    transactions: &[Transaction],
    date: NaiveDate,
    converter: &CurrencyConverter<'_>,
) -> Result<Vec<CardSummary>, ReportError> {
    let start = dates::month_start(date);
    let selected = TransactionFilter::new()
        .ok_only()
        .debits_only()
        .paid_between(start, date)
        .select_dated(transactions)?;
    if selected.is_empty() {
        warn!("No card operations between {} and {}", start, date);
        return Ok(Vec::new());
    }

    let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for (transaction, paid_on) in selected {
        let Some(card) = transaction.card.as_deref() else {
            continue;
        };
        let spent = converter
            .convert(
                transaction.payment_amount,
                &transaction.payment_currency,
                paid_on,
            )
            .await?;
        let cashback = converter
            .convert(
                transaction.cashback_amount(),
                &transaction.payment_currency,
                paid_on,
            )
            .await?;
        let group = groups.entry(card).or_insert((0.0, 0.0));
        group.0 += spent;
        group.1 += cashback;
    }
    debug!("Aggregated {} cards", groups.len());

    Ok(groups
        .into_iter()
        .map(|(card, (spent, cashback))| CardSummary {
            last_digits: mask_card(card),
            total_spent: -spent,
            cashback,
        })
        .collect())
}

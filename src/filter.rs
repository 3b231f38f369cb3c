use crate::dates;
use crate::error::ReportError;
use crate::model::{Status, Transaction};
use chrono::NaiveDate;

/// Row selection over a transaction collection. Predicates combine with
/// AND; selection keeps the input order.
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter<'a> {
    ok_only: bool,
    debits_only: bool,
    category: Option<&'a str>,
    window: Option<(NaiveDate, NaiveDate)>,
}

impl<'a> TransactionFilter<'a> {
    pub fn new() -> Self {
        TransactionFilter::default()
    }

    pub fn ok_only(mut self) -> Self {
        self.ok_only = true;
        self
    }

    pub fn debits_only(mut self) -> Self {
        self.debits_only = true;
        self
    }

    pub fn category(mut self, category: &'a str) -> Self {
        self.category = Some(category);
        self
    }

    /// Keep rows paid within [start, end], inclusive on both sides.
    pub fn paid_between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.window = Some((start, end));
        self
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        if self.ok_only && transaction.status != Status::Ok {
            return false;
        }
        if self.debits_only && transaction.payment_amount >= 0.0 {
            return false;
        }
        if let Some(category) = self.category {
            if transaction.category != category {
                return false;
            }
        }
        true
    }

    /// Select without touching the date fields. A payment window, if set,
    /// is ignored here; use [`select_dated`](Self::select_dated) for it.
    pub fn select<'t>(&self, transactions: &'t [Transaction]) -> Vec<&'t Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }

    /// Select with payment dates parsed. Every row's date is parsed up
    /// front, so one malformed date fails the whole collection even when
    /// the predicates would have discarded that row.
    pub fn select_dated<'t>(
        &self,
        transactions: &'t [Transaction],
    ) -> Result<Vec<(&'t Transaction, NaiveDate)>, ReportError> {
        let mut dated = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            let paid_on = dates::parse_payment_date(&transaction.payment_date)?;
            dated.push((transaction, paid_on));
        }

        let mut selected = Vec::new();
        for (transaction, paid_on) in dated {
            if !self.matches(transaction) {
                continue;
            }
            if let Some((start, end)) = self.window {
                if paid_on < start || paid_on > end {
                    continue;
                }
            }
            selected.push((transaction, paid_on));
        }
        Ok(selected)
    }
}

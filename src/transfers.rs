use crate::filter::TransactionFilter;
use crate::model::Transaction;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

const TRANSFERS_CATEGORY: &str = "Переводы";

// A capitalized name followed by an initial, e.g. "Валерий А."
static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[А-ЯA-Z][а-яa-z]* [А-ЯA-Z]\.").expect("pattern is valid"));

/// Completed outgoing transfers whose description opens with a person's
/// name.
pub fn individual_transfers(transactions: &[Transaction]) -> Vec<&Transaction> {
    if transactions.is_empty() {
        warn!("Transfer search got no transactions");
        return Vec::new();
    }

    let matches: Vec<&Transaction> = TransactionFilter::new()
        .ok_only()
        .debits_only()
        .category(TRANSFERS_CATEGORY)
        .select(transactions)
        .into_iter()
        .filter(|transaction| PERSON_NAME.is_match(&transaction.description))
        .collect();

    if matches.is_empty() {
        warn!("Transfer search matched nothing");
    } else {
        debug!("Transfer search matched {} transactions", matches.len());
    }
    matches
}

use crate::model::Transaction;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Reads the bank operations export. One undecodable row fails the whole
/// read.
pub fn read_operations<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open operations file: {}", path.display()))?;

    let mut transactions = Vec::new();
    for row in reader.deserialize() {
        let transaction: Transaction = row
            .with_context(|| format!("Failed to parse operations file: {}", path.display()))?;
        transactions.push(transaction);
    }
    debug!(
        "Read {} operations from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

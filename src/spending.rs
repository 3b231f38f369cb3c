use crate::dates;
use crate::error::ReportError;
use crate::filter::TransactionFilter;
use crate::model::Transaction;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rows spent on `category` within the three-month window ending at `end`,
/// a "DD.MM.YYYY" date. A missing end date means today; an unparseable one
/// falls back to today with a warning. Records come back in source order
/// and source format.
pub fn spending_by_category(
    transactions: &[Transaction],
    category: &str,
    end: Option<&str>,
) -> Result<Vec<Transaction>, ReportError> {
    let end_date = match end {
        None => Local::now().date_naive(),
        Some(raw) => match dates::parse_payment_date(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Report end date is unusable ({}), using today", e);
                Local::now().date_naive()
            }
        },
    };
    let (start, end_date) = dates::report_window(end_date)?;
    debug!(
        "Reporting {} spending between {} and {}",
        category, start, end_date
    );

    let selected = TransactionFilter::new()
        .ok_only()
        .debits_only()
        .category(category)
        .paid_between(start, end_date)
        .select_dated(transactions)?;

    Ok(selected
        .into_iter()
        .map(|(transaction, _)| transaction.clone())
        .collect())
}

/// Persist report records, named after the report and the day it ran. The
/// target directory must already exist.
pub fn write_report(reports_dir: &Path, records: &[Transaction]) -> Result<PathBuf> {
    let path = reports_dir.join(format!(
        "spending_by_category_{}.json",
        Local::now().format("%Y-%m-%d")
    ));
    let json = serde_json::to_string(records)?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    debug!("Wrote {} report records to {}", records.len(), path.display());
    Ok(path)
}

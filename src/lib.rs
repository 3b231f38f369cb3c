pub mod cards;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod filter;
pub mod log;
pub mod model;
pub mod providers;
pub mod rate_provider;
pub mod source;
pub mod spending;
pub mod stock_provider;
pub mod top;
pub mod transfers;

use anyhow::Result;
use std::path::Path;
use tracing::{debug, error, info};

use crate::providers::caching::RateCache;
use crate::providers::cbr::CbrDailyRates;
use crate::providers::fmp::FmpStockQuotes;

pub enum AppCommand {
    Dashboard { at: Option<String> },
    Spending { category: String, end: Option<String> },
    Transfers,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Operations analyzer starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Dashboard { at } => {
            // The dashboard never hard-fails on data problems; each section
            // degrades and the payload shrinks to "{}" at worst
            let transactions = match source::read_operations(&config.operations_path) {
                Ok(transactions) => transactions,
                Err(e) => {
                    error!("Reading operations failed: {e:#}");
                    Vec::new()
                }
            };
            let settings = match config::UserSettings::load_from_path(&config.user_settings_path) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    error!("Reading user settings failed: {e:#}");
                    None
                }
            };

            let cbr_base = config
                .providers
                .cbr
                .as_ref()
                .map_or("https://cbr.ru", |p| &p.base_url);
            let rates = RateCache::new(CbrDailyRates::new(cbr_base));

            let fmp = config.providers.fmp.as_ref();
            let stocks = FmpStockQuotes::new(
                fmp.map_or("https://financialmodelingprep.com", |p| &p.base_url),
                fmp.map_or("", |p| &p.api_key),
            );

            match dashboard::assemble(
                &transactions,
                at.as_deref(),
                settings.as_ref(),
                &rates,
                &stocks,
                &config.currency,
            )
            .await
            {
                Ok(payload) => println!("{}", dashboard::render(&payload)?),
                Err(e) => {
                    error!("Dashboard assembly failed: {}", e);
                    println!("{{}}");
                }
            }
            Ok(())
        }
        AppCommand::Spending { category, end } => {
            let transactions = source::read_operations(&config.operations_path)?;
            let records =
                match spending::spending_by_category(&transactions, &category, end.as_deref()) {
                    Ok(records) => records,
                    Err(e) => {
                        error!("Spending report failed: {}", e);
                        Vec::new()
                    }
                };
            if let Err(e) = spending::write_report(Path::new(&config.reports_dir), &records) {
                error!("Persisting the report failed: {e:#}");
            }
            println!("{}", serde_json::to_string(&records)?);
            Ok(())
        }
        AppCommand::Transfers => {
            let transactions = source::read_operations(&config.operations_path)?;
            let matches = transfers::individual_transfers(&transactions);
            if matches.is_empty() {
                println!();
            } else {
                println!("{}", serde_json::to_string(&matches)?);
            }
            Ok(())
        }
    }
}

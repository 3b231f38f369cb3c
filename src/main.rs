use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use moneta::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for moneta::AppCommand {
    fn from(cmd: Commands) -> moneta::AppCommand {
        match cmd {
            Commands::Dashboard { date } => moneta::AppCommand::Dashboard { at: date },
            Commands::Spending { category, date } => moneta::AppCommand::Spending {
                category,
                end: date,
            },
            Commands::Transfers => moneta::AppCommand::Transfers,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Print the dashboard payload as JSON
    Dashboard {
        /// Anchor timestamp, e.g. "2021-12-20 14:30:00"
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Report spending for a category over the last three months
    Spending {
        /// Category, e.g. "Супермаркеты"
        category: String,
        /// Report end date, e.g. "21.01.2025"
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List transfers to individuals
    Transfers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => moneta::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = moneta::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
operations_path: "data/operations.csv"
user_settings_path: "user_settings.json"
reports_dir: "data"

providers:
  cbr:
    base_url: "https://cbr.ru"
  fmp:
    base_url: "https://financialmodelingprep.com"
    api_key: ""

currency: "RUB"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

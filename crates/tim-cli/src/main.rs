mod convert;
mod detect;
mod scan;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tim_core::{ConfigError, Settings, TimeFormat, WageFrequency};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tim")]
#[command(about = "Find prices in text or HTML and show what they cost in work time")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Annotate the first price in TEXT with its work-time cost
    Convert {
        text: String,
        #[command(flatten)]
        wage: WageArgs,
        /// Write the time as "2 hours, 30 minutes" instead of "2h 30m"
        #[arg(long)]
        verbose: bool,
    },
    /// List the price candidates found in TEXT, best first
    Detect {
        text: String,
        #[command(flatten)]
        wage: WageArgs,
        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan a saved HTML page and print an annotation per price
    Scan {
        file: PathBuf,
        #[command(flatten)]
        wage: WageArgs,
        /// Print annotations as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Per-invocation overrides layered over the settings file and environment.
#[derive(Debug, Clone, Default, Args)]
struct WageArgs {
    /// Wage amount, e.g. 20 or 41600
    #[arg(long)]
    amount: Option<String>,
    /// hourly or yearly
    #[arg(long)]
    frequency: Option<WageFrequency>,
    /// ISO code of the currency to annotate, e.g. EUR
    #[arg(long)]
    currency: Option<String>,
}

impl WageArgs {
    /// Layers the flags over `settings` and validates the result.
    fn resolve(&self, mut settings: Settings) -> Result<Settings, ConfigError> {
        self.apply(&mut settings);
        tim_core::validate_settings(&settings)?;
        Ok(settings)
    }

    fn apply(&self, settings: &mut Settings) {
        if let Some(amount) = &self.amount {
            settings.wage.amount.clone_from(amount);
        }
        if let Some(frequency) = self.frequency {
            settings.wage.frequency = Some(frequency);
        }
        if let Some(currency) = &self.currency {
            let code = currency.trim().to_ascii_uppercase();
            settings.wage.currency_code.clone_from(&code);
            settings.target_currency = Some(code);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = tim_core::load_app_config()?;
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("tim: nothing to do, see --help");
        return Ok(());
    };

    let settings = tim_core::resolve_settings(&config)?;
    match command {
        Commands::Convert {
            text,
            wage,
            verbose,
        } => {
            let mut settings = wage.resolve(settings)?;
            if verbose {
                settings.time_format = TimeFormat::Verbose;
            }
            convert::run_convert(&text, &settings);
        }
        Commands::Detect { text, wage, json } => {
            let settings = wage.resolve(settings)?;
            detect::run_detect(&text, &settings, json)?;
        }
        Commands::Scan { file, wage, json } => {
            let settings = wage.resolve(settings)?;
            scan::run_scan(&file, &settings, json)?;
        }
    }

    Ok(())
}

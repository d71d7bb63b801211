//! Legato command-line front end
//!
//! Loads the vault deployment and prints payout projections:
//!
//! ```text
//! legato 100 2.5
//! LEGATO_CONFIG=vault.json legato 10
//! ```

use anyhow::Context;
use legato_core::units::parse_display;
use legato_core::{AppConfig, Clock, ProtocolError, SystemClock, Timestamp};
use vault::{project, MaturityTerm, Projection, BASE_SYMBOL};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "LEGATO_CONFIG";

/// Run the CLI with the process arguments
pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("legato=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    let config = load_config()?;
    tracing::info!(
        network = ?config.network,
        module = %config.vault.module_address,
        "Loaded vault deployment"
    );

    let amounts: Vec<String> = std::env::args().skip(1).collect();
    if amounts.is_empty() {
        anyhow::bail!("usage: legato <amount> [<amount> ...]");
    }

    let term = MaturityTerm::from_config(&config.vault);
    let now = SystemClock.now();

    for raw in &amounts {
        let (amount, projection) = project_input(raw, &term, now)?;
        if projection.expired {
            tracing::warn!("Vault term has matured, projections are below principal");
        }
        println!(
            "{}",
            projection_line(amount, &projection, &config.vault.receipt_symbol)
        );
    }

    Ok(())
}

fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            AppConfig::load(&path).with_context(|| format!("loading config from {path}"))
        }
        Err(_) => {
            tracing::debug!("{} not set, using built-in testnet deployment", CONFIG_ENV);
            Ok(AppConfig::default())
        }
    }
}

/// Parse one command-line amount the way the panel parses its input field
pub fn project_input(
    raw: &str,
    term: &MaturityTerm,
    now: Timestamp,
) -> Result<(f64, Projection), ProtocolError> {
    let amount = parse_display(raw)?;
    Ok((amount, project(amount, term, now)?))
}

/// One output row, e.g. `100.000 APT -> 105.000 PT-APR24 (365.0 days)`
pub fn projection_line(amount: f64, projection: &Projection, receipt_symbol: &str) -> String {
    format!(
        "{:.3} {} -> {:.3} {} ({:.1} days)",
        amount, BASE_SYMBOL, projection.payout, receipt_symbol, projection.days_remaining
    )
}

//! Order gate driver.
//!
//! Loads a gate configuration and replays request records through the
//! validation pipeline.
//!
//! ```text
//!   request file ──▶ ┌───────────────────────────────────────────────┐
//!                    │ memoization → sanitization → abuse_guard →    │
//!                    │ authentication                                │
//!                    └──────────────────────┬────────────────────────┘
//!                                           │ Verified
//!                                           ▼
//!                                    order registration ──▶ stdout (JSON)
//! ```

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use order_gate::config::{load_config, validate_config, ConfigError, GateConfig};
use order_gate::observability::logging;
use order_gate::orders::Order;
use order_gate::pipeline::FieldValue;
use order_gate::{OrderGate, Request};

#[derive(Parser)]
#[command(name = "order-gate")]
#[command(about = "Validation pipeline in front of order creation", long_about = None)]
struct Cli {
    /// Gate configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the effective settings
    CheckConfig,
    /// Run a JSON file of request records through the gate
    Replay {
        /// JSON array of {"name": ..., "fields": {...}} records
        requests: PathBuf,

        /// Confirm every order right after registering it
        #[arg(long)]
        confirm: bool,
    },
}

/// One request in a replay file.
#[derive(Debug, Deserialize)]
struct RequestRecord {
    name: String,
    fields: BTreeMap<String, FieldValue>,
}

/// Result line printed per replayed record.
#[derive(Debug, Serialize)]
struct ReplayOutcome {
    name: String,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<Order>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability)?;
    tracing::info!("order-gate v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::CheckConfig => {
            let mut redacted = config.clone();
            for principal in &mut redacted.principals {
                principal.secret = "<redacted>".to_string();
            }
            println!("{}", toml::to_string_pretty(&redacted)?);
        }
        Commands::Replay { requests, confirm } => {
            let gate = OrderGate::from_config(&config)?;
            let records: Vec<RequestRecord> =
                serde_json::from_str(&fs::read_to_string(&requests)?)?;

            tracing::info!(records = records.len(), path = ?requests, "Replaying requests");
            for record in records {
                let outcome = replay(&gate, record, confirm)?;
                println!("{}", serde_json::to_string(&outcome)?);
            }

            let summary = serde_json::json!({
                "stages": gate.stage_stats(),
                "orders": gate.orders(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn replay(
    gate: &OrderGate,
    record: RequestRecord,
    confirm: bool,
) -> Result<ReplayOutcome, Box<dyn std::error::Error>> {
    let request = Request::from_fields(record.fields);

    let outcome = match gate.verify(request) {
        Ok(verified) => {
            let mut order = gate.register_order(verified)?;
            if confirm {
                order = gate.confirm_order(order.id)?;
            }
            ReplayOutcome {
                name: record.name,
                accepted: true,
                rejection: None,
                order: Some(order),
            }
        }
        Err(rejection) => ReplayOutcome {
            name: record.name,
            accepted: false,
            rejection: Some(rejection.to_string()),
            order: None,
        },
    };
    Ok(outcome)
}

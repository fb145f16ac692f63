//! Tripdesk snapshot inspector.
//!
//! Runs the reconciliation engine over exported booking/attachment query
//! results and prints the dashboard view as JSON.
//!
//! Usage: `tripdesk <bookings.json> [attachments.json] [--config <path>]
//! [--booking <id>] [--now <rfc3339>]`. Logging follows `RUST_LOG`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Parser;
use serde_json::json;

use tripdesk_lib::attachments::partition_for_display;
use tripdesk_lib::config::{load_config, load_config_from, ReconcileConfig};
use tripdesk_lib::dashboard::build_dashboard;
use tripdesk_lib::error::ReconcileError;
use tripdesk_lib::snapshot::{load_attachments, load_bookings};
use tripdesk_lib::time::parse_instant;

/// Print the travel dashboard for an exported booking snapshot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Booking store query result (JSON array or {"data": [...]})
    bookings: PathBuf,

    /// Attachment store query result
    attachments: Option<PathBuf>,

    /// Config file [default: ~/.tripdesk/config.json]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also print the document split for this booking id
    #[arg(long)]
    booking: Option<String>,

    /// Reference instant instead of the system clock
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(value).ok_or_else(|| format!("not a timestamp: {}", value))
}

/// Load the config and reject an unknown timezone instead of falling back.
fn load_checked_config(path: Option<&Path>) -> Result<ReconcileConfig, ReconcileError> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    config.validate()?;
    Ok(config)
}

fn run() -> Result<(), ReconcileError> {
    let args = Args::parse();

    let config = load_checked_config(args.config.as_deref())?;
    let now = args.now.unwrap_or_else(Utc::now);

    let bookings = load_bookings(&args.bookings)?;
    let attachments = match &args.attachments {
        Some(path) => load_attachments(path)?,
        None => Vec::new(),
    };
    log::info!(
        "Loaded {} bookings and {} attachments",
        bookings.len(),
        attachments.len()
    );

    let view = build_dashboard(&bookings, now, &config);

    let output = match &args.booking {
        Some(id) => {
            let booking = bookings
                .iter()
                .find(|b| &b.id == id)
                .ok_or_else(|| ReconcileError::BookingNotFound(id.clone()))?;
            json!({
                "dashboard": serde_json::to_value(&view)?,
                "documents": serde_json::to_value(partition_for_display(booking, &attachments))?,
            })
        }
        None => serde_json::to_value(&view)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        eprintln!("{}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

//! Command dispatch for the `dirsnap` binary.
//!
//! Kept in the library so the same code paths are covered by the CLI
//! integration tests and the unit tests below.

use crate::cli::{Args, Commands};
use crate::common::EntryInfo;
use crate::{archive_dir, extract_archive, is_archive, list_entries};
use chrono::{TimeZone, Utc};
use std::error::Error;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive, e.g. `dirsnap=debug`.
pub const LOG_ENV: &str = "DIRSNAP_LOG";

/// Installs the stderr log subscriber. `verbose` forces debug output.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // a second init (tests, embedding) keeps the subscriber already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run_cli_app(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command {
        Commands::Pack { source, output, glob } => {
            if archive_dir(&source, &output, &glob)? {
                println!("Packed {} into {}", source.display(), output.display());
            } else {
                println!("Nothing in {} matched '{}'; {} has no entries", source.display(), glob, output.display());
            }
        }
        Commands::Unpack { archive, output } => {
            if !is_archive(&archive) {
                warn!(archive = %archive.display(), "input does not look like an archive");
            }
            extract_archive(&archive, &output)?;
            println!("Extracted {} into {}", archive.display(), output.display());
        }
        Commands::List { archive, json } => {
            let entries = list_entries(&archive)?;
            if json {
                for entry in &entries {
                    println!("{}", serde_json::to_string(entry)?);
                }
            } else {
                println!("Archive Index ({} entries):", entries.len());
                for entry in &entries {
                    println!("{}", format_entry(entry));
                }
            }
        }
    }
    Ok(())
}

fn format_entry(entry: &EntryInfo) -> String {
    let mode = entry.mode.map_or_else(|| "---".to_string(), |m| format!("{m:03o}"));
    let modified = entry
        .modified_millis
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string());
    format!("- {} [{}] {} {} bytes {}", entry.path, entry.kind, mode, entry.size, modified)
}

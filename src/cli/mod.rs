use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log every packed and restored entry.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Pack the files of a directory into a zip snapshot.
    #[command(alias = "p")]
    Pack {
        /// The directory to archive.
        #[arg(required = true)]
        source: PathBuf,

        /// The path for the output archive file (e.g., snapshot.zip). Overwritten if present.
        #[arg(short, long)]
        output: PathBuf,

        /// Only pack files whose name matches this glob. `*` packs everything.
        #[arg(short, long, env = "DIRSNAP_GLOB", default_value = "*")]
        glob: String,
    },

    /// Restore an archive into a directory.
    #[command(alias = "u")]
    Unpack {
        /// The archive file to extract.
        #[arg(required = true)]
        archive: PathBuf,

        /// The directory where entries will be extracted. Created if missing.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the contents of an archive without extracting it.
    #[command(alias = "l")]
    List {
        /// The archive file to list contents of.
        #[arg(required = true)]
        archive: PathBuf,

        /// Print one JSON object per entry.
        #[arg(long)]
        json: bool,
    },
}

/// Parses command-line arguments using `clap`.
///
/// Exits the process on `--help`, `--version` or invalid arguments.
pub fn run() -> Args {
    Args::parse()
}

//! Fieldbook: the fieldwork execution engine for internal audit.
//!
//! **Fieldbook turns an audit template into an executable test program and
//! tracks every test step through its completion lifecycle.**
//!
//! # Architecture
//!
//! ## Volatile, single-writer state
//!
//! The per-engagement workpaper program lives in an in-memory
//! [`engine::store::ProgramStore`] for the process lifetime. Commands run to
//! completion in arrival order; there is no background worker and no
//! locking. Durable persistence belongs to an external collaborator, which
//! can drive the store's explicit `snapshot`/`restore` hooks.
//!
//! ## External collaborators
//!
//! - **Engagement collection** (read-only): drives program generation and
//!   the lock predicate (`Completed`/`Review` engagements are read-only).
//! - **Template catalog** (read-only): consumed once per engagement by the
//!   resolver; a lookup miss falls back silently to a generic program.
//! - **Findings collection**: append-only from this engine; follow-up
//!   mutation happens outside.
//!
//! ## Components
//!
//! - [`engine::resolver`]: template → initial ordered program
//! - [`engine::store`]: per-engagement program cache
//! - [`engine::state`]: pending → wip → pass/fail lifecycle
//! - [`engine::procedure`] / [`engine::evidence`]: per-workpaper editing
//! - [`engine::reorder`]: splice moves and the two-phase drag gesture
//! - [`engine::finding`]: raising and filtering linked findings
//! - [`engine::session`]: the command surface the shell drives
//!
//! # Example
//!
//! ```bash
//! # Run the shell against the built-in demo catalog
//! fieldbook run
//!
//! # Drive it from a script with JSON envelopes per command
//! fieldbook run --format json --script fieldwork.txt
//! ```

pub mod core;
pub mod engine;
pub mod shell;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::error::FieldbookError;
use crate::shell::{OutputFormat, Shell};

#[derive(Parser, Debug)]
#[clap(
    name = "fieldbook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fieldwork execution engine for internal audit: template-driven programs, workpaper lifecycle, evidence capture, and finding linkage."
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive fieldwork shell (one command per line).
    Run {
        /// Output format for command results.
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Engagement collection as a JSON file (demo catalog if omitted).
        #[clap(long)]
        engagements: Option<PathBuf>,
        /// Template catalog as a JSON file (demo catalog if omitted).
        #[clap(long)]
        templates: Option<PathBuf>,
        /// Read commands from a script file instead of stdin.
        #[clap(long)]
        script: Option<PathBuf>,
    },
    /// Print the version.
    Version,
}

pub fn run() -> Result<(), FieldbookError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Run {
            format,
            engagements,
            templates,
            script,
        } => {
            let mut shell = Shell::load(engagements.as_deref(), templates.as_deref(), format)?;
            let stdout = io::stdout();
            match script {
                Some(path) => {
                    let reader = BufReader::new(File::open(path)?);
                    shell.run(reader, stdout.lock())?;
                }
                None => {
                    let stdin = io::stdin();
                    shell.run(stdin.lock(), stdout.lock())?;
                }
            }
            Ok(())
        }
    }
}

//! # Tabula CLI
//!
//! Command-line front end for browsing JSON record collections with
//! [`tabula_query`], [`tabula_table`] and [`tabula_store`].
//!
//! ```text
//! tabula generate -n 100000 --seed 7 -o users.json
//! tabula query -d users.json -c users.yaml -s ana --sort name:desc --page 2
//! tabula query -d users.json -f role:equals:Admin -f role:equals:Editor --match any
//! tabula columns -c users.yaml
//! ```
//!
//! The binary is a thin wrapper over [`run`], which writes to any
//! [`Write`] so commands can be driven in-process.

use std::io::Write;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod cli;
pub mod commands;
pub mod render;

pub use cli::{Cli, Command};
pub use render::Styles;

/// Dispatches a parsed command line.
pub fn run(cli: &Cli, out: &mut dyn Write, color: bool) -> anyhow::Result<()> {
    let styles = Styles::new(color);
    match &cli.command {
        Command::Query(args) => commands::query::run(args, out, &styles),
        Command::Generate(args) => commands::generate::run(args, out),
        Command::Columns(args) => commands::columns::run(args, out, &styles),
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise verbosity picks the level.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests driving several commands) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

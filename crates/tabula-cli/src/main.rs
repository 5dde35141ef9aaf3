use std::io::Write;

use anyhow::Result;
use clap::Parser;
use console::Term;
use tabula_cli::{init_tracing, run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = Term::stdout().features().colors_supported();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out, color)?;
    out.flush()?;
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use flowstrip::cli::{self, CliArgs, EXIT_SUCCESS};
use std::io::IsTerminal;

fn main() -> Result<()> {
    // Only installs a subscriber when FLOWSTRIP_LOG or RUST_LOG is set.
    flowstrip::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let color = std::io::stderr().is_terminal();
    let status = cli::run(
        &args,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
        color,
    )?;
    if status != EXIT_SUCCESS {
        std::process::exit(status);
    }
    Ok(())
}

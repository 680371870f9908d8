mod cmd;
mod config;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    // Running without a subcommand is the same as `lectern build`
    cmd::build::add_build_args(Command::new("lectern"))
        .about("Turn a folder of lecture notes into a static site")
        .version(env!("CARGO_PKG_VERSION"))
        .args_conflicts_with_subcommands(true)
        .subcommand(cmd::build::make_subcommand())
}

fn main() -> Result<()> {
    // RUST_LOG wins; otherwise report each processed document
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("build", args)) => cmd::build::execute(args),
        _ => cmd::build::execute(&matches),
    }
}

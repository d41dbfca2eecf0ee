//! lightarbiter CLI: drive the shared notification LED from a terminal.
//!
//! Every invocation builds a fresh lights module, so arbitration only spans
//! the requests of one command (`apply` feeds several through one module).

use std::path::PathBuf;

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "lightarbiter",
    version,
    about = "Arbitrate battery, notification and attention requests on a shared RGB LED"
)]
struct Args {
    /// Output as JSON (for set, apply, plan, points, config)
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log every control-point decision
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = cli::run(args.command, args.json, args.config.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

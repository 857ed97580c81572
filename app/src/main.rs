//! Binary entry point: CLI parsing, logging, terminal bracketing.

use clap::Parser;
use tido::{App, AppOptions, Filter};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// A terminal to-do list.
#[derive(Parser, Debug)]
#[command(name = "tido", version, about)]
struct Cli {
    /// Initial filter view (unknown values fall back to "all")
    #[arg(long, default_value = "all")]
    filter: Filter,

    /// Plain ASCII glyphs (no unicode checkboxes or rounded borders)
    #[arg(long)]
    ascii: bool,

    /// Increase log verbosity (-v debug, -vv trace); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let terminal = ratatui::init();
    let app = App::new(AppOptions {
        filter: cli.filter,
        ascii: cli.ascii,
    });
    let result = app.run(terminal).await;
    ratatui::restore();

    result
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

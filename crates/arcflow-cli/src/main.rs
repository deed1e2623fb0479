//! arcflow - a personal task board in the terminal.
//!
//! Groups hold tasks, tasks hold subtasks, and everything is addressed by the
//! number it currently shows on the board.

use anyhow::Result;
use arcflow_core::AppPaths;
use clap::Parser;

mod app;
mod cli;

use app::App;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let request = cli.request().unwrap_or_else(|err| err.exit());
    let paths = match cli.data_dir {
        Some(dir) => AppPaths::new(dir),
        None => AppPaths::user_default()?,
    };
    tracing::debug!(?request, "request parsed");

    let app = App::new(&paths, cli.yes)?;
    app.run(request, &mut std::io::stdout().lock())
}

fn init_tracing(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
}

mod terminal;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use santa_core::{Config, EventStore, IdStrategy};
use santa_state::Session;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::terminal::{TerminalConsole, TerminalOptions};

#[derive(Parser)]
#[command(name = "santa-cli")]
#[command(about = "Organize Secret Santa gift exchanges from the terminal")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.secret-santa/config.toml when present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Seed the assignment draw for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Mint UUID event ids instead of sequential numbers
    #[arg(long)]
    uuid_ids: bool,

    /// Accept the same name more than once on a roster
    #[arg(long)]
    allow_duplicates: bool,

    /// Print events as JSON
    #[arg(long)]
    json: bool,

    /// Do not clear the screen between menus
    #[arg(long)]
    no_clear: bool,

    /// Log filter, e.g. "debug" or "santa_core=trace" (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.uuid_ids {
            config.id_strategy = IdStrategy::Uuid;
        }
        if self.allow_duplicates {
            config.allow_duplicate_participants = true;
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // stdout belongs to the dialog; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let console = TerminalConsole::new(
        io::stdin().lock(),
        io::stdout(),
        TerminalOptions {
            json: cli.json,
            clear_screen: !cli.no_clear,
        },
    );
    let mut session = Session::new(EventStore::new(&config), console, config.schedule.clone());
    session.run().context("interactive session failed")?;
    Ok(())
}

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use labelist_cli::embed::embedder_from_settings;
use labelist_cli::{
    AppContext, Console, OllamaClient, PipedSource, RustylineSource, WELCOME, build_registry,
};
use labelist_config::{Settings, default_lexicon, load_lexicon};
use labelist_core::{Dispatcher, Repl};
use labelist_sqlite::{ConverseStore, GlobalStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "labelist", version)]
#[command(about = "Interactive shell for collecting and labelling model conversations")]
struct Cli {
    /// Settings YAML file (defaults to the per-user config directory).
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Lexicon file (JSON or YAML) replacing the built-in command definitions.
    #[arg(long)]
    lexicon: Option<PathBuf>,
    /// Conversation database file.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Global store database file.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Write debug logs to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "labelist=debug"
    } else {
        "labelist=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings, String> {
    let mut settings = Settings::resolve(cli.settings.as_deref())
        .map_err(|e| format!("failed to load settings: {e}"))?;
    settings.apply_env();
    if let Some(path) = &cli.lexicon {
        settings.lexicon_path = Some(path.clone());
    }
    if let Some(path) = &cli.db {
        settings.storage.db_path = path.clone();
    }
    if let Some(path) = &cli.store {
        settings.storage.store_path = path.clone();
    }
    debug!(?settings, "resolved settings");
    Ok(settings)
}

fn run(cli: Cli) -> Result<(), String> {
    let settings = load_settings(&cli)?;

    let mut console = Console::stdout();
    console.info("Loading app...");

    let lexicon = match &settings.lexicon_path {
        Some(path) => load_lexicon(path)
            .map_err(|e| format!("failed to load lexicon {}: {e}", path.display()))?,
        None => default_lexicon().map_err(|e| format!("built-in lexicon: {e}"))?,
    };
    info!(commands = lexicon.len(), "lexicon loaded");

    let converse = ConverseStore::open(&settings.storage.db_path)
        .map_err(|e| format!("failed to open {}: {e}", settings.storage.db_path.display()))?;
    let globals = GlobalStore::open(&settings.storage.store_path).map_err(|e| {
        format!(
            "failed to open {}: {e}",
            settings.storage.store_path.display()
        )
    })?;
    let inference = OllamaClient::from_settings(&settings.ollama).map_err(|e| e.to_string())?;
    let embedder = embedder_from_settings(&settings.ollama).map_err(|e| e.to_string())?;
    console.done("Dependencies loaded.");

    let mut ctx = AppContext {
        console,
        converse,
        globals,
        lexicon: lexicon.clone(),
        ollama: settings.ollama,
        inference: Box::new(inference),
        embedder,
    };
    ctx.initialize().map_err(|e| e.to_string())?;

    let dispatcher = Dispatcher::new(build_registry(), lexicon);
    let mut repl = Repl::new(&dispatcher);

    let outcome = if io::stdin().is_terminal() {
        ctx.console.print(&WELCOME.cyan().to_string());
        let mut source = RustylineSource::new().map_err(|e| e.to_string())?;
        repl.run(&mut ctx, &mut source)
    } else {
        ctx.console.print(WELCOME);
        let mut source = PipedSource::new(io::stdin().lock());
        repl.run(&mut ctx, &mut source)
    };
    outcome.map_err(|e| format!("input failed: {e}"))?;

    ctx.console.warn("Goodbye");
    Ok(())
}

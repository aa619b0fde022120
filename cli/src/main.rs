use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use termline_console::{
    Channel, CommandTable, ConsoleConfig, Dispatcher, Outcome, SessionRegistry,
};
use termline_core::parse_line;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Id under which the interactive console registers itself.
const LOCAL_SESSION: &str = "local";

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "termline", version = PACKAGE_VERSION)]
#[command(about = "Cursor-aware command line parsing and an interactive console")]
struct Cli {
    /// Log filter used when RUST_LOG and the config file set none.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one line and print the parse result.
    Parse(ParseArgs),
    /// Print the completion context for a cursor position.
    Complete(CompleteArgs),
    /// Read lines from stdin and run them as console commands.
    Repl(ReplArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// The raw line.
    #[arg(allow_hyphen_values = true)]
    line: String,
    /// Cursor byte offset (default: end of line).
    #[arg(long)]
    cursor: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// The raw line.
    #[arg(allow_hyphen_values = true)]
    line: String,
    /// Cursor byte offset (default: end of line).
    #[arg(long)]
    cursor: Option<usize>,
    /// Console configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ReplArgs {
    /// Console configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// The console's own terminal, registered so it shows up in `ls`.
struct LocalTerminal;

impl Channel for LocalTerminal {
    fn close(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => {
            init_logging(&cli.log_level, None);
            run_parse(args)
        }
        Command::Complete(args) => load_config(args.config.as_ref()).and_then(|config| {
            init_logging(&cli.log_level, config.log_filter.as_deref());
            run_complete(args, config)
        }),
        Command::Repl(args) => load_config(args.config.as_ref()).and_then(|config| {
            init_logging(&cli.log_level, config.log_filter.as_deref());
            run_repl(config)
        }),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries command output.
fn init_logging(flag_level: &str, config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_filter.unwrap_or(flag_level)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ConsoleConfig, String> {
    match path {
        Some(path) => ConsoleConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(ConsoleConfig::default()),
    }
}

fn format_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let cursor = args.cursor.unwrap_or(args.line.len());
    let parsed = parse_line(&args.line, cursor);
    println!("{}", format_output(&parsed, args.format)?.trim_end());
    Ok(())
}

fn run_complete(args: CompleteArgs, config: ConsoleConfig) -> Result<(), String> {
    let dispatcher = Dispatcher::new(
        CommandTable::builtin(),
        Arc::new(SessionRegistry::new()),
        config,
    );
    let cursor = args.cursor.unwrap_or(args.line.len());
    let context = dispatcher.complete_context(&args.line, cursor);
    println!("{}", format_output(&context, args.format)?.trim_end());
    Ok(())
}

fn run_repl(config: ConsoleConfig) -> Result<(), String> {
    let registry = Arc::new(SessionRegistry::new());
    registry
        .add(LOCAL_SESSION, Box::new(LocalTerminal))
        .map_err(|err| err.to_string())?;

    let prompt = config.prompt.clone();
    let dispatcher = Dispatcher::new(CommandTable::builtin(), Arc::clone(&registry), config);
    info!(version = PACKAGE_VERSION, "Console ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{prompt}");
        stdout
            .flush()
            .map_err(|err| format!("Failed to write prompt: {err}"))?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|err| format!("Failed to read input: {err}"))?;

        match dispatcher.execute(line.trim_end_matches('\r'), &mut stdout) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Exit) => break,
            Err(err) => {
                warn!(line = %line, error = %err, "Command failed");
                eprintln!("error: {err}");
            }
        }
    }

    registry.remove(LOCAL_SESSION);
    Ok(())
}

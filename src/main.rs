//! # Academy Search CLI (`academy`)
//!
//! Ask questions about the curriculum in plain English, browse it with
//! terminal-style commands, and inspect the search index.
//!
//! ## Usage
//!
//! ```bash
//! academy --config ./config/academy.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `academy ask "<query>"` | Resolve one natural-language query |
//! | `academy suggest "<partial>"` | Autocomplete suggestions |
//! | `academy shell` | Interactive terminal (literal commands + questions) |
//! | `academy run <line>...` | Feed lines through the terminal non-interactively |
//! | `academy normalize "<query>"` | Show spelling correction + synonym expansion |
//! | `academy index` | List the search index entries |
//! | `academy stats` | Corpus, index, and vocabulary summary |
//!
//! ## Examples
//!
//! ```bash
//! academy ask "Tell me about module 2"
//! academy ask "multi agent architecture" --json
//! academy run "cat 01.2" next complete progress
//! echo "explain orchestration" | academy shell
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=academy_search_core=debug`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy_search::config;
use academy_search::corpus::build_resolver;
use academy_search::dispatch::CommandHandler;
use academy_search::format::{format_no_match, format_result, with_hints};
use academy_search::shell::{run_shell, write_result, ShellOptions};
use academy_search::stats;

/// Academy Search CLI: natural-language search over a course curriculum.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/academy.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "academy",
    about = "Academy Search: natural-language search over a course curriculum",
    version,
    long_about = "Academy Search resolves free-form questions (\"Tell me about module 2\", \
    \"What is the cursr?\") to curriculum modules, sections, and tools using spelling \
    correction, synonym expansion, curated phrases, and weighted fuzzy matching."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/academy.toml`. When the file does not exist,
    /// built-in defaults are used.
    #[arg(long, global = true, default_value = "./config/academy.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve a natural-language query.
    ///
    /// Prints the formatted answer, or a no-match message with example
    /// phrasings. Exits successfully either way.
    Ask {
        /// The question, e.g. "What is the cursr?".
        query: String,

        /// Print the result as JSON (`null` when nothing matched).
        #[arg(long)]
        json: bool,

        /// Override the fuzzy threshold from config (0.0 strict to 1.0 loose).
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Autocomplete suggestions for a partial query, one per line.
    Suggest {
        /// Partial query (at least two characters).
        partial: String,
    },

    /// Start the interactive terminal.
    ///
    /// Reads commands from stdin. The prompt is only shown when stdin is a
    /// terminal. Type `exit` or `quit` to leave.
    Shell,

    /// Run each argument as a terminal line, in order, sharing one session.
    Run {
        /// Lines to run, e.g. `"cat 01.2" next complete progress`.
        #[arg(required = true)]
        lines: Vec<String>,

        /// Print each result as a JSON object per line.
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized form of a query.
    Normalize {
        /// The query to normalize.
        query: String,
    },

    /// List the search index entries.
    Index {
        /// Print the entries as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Show corpus, index, and vocabulary statistics.
    Stats,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "academy_search=warn,academy_search_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config_or_default(&cli.config)?;
    let mut resolver = build_resolver(&cfg)?;

    match cli.command {
        Commands::Ask {
            query,
            json,
            threshold,
        } => {
            if let Some(t) = threshold {
                resolver.set_confidence_threshold(t);
            }
            let result = resolver.parse_query(&query);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("Failed to serialize result")?
                );
            } else {
                match result {
                    Some(r) => println!("{}", format_result(&r)),
                    None => {
                        let hints = resolver.context_aware_suggestions(&query);
                        println!("{}", with_hints(format_no_match(&query), &hints));
                    }
                }
            }
        }
        Commands::Suggest { partial } => {
            for s in resolver.get_suggestions(&partial) {
                println!("{}", s);
            }
        }
        Commands::Shell => {
            let mut handler = CommandHandler::new(resolver);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            run_shell(&mut handler, stdin.lock(), &mut stdout, &ShellOptions::detect())?;
        }
        Commands::Run { lines, json } => {
            let mut handler = CommandHandler::new(resolver);
            let mut stdout = std::io::stdout().lock();
            for line in &lines {
                let result = handler.handle(line);
                if json {
                    let encoded =
                        serde_json::to_string(&result).context("Failed to serialize result")?;
                    writeln!(stdout, "{}", encoded)?;
                } else {
                    write_result(&mut stdout, &result, false)?;
                }
            }
        }
        Commands::Normalize { query } => {
            println!("{}", resolver.normalize(&query));
        }
        Commands::Index { json } => {
            let entries = resolver.entries();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(entries).context("Failed to serialize index")?
                );
            } else {
                for e in entries {
                    println!("{:<8} {:<14} {}", e.kind.as_str(), e.id, e.title);
                }
            }
        }
        Commands::Stats => {
            stats::run_stats(&cfg, &resolver)?;
        }
    }

    Ok(())
}

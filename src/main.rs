use anyhow::{Context, Result};
use answer_engine::config::{
    default_config_path, find_config_file, get_config, load_config, save_config, Config,
    ConfigFileError, CONFIG_FILE_NAME,
};
use answer_engine::models::OrchestratorState;
use answer_engine::orchestrator::Orchestrator;
use answer_engine::providers::{
    AnswerProvider, GeminiAnswerProvider, NewsApiProvider, NewsProvider, RetryingAnswerProvider,
    RetryingNewsProvider,
};
use answer_engine::render::DocumentBuilder;
use answer_engine::ui::{self, SearchSpinner, TerminalRenderer};
use answer_engine::utils::{HttpClient, RetryConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Answer Engine - Ask a question, get a rendered answer with related news
#[derive(Parser, Debug)]
#[command(name = "answer-engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "hongkongkiwi")]
#[command(about = "Ask a question, get a rendered answer with related news sources", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (text if TTY, JSON otherwise)
    Auto,
    /// Human-readable terminal text
    Text,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    fn resolve(self) -> OutputFormat {
        match self {
            OutputFormat::Auto if ui::is_terminal() => OutputFormat::Text,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question and render the answer with related news
    #[command(alias = "a")]
    Ask {
        /// The question to ask
        query: String,
    },

    /// Render raw answer text from a file (or stdin) without calling any API
    Render {
        /// File to read; stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Language for code fences without a tag
        #[arg(long)]
        default_language: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a configuration template
    Init {
        /// Where to write it (default: platform config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration (API keys masked)
    Show,
}

fn print_env_vars() {
    println!("Answer Engine - Environment Variables");
    println!();
    println!("API Keys:");
    println!("  GEMINI_API_KEY              API key for the Gemini answer provider");
    println!("  NEWS_API_KEY                API key for NewsAPI");
    println!();
    println!("Overrides (section and key separated by a double underscore):");
    println!("  ANSWER_ENGINE_ANSWER__MODEL            Gemini model (default: gemini-pro)");
    println!("  ANSWER_ENGINE_NEWS__PAGE_SIZE          Articles per search (default: 4)");
    println!("  ANSWER_ENGINE_NEWS__LANGUAGE           Article language (default: en)");
    println!("  ANSWER_ENGINE_RENDER__DEFAULT_LANGUAGE Language for untagged code (default: javascript)");
    println!("  ANSWER_ENGINE_HTTP__TIMEOUT_SECS       Request timeout (default: 30)");
    println!("  ANSWER_ENGINE_RETRY__MAX_ATTEMPTS      Attempts per provider call (default: 1)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  GEMINI_API_KEY=... NEWS_API_KEY=... answer-engine ask \"What is a volcano?\"");
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("answer_engine={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path).with_context(|| format!("Failed to load {}", path.display()));
    }

    match find_config_file() {
        Some(path) => {
            tracing::info!("Using config file: {}", path.display());
            load_config(&path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => get_config().context("Failed to read ANSWER_ENGINE_* overrides"),
    }
}

fn build_providers(config: &Config) -> (Arc<dyn AnswerProvider>, Arc<dyn NewsProvider>) {
    let client = HttpClient::from_config(&config.http);

    let mut answers: Arc<dyn AnswerProvider> =
        Arc::new(GeminiAnswerProvider::from_config(config, client.clone()));
    let mut news: Arc<dyn NewsProvider> = Arc::new(NewsApiProvider::from_config(config, client));

    if config.retry.max_attempts > 1 {
        let retry = RetryConfig::from(&config.retry);
        answers = Arc::new(RetryingAnswerProvider::new(answers, retry));
        news = Arc::new(RetryingNewsProvider::new(news, retry));
    }

    (answers, news)
}

fn builder_for(config: &Config) -> DocumentBuilder {
    DocumentBuilder::new().with_default_language(config.render.default_language.clone())
}

fn mask(key: &Option<String>) -> String {
    match key.as_deref() {
        Some(k) if k.chars().count() > 4 => format!("{}****", k.chars().take(4).collect::<String>()),
        Some(_) => "****".to_string(),
        None => "(not set)".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
        return Ok(());
    }

    init_tracing(cli.verbose, cli.quiet);

    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    let format = cli.output.resolve();
    let renderer = TerminalRenderer::new();

    match cli.command {
        Some(Commands::Ask { query }) => {
            let (answers, news) = build_providers(&config);
            let orchestrator =
                Arc::new(Orchestrator::new(answers, news).with_builder(builder_for(&config)));

            let handle = orchestrator.spawn_submit(&query)?;

            if format == OutputFormat::Text && !cli.quiet && ui::is_terminal() {
                SearchSpinner::new()
                    .follow(orchestrator.subscribe(), &renderer)
                    .await;
            }

            let outcome = handle.await.context("Search task failed")?;
            tracing::debug!(?outcome, "Search finished");

            let state = orchestrator.state();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
                _ => {
                    print!("{}", renderer.render_state(&state));
                    if !cli.quiet && state.result().is_some() {
                        println!();
                        println!("{}", renderer.status_line(&state));
                    }
                }
            }

            if matches!(state, OrchestratorState::Failure { .. }) {
                std::process::exit(1);
            }
        }

        Some(Commands::Render {
            file,
            default_language,
        }) => {
            let raw = match file.as_deref() {
                Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                _ => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let mut builder = builder_for(&config);
            if let Some(language) = default_language {
                builder = builder.with_default_language(language);
            }

            let document = builder.build(&raw);
            tracing::debug!(blocks = document.len(), "Rendered document");

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&document)?),
                _ => print!("{}", renderer.render_document(&document)),
            }
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { path, force } => {
                let path = path
                    .or_else(default_config_path)
                    .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

                if path.exists() && !force {
                    return Err(ConfigFileError::AlreadyExists(path.display().to_string()).into());
                }

                save_config(&Config::template(), &path)?;
                println!("Wrote configuration template to {}", path.display());
            }
            ConfigAction::Show => {
                let mut shown = config.clone();
                shown.api_keys.gemini = Some(mask(&config.api_keys.gemini));
                shown.api_keys.news = Some(mask(&config.api_keys.news));

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
                    _ => print!("{}", toml::to_string_pretty(&shown)?),
                }
            }
        },

        None => {
            println!("Answer Engine v{}", answer_engine::VERSION);
            println!();
            println!("Usage:");
            println!("  answer-engine ask \"What causes volcanic eruptions?\"");
            println!("  answer-engine render answer.md");
            println!("  answer-engine config init");
            println!();
            println!("Run with --help for all options.");
        }
    }

    Ok(())
}

//! Dhonk Craft chat backend - main entry point

use clap::{Parser, Subcommand};
use dhonk_chat::chat::{ChatPipeline, ContactDirectory};
use dhonk_chat::config::ChatConfig;
use dhonk_chat::intent::KeywordIntentClassifier;
use dhonk_chat::observability::{init_default_logging, metrics::metrics};
use dhonk_chat::server::ChatServer;
use dhonk_chat::store::PgContentStore;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Chat backend for the Dhonk Craft website
#[derive(Parser)]
#[command(name = "dhonk-chat")]
#[command(about = "Chat backend for the Dhonk Craft website")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chat server
    Run,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!(
        "Starting Dhonk Craft chat backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => run_server(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Application shutdown complete");
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<ChatConfig, Box<dyn std::error::Error>> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());
        return Ok(ChatConfig::load_from_file(path)?);
    }

    // No -c flag; look in the usual places
    for candidate in ["dhonk.toml", "config/dhonk.toml"] {
        let path = PathBuf::from(candidate);
        if path.exists() {
            info!("Loading configuration from: {}", path.display());
            return Ok(ChatConfig::load_from_file(&path)?);
        }
    }

    error!("No configuration file found. Pass -c/--config or create dhonk.toml");
    process::exit(1);
}

async fn run_server(config: ChatConfig) -> Result<(), Box<dyn std::error::Error>> {
    let collector = metrics();
    collector.set_service_state("initializing");

    let pipeline = build_pipeline(&config).await?;

    // PORT overrides the configured port, matching container conventions
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);

    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    let shutdown = async move {
        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };

    collector.set_service_state("running");
    ChatServer::new(pipeline, port).run(shutdown).await;

    collector.set_service_state("stopped");
    Ok(())
}

/// Provider factory for creating LLM providers from configuration
struct LlmProviderFactory;

impl LlmProviderFactory {
    fn create_provider(
        config: &ChatConfig,
    ) -> Result<Arc<dyn dhonk_chat::llm::provider::LlmProvider>, Box<dyn std::error::Error>> {
        use dhonk_chat::llm::providers::{
            AnthropicConfig, AnthropicProvider, OpenAiConfig, OpenAiProvider,
        };

        match config.llm.provider.as_str() {
            "openai" => {
                let api_key = config.get_llm_api_key()?;
                let openai_config = OpenAiConfig {
                    api_key,
                    ..Default::default()
                };
                let provider = OpenAiProvider::new(openai_config)?;
                Ok(Arc::new(provider))
            }
            "anthropic" => {
                let api_key = config.get_llm_api_key()?;
                let anthropic_config = AnthropicConfig {
                    api_key,
                    ..Default::default()
                };
                let provider = AnthropicProvider::new(anthropic_config)?;
                Ok(Arc::new(provider))
            }
            provider => Err(format!("Unsupported LLM provider: {provider}").into()),
        }
    }
}

/// Bootstrap factory - builds the pipeline with injected dependencies
async fn build_pipeline(
    config: &ChatConfig,
) -> Result<Arc<ChatPipeline>, Box<dyn std::error::Error>> {
    let provider = LlmProviderFactory::create_provider(config)?;

    // Startup probe only; an unreachable model API does not stop the server
    if let Err(e) = provider.health_check().await {
        warn!("Model provider health check failed: {}", e);
    }

    let store = PgContentStore::from_config(config);
    if config.get_database_password().is_none() {
        warn!(
            "Environment variable {} not set, connecting to Postgres without a password",
            config.database.password_env
        );
    }

    let contacts = ContactDirectory::from_config(config.contacts.as_ref());

    Ok(Arc::new(ChatPipeline::new(
        Arc::new(KeywordIntentClassifier::default()),
        contacts,
        Arc::new(store),
        provider,
        config.llm.clone(),
    )))
}

fn handle_config_command(config: ChatConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}

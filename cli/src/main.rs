//! CLI entrypoint for tandem
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use tandem_application::ports::conversation_store::ConversationStore;
use tandem_application::{CreateConversationUseCase, RunSynergyUseCase, ScaffoldProjectUseCase};
use tandem_domain::{ConversationId, Idea, Settings};
use tandem_infrastructure::{
    ChatCompletionsClient, ConfigLoader, FileConfig, FileProviderConfig, FsScaffoldWriter,
    JsonFileStore, ProviderSettings,
};
use tandem_presentation::{ChatRepl, Cli, Command, ConsoleFormatter, run_once};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("invalid configuration: {e}"))?
    };

    info!("Starting tandem");

    let Some(command) = cli.command else {
        bail!("A subcommand is required. Try 'tandem --help'.");
    };

    // === Dependency Injection ===
    let store = Arc::new(JsonFileStore::open(config.store.resolved_path()));

    match command {
        Command::New { idea } => {
            let Some(idea) = Idea::try_new(idea) else {
                bail!("idea must not be empty");
            };
            let primary = build_client(&config.providers.primary)?;
            let use_case = CreateConversationUseCase::new(
                Arc::clone(&store),
                primary,
                config.providers.secondary.name.clone(),
            );
            let conversation = use_case.execute(idea).await?;
            print!("{}", ConsoleFormatter::format_conversation(&conversation, false));
            println!("id: {}", conversation.id());
        }

        Command::Send { id, message } => {
            let id: ConversationId = id.parse()?;
            let use_case = Arc::new(synergy_use_case(&store, &config)?);
            run_once(use_case, id, message, !cli.quiet, true).await;
        }

        Command::Chat { id, idea } => {
            let id: ConversationId = match (id, idea) {
                (Some(id), _) => id.parse()?,
                (None, Some(idea)) => {
                    let Some(idea) = Idea::try_new(idea) else {
                        bail!("idea must not be empty");
                    };
                    let primary = build_client(&config.providers.primary)?;
                    let create = CreateConversationUseCase::new(
                        Arc::clone(&store),
                        primary,
                        config.providers.secondary.name.clone(),
                    );
                    let conversation = create.execute(idea).await?;
                    println!("Created conversation {}", conversation.id());
                    conversation.id().clone()
                }
                (None, None) => bail!("provide a conversation id or --idea to start a new one"),
            };

            let use_case = Arc::new(synergy_use_case(&store, &config)?);
            let repl = ChatRepl::new(use_case, Arc::clone(&store)).with_progress(!cli.quiet);
            repl.run(id).await?;
        }

        Command::List => {
            let summaries = store.list_summaries().await?;
            print!("{}", ConsoleFormatter::format_summaries(&summaries));
        }

        Command::Show { id, internal } => {
            let id: ConversationId = id.parse()?;
            let conversation = store.get(&id).await?;
            print!("{}", ConsoleFormatter::format_conversation(&conversation, internal));
        }

        Command::Settings { id, set } => {
            let id: ConversationId = id.parse()?;
            if set.is_empty() {
                let conversation = store.get(&id).await?;
                println!("{}", serde_json::to_string_pretty(conversation.settings())?);
            } else {
                let mut partial = Settings::new();
                for pair in &set {
                    let Some((key, value)) = pair.split_once('=') else {
                        bail!("expected KEY=VALUE, got {pair:?}");
                    };
                    // Values parse as JSON when possible, fall back to string
                    let value = serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
                    partial.insert(key.to_string(), value);
                }
                let merged = store.update_settings(&id, partial).await?;
                println!("{}", serde_json::to_string_pretty(&merged)?);
            }
        }

        Command::Scaffold { id } => {
            let id: ConversationId = id.parse()?;
            let secondary = build_client(&config.providers.secondary)?;
            let writer = Arc::new(FsScaffoldWriter::new(config.scaffold.resolved_projects_dir()));
            let use_case = ScaffoldProjectUseCase::new(Arc::clone(&store), secondary, writer);
            let output = use_case.execute(&id).await?;
            print!(
                "{}",
                ConsoleFormatter::format_scaffold(&output.plan.files, &output.written)
            );
        }

        Command::Delete { id } => {
            let id: ConversationId = id.parse()?;
            if store.delete(&id).await? {
                println!("Deleted {id}");
            } else {
                bail!("conversation {id} not found");
            }
        }
    }

    Ok(())
}

/// Construct one provider client; the API key comes from the env var named
/// in the config.
fn build_client(provider: &FileProviderConfig) -> Result<Arc<ChatCompletionsClient>> {
    let api_key = std::env::var(&provider.api_key_env)
        .with_context(|| format!("environment variable {} not set", provider.api_key_env))?;
    Ok(Arc::new(ChatCompletionsClient::new(ProviderSettings {
        name: provider.name.clone(),
        model: provider.model.clone(),
        base_url: provider.base_url.clone(),
        api_key,
        temperature: provider.temperature,
    })))
}

fn synergy_use_case(
    store: &Arc<JsonFileStore>,
    config: &FileConfig,
) -> Result<RunSynergyUseCase<JsonFileStore>> {
    let primary = build_client(&config.providers.primary)?;
    let secondary = build_client(&config.providers.secondary)?;
    Ok(RunSynergyUseCase::new(Arc::clone(store), primary, secondary))
}

//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use roundtable_application::{
    CompareResponsesInput, CompareResponsesUseCase, ContextWindowBuilder, GenerationGateway,
    RunDiscussionInput, RunDiscussionUseCase, StoredMessage,
};
use roundtable_domain::{
    GenerationResult, ProviderId, SubscriptionTier, accessible_personas, all_personas,
    persona_by_id,
};
use roundtable_infrastructure::{
    ConfigLoader, FallbackRouter, FileConfig, FileUsageMeter, JsonlConversationStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roundtable", version, about = "Multi-persona AI discussions")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip all config files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one discussion round with the selected personas
    Discuss {
        /// The question to put to the table
        prompt: String,

        /// Personas to include (repeatable)
        #[arg(short, long = "persona")]
        personas: Vec<String>,

        /// Subscription tier to gate persona access with
        #[arg(short, long)]
        tier: Option<SubscriptionTier>,

        /// Provider to try first, ahead of the priority order
        #[arg(long)]
        provider: Option<ProviderId>,

        /// Conversation to continue; history is loaded and the round appended
        #[arg(short, long)]
        conversation: Option<String>,

        /// Emit results as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Regenerate a conversation's rolling summary and print it
    Summarize {
        /// Conversation to summarize
        conversation: String,
    },

    /// List the key differences between two or three responses (Pro+)
    Compare {
        /// Responses to compare (two or three)
        #[arg(num_args = 2..=3, required = true)]
        responses: Vec<String>,

        /// Subscription tier of the caller
        #[arg(short, long)]
        tier: Option<SubscriptionTier>,

        /// Emit differences as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// List the persona catalog with tier requirements
    Personas {
        /// Show lock status relative to this tier
        #[arg(short, long)]
        tier: Option<SubscriptionTier>,
    },
}

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

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // === Dependency Injection ===
    let gateway = Arc::new(FallbackRouter::with_defaults(reqwest::Client::new()));
    let data_dir = storage_dir(&config)?;
    let store = Arc::new(JsonlConversationStore::new(&data_dir)?);
    let meter = FileUsageMeter::new(&data_dir);

    match cli.command {
        Command::Discuss {
            prompt,
            personas,
            tier,
            provider,
            conversation,
            json,
        } => {
            discuss(
                &config,
                gateway,
                store,
                &meter,
                prompt,
                personas,
                tier,
                provider,
                conversation,
                json,
            )
            .await
        }
        Command::Summarize { conversation } => {
            let builder = ContextWindowBuilder::new(store, gateway);
            let summary = builder.generate_and_store_summary(&conversation).await?;
            if summary.is_empty() {
                println!("Nothing to summarize yet.");
            } else {
                println!("{}", summary);
            }
            Ok(())
        }
        Command::Compare {
            responses,
            tier,
            json,
        } => {
            let tier = tier.unwrap_or(config.defaults.tier);
            let mut responses = responses.into_iter();
            let (Some(a), Some(b)) = (responses.next(), responses.next()) else {
                bail!("Compare needs at least two responses");
            };

            let mut input = CompareResponsesInput::new(a, b, tier);
            if let Some(c) = responses.next() {
                input = input.with_third_response(c);
            }

            let differences = CompareResponsesUseCase::new(gateway).execute(input).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&differences)?);
            } else {
                for (n, difference) in differences.iter().enumerate() {
                    println!("{}. {}", n + 1, difference);
                }
            }
            Ok(())
        }
        Command::Personas { tier } => {
            let tier = tier.unwrap_or(config.defaults.tier);
            for persona in all_personas() {
                let marker = if persona.is_locked(tier) {
                    format!("locked, requires {}", persona.required_tier)
                } else {
                    "available".to_string()
                };
                println!(
                    "{:12} {:16} [{}]  {}",
                    persona.id, persona.display_name, marker, persona.description
                );
            }
            println!(
                "\n{} of {} personas available at {} (up to {} per round)",
                accessible_personas(tier).len(),
                all_personas().len(),
                tier,
                tier.max_selectable()
            );
            Ok(())
        }
    }
}

/// Conversation directory: configured, or the platform data dir.
fn storage_dir(config: &FileConfig) -> Result<PathBuf> {
    if let Some(dir) = &config.storage.dir {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|d| d.join("roundtable").join("conversations"))
        .context("could not determine a data directory; set [storage] dir in the config")
}

#[allow(clippy::too_many_arguments)]
async fn discuss(
    config: &FileConfig,
    gateway: Arc<FallbackRouter>,
    store: Arc<JsonlConversationStore>,
    meter: &FileUsageMeter,
    prompt: String,
    personas: Vec<String>,
    tier: Option<SubscriptionTier>,
    provider: Option<ProviderId>,
    conversation: Option<String>,
    json: bool,
) -> Result<()> {
    let persona_ids = if personas.is_empty() {
        config.defaults.personas.clone()
    } else {
        personas
    };
    let tier = tier.unwrap_or(config.defaults.tier);
    let provider = provider.or(config.defaults.provider);

    let usage = meter.check(tier).await?;
    if !usage.allowed {
        bail!(
            "Monthly discussion limit reached ({} of {} used on the {} plan)",
            usage.current_usage,
            usage.limit.unwrap_or(0),
            tier
        );
    }

    info!(
        "Starting discussion with {} personas at tier {}",
        persona_ids.len(),
        tier
    );

    // Continuing a conversation: load the bounded context first.
    let builder = ContextWindowBuilder::new(Arc::clone(&store), Arc::clone(&gateway));
    let mut summary_task = None;
    let mut input = RunDiscussionInput::new(prompt.clone(), persona_ids).with_tier(tier);

    if let Some(conversation_id) = &conversation {
        let window = builder.build(conversation_id, &prompt).await?;
        if window.should_generate_summary {
            summary_task = Some(builder.spawn_summary(conversation_id));
        }
        // The window ends with the new message; everything before it is history.
        let mut history = window.messages;
        history.pop();
        input = input.with_history(history);
    }

    if let Some(provider) = provider {
        input = input.with_preferred_provider(provider);
    }

    let results = RunDiscussionUseCase::new(Arc::clone(&gateway))
        .execute(input)
        .await?;

    if results.is_empty() {
        bail!("No persona could produce a response; try again later");
    }

    meter.record_discussion().await?;

    if let Some(conversation_id) = &conversation {
        persist_round(&store, conversation_id, &prompt, &results).await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            let name = persona_by_id(&result.agent_id)
                .map(|p| p.display_name)
                .unwrap_or(result.agent_id.as_str());
            println!("=== {} (via {}) ===", name, result.provider);
            println!("{}\n", result.content);
        }
    }

    if let Some(provider) = gateway.last_provider() {
        info!("Last provider used: {}", provider);
    }

    // Let an in-flight summary land before the process exits.
    if let Some(task) = summary_task {
        let _ = task.await;
    }

    Ok(())
}

/// Append the round to the conversation: the user prompt, then each
/// persona's response.
async fn persist_round(
    store: &JsonlConversationStore,
    conversation_id: &str,
    prompt: &str,
    results: &[GenerationResult],
) -> Result<()> {
    use roundtable_application::ConversationStore;

    store
        .append_message(conversation_id, StoredMessage::user(prompt))
        .await?;
    for result in results {
        store
            .append_message(
                conversation_id,
                StoredMessage::agent(result.agent_id.clone(), result.content.clone()),
            )
            .await?;
    }
    Ok(())
}

//! chatfaq-history - browse a sender's widget conversations from the terminal
//!
//! Drives the conversation store against a live broker.

use chatfaq_widget::broker::{Message, SenderType};
use chatfaq_widget::{ConversationStore, HttpBroker, LoggingBroker, WidgetConfig};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "chatfaq-history", version, about = "Inspect ChatFAQ widget conversations")]
struct Cli {
    /// Broker base URL (overrides CHATFAQ_API)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Sender id whose conversations to load (overrides CHATFAQ_USER_ID)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the sender's conversations
    List,

    /// Print the messages of a conversation by platform conversation id
    Open { platform_conversation_id: String },

    /// Rename a conversation by its broker id; needs --user or CHATFAQ_USER_ID, since the id must be in that sender's list
    Rename { id: String, name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatfaq_widget=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let mut config = WidgetConfig::from_env();
    if let Some(api) = cli.api {
        config.api_url = api.trim_end_matches('/').to_string();
    }
    if cli.user.is_some() {
        config.user_id = cli.user;
    }

    tracing::info!(api = %config.api_url, user = ?config.user_id, "Connecting to broker");
    let http = HttpBroker::new(&config.api_url, config.request_timeout)?;
    let broker = Arc::new(LoggingBroker::new(Arc::new(http)));
    let store = ConversationStore::new(&config, broker);

    store.gather_conversations().await?;

    match cli.command {
        Commands::List => {
            for conv in store.snapshot().conversations {
                println!(
                    "{}\t{}\t{}",
                    conv.id,
                    conv.platform_conversation_id,
                    conv.name.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Open {
            platform_conversation_id,
        } => {
            store.open_conversation(&platform_conversation_id).await?;
            let state = store.snapshot();
            for msg in &state.messages {
                println!("{}", format_message(msg));
            }
            if state.waiting_for_response() {
                println!("(waiting for bot response)");
            }
        }
        Commands::Rename { id, name } => {
            store.rename_conversation_name(&id, &name).await?;
            println!("{id}\t{name}");
        }
    }

    Ok(())
}

fn format_message(msg: &Message) -> String {
    let who = match msg.sender.kind {
        SenderType::Human => "human",
        SenderType::Bot => "bot",
        SenderType::Other => "other",
    };
    let content = msg
        .payload
        .as_ref()
        .and_then(|p| p.extra.get("content"))
        .map(|c| c.as_str().map_or_else(|| c.to_string(), str::to_string))
        .unwrap_or_default();
    format!("[{}] {who}: {content}", msg.id)
}

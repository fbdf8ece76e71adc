//! Terminal front end: one-shot account/docs commands and the chat REPL.

mod account;
mod chat;
mod docs;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use crate::services::auth::{AuthClient, AuthSession, CredentialStore};
use crate::services::config::{ClientConfig, ClientPublicConfig, load_client_config};
use crate::services::events::{Events, SessionEvent};
use crate::services::paths;

#[derive(Parser)]
#[command(name = "ifa")]
#[command(about = "Islamic-finance AI assistant client", long_about = None)]
pub(crate) struct Cli {
    /// Backend base URL (overrides IFA_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Read from the prompt when omitted
        #[arg(long, env = "IFA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update name, email or password
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for current and new password
        #[arg(long)]
        change_password: bool,
    },
    /// Interactive chat dashboard
    Chat {
        /// Challenge id or name to start on
        #[arg(long)]
        topic: Option<String>,
        /// Print replies at once instead of word by word
        #[arg(long)]
        no_animate: bool,
    },
    /// Browse the gateway API documentation
    Docs {
        /// Endpoint group id (use-cases, reverse-transactions, standards, finfraud)
        group: Option<String>,
        /// Print the example response of this endpoint id
        #[arg(long)]
        endpoint: Option<String>,
        /// Response status to show with --endpoint (default: first success)
        #[arg(long)]
        status: Option<u16>,
    },
    /// Print the effective configuration
    Config,
}

/// What every command needs: configuration, the auth session and the
/// receiving end of its events.
pub(crate) struct Context {
    pub config: ClientConfig,
    pub events: Events,
    pub event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    pub auth: AuthSession,
}

impl Context {
    fn new(base_url: Option<&str>) -> Self {
        let mut config = load_client_config();
        if let Some(url) = base_url {
            config = config.with_base_url(url);
        }

        let credentials = match paths::init_data_dir(config.data_dir.as_deref()) {
            Ok(dir) => CredentialStore::in_dir(&dir),
            Err(e) => {
                log::warn!("{}; session will not be remembered", e);
                CredentialStore::in_memory()
            }
        };

        let (events, event_rx) = Events::channel();
        let auth = AuthSession::new(AuthClient::new(&config), credentials, events.clone());
        Self {
            config,
            events,
            event_rx,
            auth,
        }
    }
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    if let Commands::Docs {
        group,
        endpoint,
        status,
    } = &cli.command
    {
        return docs::show(group.as_deref(), endpoint.as_deref(), *status);
    }

    let ctx = Context::new(cli.base_url.as_deref());
    log::debug!("Using backend {}", ctx.config.base_url);

    match cli.command {
        Commands::Login { email, password } => account::login(&ctx, &email, password).await,
        Commands::Signup { name, email } => account::signup(&ctx, &name, &email).await,
        Commands::Logout => {
            ctx.auth.logout();
            println!("Logged out.");
            Ok(())
        }
        Commands::Whoami => account::whoami(&ctx).await,
        Commands::Profile {
            name,
            email,
            change_password,
        } => account::profile(&ctx, name, email, change_password).await,
        Commands::Chat { topic, no_animate } => chat::run(ctx, topic.as_deref(), !no_animate).await,
        Commands::Config => {
            let public = ClientPublicConfig::new(
                &ctx.config,
                paths::data_dir_cached(),
                ctx.auth.is_authenticated(),
            );
            println!("{}", serde_json::to_string_pretty(&public)?);
            Ok(())
        }
        Commands::Docs { .. } => Ok(()),
    }
}

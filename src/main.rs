use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use safe_session::config::ConfigError;
use safe_session::{
    AuthError, FileTokenStore, HttpSessionApi, Navigator, Resolution, Session, SessionConfig, SessionManager,
    SignInCredentials, SignUpCredentials, TokenStore,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", describe_auth_error(.0))]
    Auth(#[from] AuthError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "safe-session", about = "SAFE session client")]
struct Cli {
    #[arg(long, env = "SAFE_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "SAFE_STORAGE_PATH")]
    storage_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restore the stored session and print it.
    Status,
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SAFE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SAFE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    SignOut,
    /// Resolve a route through the session guard.
    Visit { path: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = SessionConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    if let Some(path) = cli.storage_path {
        config.storage_path = path;
    }

    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.storage_path.clone(), config.storage_keys()));
    let api = HttpSessionApi::new(&config, Arc::clone(&store))?;
    tracing::debug!(base_url = api.base_url(), storage = %config.storage_path.display(), "session client configured");
    let manager = SessionManager::new(Arc::new(api), store);

    match cli.command {
        Command::Status => {
            manager.initialize().await;
            print_session(&manager.snapshot())
        }
        Command::SignIn { email, password } => {
            manager.initialize().await;
            manager.sign_in(&SignInCredentials::new(email, password)).await?;
            print_session(&manager.snapshot())
        }
        Command::SignUp { name, email, password } => {
            manager.initialize().await;
            manager.sign_up(&SignUpCredentials { name, email, password }).await?;
            print_session(&manager.snapshot())
        }
        Command::SignOut => {
            manager.initialize().await;
            manager.sign_out().await;
            print_session(&manager.snapshot())
        }
        Command::Visit { path } => {
            manager.initialize().await;
            let mut navigator = Navigator::default();
            match navigator.visit(&manager.snapshot(), &path) {
                Resolution::Rendered(location) => {
                    let from = location.from.as_deref().unwrap_or("-");
                    println!("render {} (from {from})", location.path);
                }
                Resolution::Waiting(location) => println!("waiting {}", location.path),
            }
            Ok(())
        }
    }
}

fn print_session(session: &Session) -> Result<(), CliError> {
    let user = match session.user() {
        Some(user) => serde_json::to_value(user)?,
        None => serde_json::Value::Null,
    };
    let view = serde_json::json!({
        "phase": session.phase().as_str(),
        "isAuthenticated": session.is_authenticated(),
        "isLoading": session.is_loading(),
        "user": user,
        "error": session.error().map(AuthError::message),
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn describe_auth_error(err: &AuthError) -> String {
    let fields: Vec<String> = err
        .field_errors()
        .iter()
        .map(|field| format!("\n  {}: {}", field.field, field.message))
        .collect();
    format!("{} ({}, status {}){}", err.message(), err.error_code(), err.status_code(), fields.concat())
}

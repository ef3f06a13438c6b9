use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hoops::auth::{TokenGenerator, issue_admin_token};
use hoops::config::{GameRules, ServerConfig};
use hoops::server::{AppState, create_router};
use hoops::store::{SqliteStore, Store};

#[cfg(unix)]
fn set_restrictive_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "A basketball scoreboard server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and rules file
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create database, rules file and admin token)
    Init {
        /// Data directory for the database and rules file
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },

    /// Issue an additional admin token
    IssueToken {
        /// Data directory for the database and rules file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Expire the token after this many days
        #[arg(long)]
        expires_in_days: Option<i64>,
    },

    /// List admin tokens
    ListTokens {
        /// Data directory for the database and rules file
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

fn print_token(title: &str, raw_token: &str) {
    println!();
    println!("========================================");
    println!("{title}");
    println!();
    println!("  {raw_token}");
    println!();
}

fn run_init(data_dir: PathBuf) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir,
        ..ServerConfig::default()
    };
    fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let token_file = config.token_path();

    if store.has_admin_token()? {
        bail!(
            "Server already initialized. Admin token exists at: {}",
            token_file.display()
        );
    }

    let rules_file = config.rules_path();
    if rules_file.exists() {
        // An existing rules file must still parse.
        GameRules::load(&rules_file)?;
    } else {
        GameRules::default().save(&rules_file)?;
    }

    let generator = TokenGenerator::new();
    let (_token, raw_token) = issue_admin_token(&store, &generator, None)?;

    fs::write(&token_file, &raw_token)?;

    #[cfg(unix)]
    set_restrictive_permissions(&token_file);

    print_token("Admin token (save this, it won't be shown again):", &raw_token);
    println!("Token also written to: {}", token_file.display());
    println!("Game rules: {}", rules_file.display());
    println!("========================================");
    println!();

    Ok(())
}

fn run_issue_token(data_dir: PathBuf, expires_in_days: Option<i64>) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir,
        ..ServerConfig::default()
    };

    if !config.db_path().exists() {
        bail!("Server not initialized. Run 'hoops admin init' first.");
    }

    let expires_at = match expires_in_days {
        Some(days) if days <= 0 => bail!("--expires-in-days must be positive"),
        Some(days) => {
            let expires_at =
                Duration::try_days(days).and_then(|span| Utc::now().checked_add_signed(span));
            match expires_at {
                Some(expires_at) => Some(expires_at),
                None => bail!("--expires-in-days is too large"),
            }
        }
        None => None,
    };

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let generator = TokenGenerator::new();
    let (token, raw_token) = issue_admin_token(&store, &generator, expires_at)?;

    print_token("Admin token (save this, it won't be shown again):", &raw_token);
    match token.expires_at {
        Some(expires_at) => println!("Expires at: {}", expires_at.to_rfc3339()),
        None => println!("Never expires"),
    }
    println!("========================================");
    println!();

    Ok(())
}

fn run_list_tokens(data_dir: PathBuf) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir,
        ..ServerConfig::default()
    };

    if !config.db_path().exists() {
        bail!("Server not initialized. Run 'hoops admin init' first.");
    }

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let tokens = store.list_tokens()?;
    if tokens.is_empty() {
        println!("No tokens found.");
        return Ok(());
    }

    println!(
        "{:<36}  {:<25}  {:<25}  LAST USED",
        "ID", "CREATED", "EXPIRES"
    );
    for token in tokens {
        let expires = token
            .expires_at
            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
        let last_used = token
            .last_used_at
            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
        println!(
            "{:<36}  {:<25}  {:<25}  {}",
            token.id,
            token.created_at.to_rfc3339(),
            expires,
            last_used
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hoops=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { data_dir } => {
                run_init(data_dir.into())?;
            }
            AdminCommands::IssueToken {
                data_dir,
                expires_in_days,
            } => {
                run_issue_token(data_dir.into(), expires_in_days)?;
            }
            AdminCommands::ListTokens { data_dir } => {
                run_list_tokens(data_dir.into())?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
            };

            if !config.db_path().exists() {
                bail!(
                    "Server not initialized. Run 'hoops admin init' first to create the database and admin token."
                );
            }

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;
            if !store.has_admin_token()? {
                bail!(
                    "Server not initialized. Run 'hoops admin init' first to create the database and admin token."
                );
            }

            let rules = GameRules::load(config.rules_path())?;
            info!(
                default_quarter_ms = rules.default_quarter_ms,
                overtime_ms = rules.overtime_ms,
                "Loaded game rules"
            );

            let state = Arc::new(AppState::new(Arc::new(store), rules));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

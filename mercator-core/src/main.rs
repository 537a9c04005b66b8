use anyhow::Result;
use clap::{Parser, Subcommand};
use mercator_core::{
    config::{Config, JwtConfig},
    jwt::JwtManager,
    migration, server, telemetry,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "mercator-core", version, about = "Domain mapping service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database if missing and apply migrations
    Migrate,
    /// Mint an access token for a user
    IssueToken {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        email: String,
        /// Current site claim; defaults to DEFAULT_SITE_ID when omitted
        #[arg(long)]
        site_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = Config::from_env()?;
            let prometheus_handle = telemetry::init(&config.telemetry)?;
            info!("Starting Mercator Core Service");
            info!("HTTP server listening on {}", config.http_addr());
            server::run(config, prometheus_handle).await
        }
        Command::Migrate => {
            let config = Config::from_env()?;
            telemetry::init(&config.telemetry)?;
            migration::run_migrations(&config).await
        }
        Command::IssueToken {
            user_id,
            email,
            site_id,
        } => {
            let manager = JwtManager::new(JwtConfig::from_env()?);
            let token = manager.create_access_token(user_id, &email, site_id)?;
            println!("{}", token);
            Ok(())
        }
    }
}

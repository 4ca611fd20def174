use clap::{Parser, Subcommand};
use timetrack_api::config::{self, AppConfig, Environment};
use timetrack_api::{app, AppState};

#[derive(Parser)]
#[command(name = "timetrack-api")]
#[command(about = "Administrative API for the time-tracking app")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Override API_PORT / PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check that admin credentials are present, without printing them
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetrack_api=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = config::config().clone();

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(config, port).await,
        Command::CheckConfig => check_config(&config),
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting Timetrack Admin API in {:?} mode", config.environment);

    if !config.supabase.is_configured() {
        if config.environment == Environment::Production {
            anyhow::bail!("admin database credentials are not configured");
        }
        tracing::warn!("Admin database credentials not configured; /api/admin/* will fail");
    }

    let port = port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(config))).await?;
    Ok(())
}

fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    let supabase = &config.supabase;
    let checks = [
        ("endpoint URL", !supabase.url.trim().is_empty()),
        ("service role key", !supabase.service_role_key.trim().is_empty()),
        ("JWT secret", !config.security.jwt_secret.is_empty()),
    ];

    for (name, present) in &checks {
        println!("{:<18} {}", name, if *present { "present" } else { "MISSING" });
    }

    if checks.iter().all(|(_, present)| *present) {
        Ok(())
    } else {
        anyhow::bail!("configuration incomplete")
    }
}

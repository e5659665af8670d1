use anyhow::Context;
use std::sync::Arc;
use todos::{
    api::routes::build_app,
    auth::jwt::TokenService,
    cli::{Cli, Commands, LogFormat},
    db::DatabaseProvider,
    utils::config::{ConfigError, TodoConfig},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    let (mut config, missing_file) = match TodoConfig::load(&cli.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound(_)) => (TodoConfig::default(), true),
        Err(e) => {
            return Err(e).with_context(|| format!("loading {}", cli.config.display()));
        }
    };
    config.apply_env_overrides()?;

    init_tracing(&config, &cli);

    if missing_file {
        tracing::warn!(
            path = %cli.config.display(),
            "configuration file not found, using defaults"
        );
    }

    config.validate()?;

    if let Some(Commands::Config { validate }) = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        if validate {
            TokenService::new(config.jwt_secret()?)?;
            println!("\n# configuration OK");
        }
        return Ok(());
    }

    let secret = config
        .jwt_secret()
        .context("token signing secret is required")?;
    let token_service = Arc::new(TokenService::new(&secret)?);

    let provider = DatabaseProvider::from_url(&config.database.url);
    tracing::info!(?provider, "opening database");
    let repos = provider.connect().await?;

    let addr = config.bind_address();
    let state = AppState::new(config, repos.users, repos.todos, token_service);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "todo server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &TodoConfig, cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "todos={default_level},todo_server={default_level},tower_http={default_level}"
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

use std::path::PathBuf;

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

/// Group expense-splitting HTTP service.
#[derive(Parser)]
#[command(name = "equisplit", version)]
struct Args {
    /// Settings file, optional when everything comes from the environment.
    #[arg(short, long, env = "EQUISPLIT_CONFIG", default_value = "settings.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let settings = settings::Settings::new(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "equisplit={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let mut builder = engine::Engine::builder().database(db);
    if let Some(cost) = settings.auth.bcrypt_cost {
        builder = builder.password_cost(cost);
    }
    let engine = builder.build().await?;
    let keys = server::TokenKeys::new(settings.auth.jwt_secret.as_bytes());

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, keys, listener).await?;
    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let mut options = match config {
        Database::Memory => sea_orm::ConnectOptions::new("sqlite::memory:"),
        Database::Sqlite(path) => sea_orm::ConnectOptions::new(format!("sqlite:{path}?mode=rwc")),
    };
    if matches!(config, Database::Memory) {
        // Each pooled connection would open a separate in-memory database.
        options.max_connections(1);
    }
    options.sqlx_logging(false);

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}

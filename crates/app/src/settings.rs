//! Handles settings for the application. Configuration is read from a TOML
//! file (`settings.toml` unless `--config` says otherwise) and from
//! `EQUISPLIT__<SECTION>__<KEY>` environment variables, which win.
//!
//! See `settings.example.toml` for the available keys.
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

/// Where the data lives: `"memory"` or `{ sqlite = "<path>" }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// HS256 secret for session tokens.
    pub jwt_secret: String,
    /// bcrypt cost, the library default when unset.
    pub bcrypt_cost: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

impl Settings {
    pub fn new(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "memory")?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("EQUISPLIT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

use std::{env, fmt, net::SocketAddr, sync::Arc};

use config::{Config, ConfigError, Environment, File};
use http::Uri;
use serde::Deserialize;

const ENV_PREFIX: &str = "PROFILEOXIDE";
const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Builds the name of an environment variable belonging to this service,
/// e.g. `env_name("LOG")` -> `PROFILEOXIDE_LOG`.
pub fn env_name(name: &str) -> String {
    format!("{ENV_PREFIX}_{name}")
}

pub type ArcSettings = Arc<Settings>;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub general: GeneralSettings,
    pub db: DbSettings,
}

#[derive(Debug, Deserialize)]
pub struct GeneralSettings {
    pub listen_address: ListenAddress,
    #[serde(with = "http_serde_ext::uri")]
    pub public_url: Uri,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListenAddress {
    One(SocketAddr),
    Many(Vec<SocketAddr>),
}

impl From<ListenAddress> for Vec<SocketAddr> {
    fn from(value: ListenAddress) -> Self {
        match value {
            ListenAddress::One(addr) => vec![addr],
            ListenAddress::Many(addrs) => addrs,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "RawDbSettings")]
pub struct DbSettings {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub credentials: Option<DbCredentials>,
}

#[derive(Deserialize)]
struct RawDbSettings {
    endpoint: String,
    namespace: String,
    database: String,
    username: Option<String>,
    password: Option<String>,
}

impl TryFrom<RawDbSettings> for DbSettings {
    type Error = String;

    fn try_from(raw: RawDbSettings) -> Result<Self, Self::Error> {
        let credentials = match (raw.username, raw.password) {
            (Some(username), Some(password)) => Some(DbCredentials { username, password }),
            (None, None) => None,
            (Some(_), None) => return Err("db.username is set but db.password is not".into()),
            (None, Some(_)) => return Err("db.password is set but db.username is not".into()),
        };

        Ok(Self {
            endpoint: raw.endpoint,
            namespace: raw.namespace,
            database: raw.database,
            credentials,
        })
    }
}

pub struct DbCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Settings {
    /// Loads settings from the defaults, the optional config file and
    /// `PROFILEOXIDE_*` environment variables, in increasing priority.
    pub fn try_load() -> Result<Self, ConfigError> {
        let path = env::var(env_name("CONFIG")).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        Self::load_from(
            Config::builder()
                .add_source(File::with_name(&path).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("_")
                        .separator("__"),
                ),
        )
    }

    fn load_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("general.listen_address", "0.0.0.0:8080")?
            .set_default("general.public_url", "http://localhost:8080")?
            .set_default("db.endpoint", "mem://")?
            .set_default("db.namespace", "profileoxide")?
            .set_default("db.database", "profileoxide")?
            .build()?
            .try_deserialize()
    }
}

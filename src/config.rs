use crate::error::{
    BadEnvVarSnafu, ParseMaxConnectionsSnafu, ParsePortSnafu, RegistrarResult,
    UnknownStorageBackendSnafu,
};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 15;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    storage: Arc<StorageConfig>,
    server_ip: String,
}

#[derive(Debug)]
pub enum StorageConfig {
    Postgres(DbConfig),
    Memory,
}

impl RuntimeConfiguration {
    pub fn new() -> RegistrarResult<Self> {
        Self::from_lookup(dotenvy::var)
    }

    /// Builds the configuration from `lookup` instead of the process environment.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> RegistrarResult<Self> {
        let storage = match lookup("REGISTRAR_STORAGE").ok().as_deref() {
            None | Some("postgres") => StorageConfig::Postgres(DbConfig::from_lookup(&lookup)?),
            Some("memory") => StorageConfig::Memory,
            Some(other) => {
                return UnknownStorageBackendSnafu { name: other }.fail();
            }
        };

        let server_ip =
            lookup("REGISTRAR_SERVER_IP").unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string());

        Ok(Self {
            storage: Arc::new(storage),
            server_ip,
        })
    }

    pub fn storage(&self) -> Arc<StorageConfig> {
        self.storage.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
    max_connections: u32,
}

impl DbConfig {
    fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> RegistrarResult<Self> {
        let get_env_var = |name| lookup(name).context(BadEnvVarSnafu { name });

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().context(ParseMaxConnectionsSnafu)?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            user: get_env_var("DB_USER")?,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?.parse().context(ParsePortSnafu)?,
            database: get_env_var("DB_NAME")?,
            max_connections,
        })
    }

    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}

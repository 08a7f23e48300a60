//! Process configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `DB_USER`, `DB_PASS`: MongoDB credentials (required unless `STORE_BACKEND=memory`)
//! - `PORT`: HTTP listen port (default: 5000)
//! - `STORE_BACKEND`: `mongodb` (default) or `memory`
//!
//! Any of these may also come from a `.env` file in the working directory or
//! one of its parents; a variable set in the process environment wins over
//! the file. The cluster host, database and collection are fixed.

use std::{collections::HashMap, fmt, path::Path};

use thiserror::Error;

/// MongoDB Atlas cluster the service connects to.
pub const CLUSTER_HOST: &str = "cluster0.fgzyiou.mongodb.net";

/// Database holding the equipment collection.
pub const DATABASE_NAME: &str = "sportsEquipmentDB";

/// Collection holding equipment records.
pub const COLLECTION_NAME: &str = "equipments";

/// Field the list endpoint filters on.
pub const OWNER_FIELD: &str = "userEmail";

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid PORT {0:?}: expected an integer between 0 and 65535")]
    InvalidPort(String),
    #[error("unknown STORE_BACKEND {0:?}: expected \"mongodb\" or \"memory\"")]
    UnknownBackend(String),
    #[error("unreadable .env file: {0}")]
    EnvFile(String),
}

/// Process environment layered over the variables of a `.env` file.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    file: HashMap<String, String>,
}

impl Environment {
    /// Reads the nearest `.env` file. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_entries(dotenvy::dotenv_iter())
    }

    /// Reads variables from the `.env`-formatted file at `path`. A missing
    /// file is not an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_entries(dotenvy::from_path_iter(path))
    }

    fn from_entries<I>(entries: Result<I, dotenvy::Error>) -> Result<Self, ConfigError>
    where
        I: Iterator<Item = Result<(String, String), dotenvy::Error>>,
    {
        match entries {
            Ok(entries) => entries
                .collect::<Result<HashMap<_, _>, _>>()
                .map(|file| Self { file })
                .map_err(|e| ConfigError::EnvFile(e.to_string())),
            Err(e) if e.not_found() => Ok(Self::default()),
            Err(e) => Err(ConfigError::EnvFile(e.to_string())),
        }
    }

    /// Number of variables read from the file.
    pub fn file_vars(&self) -> usize {
        self.file.len()
    }

    /// Returns the process value of `key`, falling back to the file.
    pub fn get(&self, key: &str) -> Option<String> {
        self.layered(key, std::env::var(key).ok())
    }

    fn layered(&self, key: &str, process: Option<String>) -> Option<String> {
        process.or_else(|| self.file.get(key).cloned())
    }
}

/// Database login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    /// SRV connection string for the fixed cluster.
    pub fn connection_string(&self) -> String {
        format!(
            "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=Cluster0",
            self.user, self.password, CLUSTER_HOST
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which backend stores the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    MongoDb(Credentials),
    Memory,
}

impl StoreSettings {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreSettings::MongoDb(_) => "mongodb",
            StoreSettings::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub store: StoreSettings,
}

impl ServerConfig {
    /// Reads the configuration from `environment`.
    pub fn from_environment(environment: &Environment) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| environment.get(key))
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "mongodb".to_string());

        let store = match backend.to_lowercase().as_str() {
            "mongodb" | "mongo" => StoreSettings::MongoDb(Credentials {
                user: lookup("DB_USER").ok_or(ConfigError::MissingVar("DB_USER"))?,
                password: lookup("DB_PASS").ok_or(ConfigError::MissingVar("DB_PASS"))?,
            }),
            "memory" => StoreSettings::Memory,
            _ => return Err(ConfigError::UnknownBackend(backend)),
        };

        Ok(Self { port, store })
    }
}

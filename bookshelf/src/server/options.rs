//! Server options.

use std::net::SocketAddr;

/// The options for the server.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// The address to listen on.
    ///
    /// If `BOOKSHELF_LISTEN_ADDR` is set in the environment, it will be read and used as the
    /// listen address when calling `ServerOptions::from_env`.
    pub listen_addr: SocketAddr,

    /// The sqlx URL of the SQLite database.
    ///
    /// Read from `BOOKSHELF_DATABASE_URL`.
    pub database_url: String,

    /// The maximum number of database connections.
    ///
    /// Read from `BOOKSHELF_MAX_CONNECTIONS`.
    pub max_connections: u32,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: Self::DEFAULT_DATABASE_URL.to_owned(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// An error that can occur when trying to get the server options from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ServerOptionsFromEnvError {
    /// An environment variable was not unicode.
    #[error("environment variable {name} was not unicode")]
    NotUnicode {
        /// The name of the environment variable.
        name: &'static str,
    },

    /// An error occurred while trying to get the listen address from the environment.
    #[error("failed to parse the listen address from environment variable {name} (was `{value}`): {err}")]
    ListenAddr {
        /// The name of the environment variable.
        name: &'static str,

        /// The value that was attempted to be parsed.
        value: String,

        /// The error that occurred.
        #[source]
        err: std::net::AddrParseError,
    },

    /// An error occurred while trying to get the connection count from the environment.
    #[error("failed to parse the connection count from environment variable {name} (was `{value}`): {err}")]
    MaxConnections {
        /// The name of the environment variable.
        name: &'static str,

        /// The value that was attempted to be parsed.
        value: String,

        /// The error that occurred.
        #[source]
        err: std::num::ParseIntError,
    },
}

impl ServerOptions {
    /// The environment variable name for the listen address.
    pub const BOOKSHELF_LISTEN_ADDR: &'static str = "BOOKSHELF_LISTEN_ADDR";

    /// The environment variable name for the database URL.
    pub const BOOKSHELF_DATABASE_URL: &'static str = "BOOKSHELF_DATABASE_URL";

    /// The environment variable name for the maximum number of database connections.
    pub const BOOKSHELF_MAX_CONNECTIONS: &'static str = "BOOKSHELF_MAX_CONNECTIONS";

    /// The database used when none is configured.
    pub const DEFAULT_DATABASE_URL: &'static str = "sqlite://bookshelf.db?mode=rwc";

    /// The connection count used when none is configured.
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    fn env_var(name: &'static str) -> Result<Option<String>, ServerOptionsFromEnvError> {
        match std::env::var(name) {
            Ok(value) => Ok(if value.is_empty() { None } else { Some(value) }),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(ServerOptionsFromEnvError::NotUnicode { name })
            }
        }
    }

    /// Get the server options from the environment.
    pub fn from_env() -> Result<Self, ServerOptionsFromEnvError> {
        Self::from_lookup(Self::env_var)
    }

    /// Get the server options from an arbitrary variable lookup.
    fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<Option<String>, ServerOptionsFromEnvError>,
    ) -> Result<Self, ServerOptionsFromEnvError> {
        tracing::info!("Reading server options from the environment...");

        let defaults = Self::default();

        let listen_addr = match lookup(Self::BOOKSHELF_LISTEN_ADDR)? {
            Some(value) => {
                value
                    .parse()
                    .map_err(|err| ServerOptionsFromEnvError::ListenAddr {
                        name: Self::BOOKSHELF_LISTEN_ADDR,
                        value: value.clone(),
                        err,
                    })?
            }
            None => defaults.listen_addr,
        };

        let database_url = match lookup(Self::BOOKSHELF_DATABASE_URL)? {
            Some(value) => {
                tracing::info!(
                    "{} was set: using `{value}` as the database.",
                    Self::BOOKSHELF_DATABASE_URL
                );

                value
            }
            None => {
                tracing::warn!(
                    "{} was not set: using `{}` as the database.",
                    Self::BOOKSHELF_DATABASE_URL,
                    defaults.database_url
                );

                defaults.database_url
            }
        };

        let max_connections = match lookup(Self::BOOKSHELF_MAX_CONNECTIONS)? {
            Some(value) => {
                value
                    .parse()
                    .map_err(|err| ServerOptionsFromEnvError::MaxConnections {
                        name: Self::BOOKSHELF_MAX_CONNECTIONS,
                        value: value.clone(),
                        err,
                    })?
            }
            None => defaults.max_connections,
        };

        tracing::info!("Listening address: `{listen_addr}`, database connections: {max_connections}.");

        Ok(Self {
            listen_addr,
            database_url,
            max_connections,
        })
    }
}

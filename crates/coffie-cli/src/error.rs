//! Error types for the `coffie` binary.
//!
//! [`CliError`] wraps every failure mode of startup and the subcommands
//! so `main` can propagate with `?`.

/// Top-level error for the `coffie` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: coffie_core::ConfigError,
    },

    /// The configured trial count was rejected by the lottery.
    #[error("lottery error: {source}")]
    Lottery {
        /// The underlying selection error.
        #[from]
        source: coffie_core::SelectionError,
    },

    /// Opening or migrating the database failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying data layer error.
        #[from]
        source: coffie_db::DbError,
    },

    /// Building the application state failed.
    #[error("application error: {source}")]
    App {
        /// The underlying API error.
        #[from]
        source: coffie_server::ApiError,
    },

    /// The HTTP server failed to start or crashed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: coffie_server::ServerError,
    },
}

//! Shared application state for the session API server.
//!
//! [`AppState`] is built once at startup and injected into every handler
//! through Axum's `State` extractor. It carries the database handle, the
//! configured lottery, and the compiled roster page. There are no global
//! singletons.

use std::sync::Arc;

use coffie_core::Lottery;
use coffie_db::SqliteDb;

use crate::error::ApiError;
use crate::view::RosterView;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool for the roster and event log.
    pub db: SqliteDb,
    /// Lottery used by `GET /choose/`.
    pub lottery: Lottery,
    /// External base URL for redirects, if the server sits behind a proxy.
    pub public_url: Option<String>,
    /// Compiled roster page.
    pub view: Arc<RosterView>,
}

impl AppState {
    /// Create the application state with the default lottery.
    pub fn new(db: SqliteDb) -> Result<Self, ApiError> {
        Ok(Self {
            db,
            lottery: Lottery::default(),
            public_url: None,
            view: Arc::new(RosterView::new()?),
        })
    }

    /// Replace the lottery (e.g. with a configured trial count).
    #[must_use]
    pub const fn with_lottery(mut self, lottery: Lottery) -> Self {
        self.lottery = lottery;
        self
    }

    /// Set the external base URL used for redirects.
    #[must_use]
    pub fn with_public_url(mut self, url: Option<String>) -> Self {
        self.public_url = url;
        self
    }

    /// Where to send the browser after adding an actor.
    pub fn index_url(&self) -> String {
        index_url(self.public_url.as_deref())
    }
}

/// Root path of the site, absolute when a public base URL is known.
fn index_url(public_url: Option<&str>) -> String {
    public_url.map_or_else(
        || "/".to_owned(),
        |base| format!("{}/", base.trim_end_matches('/')),
    )
}

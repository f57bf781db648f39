//! Session API server for Coffie.
//!
//! This crate provides an Axum HTTP server that exposes the roster and
//! the lottery:
//!
//! - **Roster page** (`GET /`) rendered from an embedded `minijinja`
//!   template
//! - **Session operations** (`POST /add/`, `POST /remove/`,
//!   `GET /choose/`) that toggle presence and run the lottery
//! - **JSON endpoints** (`/api/actors`, `/api/events`) for reporting
//!
//! # Architecture
//!
//! Handlers are thin: each one opens a [`RosterStore`] or [`EventStore`]
//! over the shared pool in [`AppState`], and `choose` hands the present
//! roster to the [`Lottery`] before recording the winner. The lottery
//! itself never touches the database.
//!
//! [`RosterStore`]: coffie_db::RosterStore
//! [`EventStore`]: coffie_db::EventStore
//! [`Lottery`]: coffie_core::Lottery

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod view;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;

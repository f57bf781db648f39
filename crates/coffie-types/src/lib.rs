//! Shared type definitions for the Coffie session lottery.
//!
//! This crate is the single source of truth for the data model shared by
//! the selection engine, the data layer, and the session API.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for the integer row identifiers
//! - [`structs`] -- The [`Actor`] roster entry and the selection [`Event`]

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{ActorId, EventId};
pub use structs::{Actor, Event};

//! Selection lottery, seed derivation, and configuration for Coffie.
//!
//! This crate holds the logic that does not touch storage or the network:
//! the Monte-Carlo draw that picks one present actor, the derivation of
//! its seed from a timestamp and a client string, and the typed
//! configuration shared by the server and CLI.
//!
//! # Modules
//!
//! - [`selection`] -- [`Lottery`] and [`select`], the repeated uniform draw
//!   and its ranked breakdown.
//! - [`seed`] -- [`derive_seed`] from a UTC timestamp and a client string.
//! - [`config`] -- Configuration loading from `coffie.yaml` into
//!   strongly-typed structs.
//!
//! [`Lottery`]: selection::Lottery
//! [`select`]: selection::select
//! [`derive_seed`]: seed::derive_seed

pub mod config;
pub mod seed;
pub mod selection;

pub use config::{CoffieConfig, ConfigError};
pub use seed::derive_seed;
pub use selection::{Lottery, Percent, Selection, SelectionError, Standing, DEFAULT_TRIALS};

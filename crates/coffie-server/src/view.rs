//! Roster page rendering via `minijinja`.
//!
//! The page template is compiled into the binary so the server has no
//! runtime file dependencies.

use std::collections::BTreeMap;

use coffie_types::{Actor, ActorId};
use minijinja::{context, Environment};

use crate::error::ApiError;

/// Name the roster template is registered under.
const INDEX_TEMPLATE: &str = "index.html";

/// One row of the roster table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RosterRow<'a> {
    /// Actor id, posted back by the add/remove buttons.
    pub id: i64,
    /// Display name.
    pub name: &'a str,
    /// Presence flag.
    pub in_session: bool,
    /// How many times this actor has been selected.
    pub picks: i64,
}

/// Holds the compiled roster page template.
pub struct RosterView {
    env: Environment<'static>,
}

impl RosterView {
    /// Compile the embedded roster template.
    pub fn new() -> Result<Self, ApiError> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    /// Render the roster page for `actors`, annotated with selection counts.
    pub fn render(
        &self,
        actors: &[Actor],
        picks: &BTreeMap<ActorId, i64>,
    ) -> Result<String, ApiError> {
        let rows: Vec<RosterRow<'_>> = actors
            .iter()
            .map(|a| RosterRow {
                id: a.id.into_inner(),
                name: &a.name,
                in_session: a.in_session,
                picks: picks.get(&a.id).copied().unwrap_or(0),
            })
            .collect();
        let present_count = actors.iter().filter(|a| a.in_session).count();

        let html = self
            .env
            .get_template(INDEX_TEMPLATE)?
            .render(context! { actors => rows, present_count => present_count })?;
        Ok(html)
    }
}

impl core::fmt::Debug for RosterView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RosterView").finish_non_exhaustive()
    }
}

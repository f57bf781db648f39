//! HTTP endpoint handlers for the session API.
//!
//! Handlers compose the roster store, the event log, and the lottery.
//! Each request works on its own snapshot of the roster; no state is
//! shared between requests beyond the connection pool.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Roster page |
//! | `POST` | `/add/` | Add an actor by `name`, or bring one back by `id` |
//! | `POST` | `/remove/` | Take an actor out of the session by `id` |
//! | `GET` | `/choose/` | Run the lottery and record the winner |
//! | `GET` | `/api/actors` | List the roster as JSON |
//! | `GET` | `/api/events` | Query selection events |

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Utc;
use coffie_core::derive_seed;
use coffie_db::{EventQuery, EventStore, RosterStore};
use coffie_types::ActorId;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Plain acknowledgement body for presence changes.
const ACK: &str = "200";

// ---------------------------------------------------------------------------
// Form and query structs
// ---------------------------------------------------------------------------

/// Form body for `POST /add/`.
///
/// Fields are read as raw text so a malformed id is reported by
/// [`parse_actor_id`] with the same 400 as a malformed body.
#[derive(Debug, Default, serde::Deserialize)]
pub struct AddForm {
    /// Existing actor to bring back into the session.
    pub id: Option<String>,
    /// Name of a new actor.
    pub name: Option<String>,
}

/// Form body for `POST /remove/`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct RemoveForm {
    /// Actor to take out of the session.
    pub id: Option<String>,
}

/// Query parameters for `GET /api/events`.
#[derive(Debug, serde::Deserialize)]
pub struct EventsQuery {
    /// Filter events by winning actor.
    pub actor_id: Option<String>,
    /// Maximum number of events to return (default 100, max 1000).
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// GET / -- roster page
// ---------------------------------------------------------------------------

/// Render the roster page listing every actor and their presence.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let actors = RosterStore::new(state.db.pool()).list_all().await?;
    let picks = EventStore::new(state.db.pool()).counts_by_actor().await?;
    Ok(Html(state.view.render(&actors, &picks)?))
}

// ---------------------------------------------------------------------------
// POST /add/ -- create or reactivate
// ---------------------------------------------------------------------------

/// Add a new actor or bring an existing one back into the session.
///
/// With an `id` field the actor is reactivated and the response is a
/// plain `200`. Otherwise `name` is required, a new actor is created, and
/// the browser is redirected to the roster page.
pub async fn add(
    State(state): State<Arc<AppState>>,
    form: Result<Form<AddForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) = form.map_err(bad_form)?;
    let roster = RosterStore::new(state.db.pool());

    if let Some(raw_id) = form.id.as_deref() {
        let id = parse_actor_id(raw_id)?;
        let actor = roster.set_presence(id, true).await?;
        info!(actor_id = %actor.id, name = actor.name, "Actor rejoined the session");
        return Ok((StatusCode::OK, ACK).into_response());
    }

    let name = form
        .name
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("form field `name` or `id` is required".to_owned()))?;
    let actor = roster.add(name).await?;
    info!(actor_id = %actor.id, name = actor.name, "Actor added to the roster");

    Ok(Redirect::to(&state.index_url()).into_response())
}

// ---------------------------------------------------------------------------
// POST /remove/ -- deactivate
// ---------------------------------------------------------------------------

/// Take an actor out of the session. Unknown ids are ignored.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    form: Result<Form<RemoveForm>, FormRejection>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let Form(form) = form.map_err(bad_form)?;
    let raw_id = form
        .id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("form field `id` is required".to_owned()))?;
    let id = parse_actor_id(raw_id)?;

    match RosterStore::new(state.db.pool()).set_presence(id, false).await {
        Ok(actor) => {
            info!(actor_id = %actor.id, name = actor.name, "Actor left the session");
        }
        Err(coffie_db::DbError::ActorNotFound(missing)) => {
            warn!(actor_id = %missing, "Remove requested for unknown actor; ignoring");
        }
        Err(e) => return Err(e.into()),
    }

    Ok((StatusCode::OK, ACK))
}

// ---------------------------------------------------------------------------
// GET /choose/ -- run the lottery
// ---------------------------------------------------------------------------

/// Draw a winner among present actors, record the event, and return the
/// plain-text breakdown.
///
/// The seed combines the current time with the `User-Agent` header (an
/// absent or non-UTF-8 header counts as empty).
pub async fn choose(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    let present = RosterStore::new(state.db.pool()).list_present().await?;

    let client = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let seed = derive_seed(Utc::now(), client);

    let selection = state.lottery.draw(&present, seed)?;
    let winning = selection
        .winning()
        .ok_or_else(|| ApiError::Internal("lottery produced no winner".to_owned()))?;

    let event = EventStore::new(state.db.pool())
        .record(winning.actor.id)
        .await?;

    info!(
        event_id = %event.id,
        winner = winning.actor.name,
        wins = winning.wins,
        present = present.len(),
        "Selection recorded"
    );

    Ok(selection.report())
}

// ---------------------------------------------------------------------------
// GET /api/actors -- roster as JSON
// ---------------------------------------------------------------------------

/// List every actor on the roster.
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let actors = RosterStore::new(state.db.pool()).list_all().await?;
    Ok(Json(serde_json::json!({
        "count": actors.len(),
        "actors": actors,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/events -- query events
// ---------------------------------------------------------------------------

/// Query selection events, newest first.
///
/// # Query Parameters
///
/// - `actor_id`: Only events won by this actor.
/// - `limit`: Maximum number of events to return (default 100, max 1000).
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let actor_id = params
        .actor_id
        .as_deref()
        .map(parse_actor_id)
        .transpose()?;

    let query = EventQuery {
        actor_id,
        limit: params.limit,
    };
    let events = EventStore::new(state.db.pool()).list(&query).await?;

    Ok(Json(serde_json::json!({
        "count": events.len(),
        "events": events,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Turn an extractor rejection (wrong content type, undecodable body)
/// into a JSON 400.
fn bad_form(rejection: FormRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Parse an actor id from form or query text.
fn parse_actor_id(s: &str) -> Result<ActorId, ApiError> {
    s.parse::<ActorId>()
        .map_err(|e| ApiError::BadRequest(format!("invalid actor id {s:?}: {e}")))
}

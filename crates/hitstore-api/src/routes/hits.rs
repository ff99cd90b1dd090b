//! Routes for recording, listing, purging, and aggregating hit events.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use hitstore_core::error::DomainError;
use hitstore_core::hit::{DailyHits, HitEvent, HitEventDraft};
use hitstore_history::application::{command_handlers, query_handlers};
use hitstore_history::domain::commands::{PurgeHitsBefore, RecordHit};
use hitstore_history::domain::window::TrailingWindow;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Lookback used when `days` is omitted.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Response body for GET /count.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Number of stored hit events.
    pub count: u64,
}

/// Query string for DELETE /.
#[derive(Debug, Deserialize)]
pub struct PurgeParams {
    /// Events strictly before this RFC 3339 instant are deleted.
    pub before: DateTime<Utc>,
}

/// Query string for GET /rules/{rule_name}/daily.
#[derive(Debug, Deserialize)]
pub struct DailyParams {
    /// Calendar days to look back.
    pub days: Option<u32>,
}

fn query_error(field: &'static str, rejection: &QueryRejection) -> ApiError {
    DomainError::violation(field, rejection.body_text()).into()
}

/// GET /count
async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>, ApiError> {
    let count = query_handlers::count_hits(&*state.store).await?;
    Ok(Json(CountResponse { count }))
}

/// POST /
#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    body: Result<Json<HitEventDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<HitEvent>), ApiError> {
    let Json(draft) =
        body.map_err(|rejection| DomainError::TypeMismatch(rejection.body_text()))?;

    let command = RecordHit {
        correlation_id: Uuid::new_v4(),
        draft,
    };

    info!(correlation_id = %command.correlation_id, "handling record_hit command");

    let event =
        command_handlers::handle_record_hit(&command, &*state.validator, &*state.store).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /
async fn list(State(state): State<AppState>) -> Result<Json<Vec<HitEvent>>, ApiError> {
    let events = query_handlers::list_hits(&*state.store).await?;
    Ok(Json(events))
}

/// DELETE /?before=...
#[instrument(skip_all)]
async fn purge(
    State(state): State<AppState>,
    params: Result<Query<PurgeParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(params) = params.map_err(|rejection| query_error("before", &rejection))?;

    let command = PurgeHitsBefore {
        correlation_id: Uuid::new_v4(),
        cutoff: params.before,
    };

    info!(correlation_id = %command.correlation_id, "handling purge_hits_before command");

    command_handlers::handle_purge_before(&command, &*state.store).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /rules/{rule_name}/daily?days=N
async fn daily(
    State(state): State<AppState>,
    Path(rule_name): Path<String>,
    params: Result<Query<DailyParams>, QueryRejection>,
) -> Result<Json<Vec<DailyHits>>, ApiError> {
    let Query(params) = params.map_err(|rejection| query_error("days", &rejection))?;
    let window = TrailingWindow::new(params.days.unwrap_or(DEFAULT_WINDOW_DAYS));

    let totals = query_handlers::daily_hits_for_rule(
        &rule_name,
        window,
        state.clock.as_ref(),
        &*state.store,
    )
    .await?;

    Ok(Json(totals))
}

/// Returns the router for hit events.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create).delete(purge))
        .route("/count", get(count))
        .route("/rules/{rule_name}/daily", get(daily))
}

//! Tracking table inspection.

use axum::Json;
use axum::extract::State;

use autolights_domain::tracking::TrackedEntity;

use crate::state::AppState;

/// `GET /api/tracked`
///
/// Rows are sorted by entity id; the snapshot is the one published after the
/// most recently handled event.
pub async fn list<H>(State(state): State<AppState<H>>) -> Json<Vec<TrackedEntity>>
where
    H: Send + Sync + 'static,
{
    Json(state.tracked.borrow().clone())
}

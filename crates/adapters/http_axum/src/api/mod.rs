//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod tracked;

use axum::Router;
use axum::routing::{get, put};

use autolights_app::ports::{StateReader, StateWriter};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H>() -> Router<AppState<H>>
where
    H: StateReader + StateWriter + Send + Sync + 'static,
{
    Router::new()
        .route("/tracked", get(tracked::list::<H>))
        .route("/entities/{id}", get(entities::get::<H>))
        .route("/entities/{id}/state", put(entities::update_state::<H>))
}

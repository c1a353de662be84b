//! JSON REST handlers for host entities.

use std::collections::HashMap;
use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use autolights_app::ports::{StateReader, StateWriter};
use autolights_domain::entity::{AttributeValue, Entity, EntityState};
use autolights_domain::error::{AutolightsError, NotFoundError};
use autolights_domain::id::EntityId;
use autolights_domain::time::now;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for reporting an external state change.
#[derive(Deserialize)]
pub struct UpdateStateRequest {
    pub state: EntityState,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Entity>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<EntityId, AutolightsError> {
    Ok(EntityId::from_str(raw)?)
}

/// `GET /api/entities/{id}`
pub async fn get<H>(
    State(state): State<AppState<H>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    H: StateReader + StateWriter + Send + Sync + 'static,
{
    let entity_id = parse_id(&id)?;
    let entity = state
        .host
        .get_entity(&entity_id)
        .await?
        .ok_or_else(|| NotFoundError {
            entity: "entity",
            id: entity_id.to_string(),
        })?;
    Ok(GetResponse::Ok(Json(entity)))
}

/// `PUT /api/entities/{id}/state`
///
/// Replaces the entity's state and attributes as if an outside actor had
/// changed it.
pub async fn update_state<H>(
    State(state): State<AppState<H>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStateRequest>,
) -> Result<GetResponse, ApiError>
where
    H: StateReader + StateWriter + Send + Sync + 'static,
{
    let entity = Entity {
        entity_id: parse_id(&id)?,
        state: req.state,
        attributes: req.attributes,
        last_changed: now(),
    };
    tracing::info!(entity_id = %entity.entity_id, state = %entity.state, "external state change reported");
    let updated = state.host.set_entity(entity).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

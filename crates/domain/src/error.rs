//! Common error types used across the workspace.
//!
//! Domain errors convert into [`AutolightsError`] via `#[from]`; adapter
//! failures are boxed into [`AutolightsError::Host`].

/// Top-level error for every fallible operation in autolights.
#[derive(Debug, thiserror::Error)]
pub enum AutolightsError {
    /// A domain invariant was violated.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist on the host.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The host collaborator failed to answer a query or accept a command.
    #[error("host error: {0}")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building domain values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// An entity id was empty.
    #[error("entity id must not be empty")]
    EmptyEntityId,

    /// An entity id did not follow the `domain.object_id` form.
    #[error("entity id `{0}` must have the form `domain.object_id`")]
    MalformedEntityId(String),

    /// A normalized level was outside `[0, 1]`.
    #[error("`{field}` must be within [0, 1], got {value}")]
    LevelOutOfRange { field: &'static str, value: f64 },
}

/// A lookup for a specific entity failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

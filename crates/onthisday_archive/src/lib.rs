//! Archive of "on this day" sports history: calendar normalization, slugs,
//! the domain model and the `ArchiveStore` persistence seam.

use thiserror::Error;

pub mod calendar;
pub mod config;
pub mod model;
pub mod observability;
pub mod seed;
pub mod slug;
pub mod store;

pub use calendar::{
    CalendarDay, CalendarSystem, DateQuery, DisplayProjection, NormalizedDate, ValidationError,
    normalize, to_display_projection,
};
pub use slug::{SlugError, build_slug};
pub use store::{ArchiveStore, InMemoryStore};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ArchiveError {
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        ArchiveError::NotFound(format!("{kind} with id '{id}' not found."))
    }

    pub fn duplicate_slug(kind: &str, slug: &str) -> Self {
        ArchiveError::Conflict(format!("{kind} slug '{slug}' already exists."))
    }
}

impl From<ValidationError> for ArchiveError {
    fn from(err: ValidationError) -> Self {
        ArchiveError::Validation(err.to_string())
    }
}

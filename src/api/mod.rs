// API routes and handlers

pub mod auth;
pub mod exercise;
pub mod health;
pub mod routes;
pub mod workout;

use uuid::Uuid;

use crate::errors::ApiError;

/// Path ids that are not valid UUIDs cannot name an existing record
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}

use axum::{extract::State, response::Json, routing::post, Router};
use axum_extra::extract::WithRejection;

use super::routes::AppState;
use crate::auth::{AuthResponse, AuthService, LoginRequest, SignupRequest};
use crate::errors::ApiError;

/// Authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Register a new user
#[tracing::instrument(skip_all)]
async fn signup(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = auth_service.signup(request).await?;
    Ok(Json(response))
}

/// Login user
#[tracing::instrument(skip_all)]
async fn login(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

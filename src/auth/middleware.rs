use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

use crate::auth::{extract_bearer_token, AuthService, INVALID_AUTH_HEADER_MESSAGE};
use crate::errors::ApiError;

/// JWT authentication middleware. On success the resolved `AuthUser` is
/// available to handlers as `Extension<AuthUser>`.
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!(uri = %request.uri(), "Missing Authorization header");
            ApiError::unauthorized(INVALID_AUTH_HEADER_MESSAGE)
        })?;

    let token = extract_bearer_token(auth_header)?.to_string();

    let user = match auth_service.authorize(&token).await {
        Ok(user) => user,
        Err(err) => {
            warn!(uri = %request.uri(), "Authentication failed: {}", err);
            return Err(err);
        }
    };

    debug!(user_id = %user.user_id, "Request authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// CORS configuration
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{AuthResponse, AuthUser, CredentialStore, JwtService, LoginRequest, SignupRequest};
use crate::errors::ApiError;
use crate::models::{CreateUser, User};
use crate::repository::{UserRepository, USER_EXISTS_MESSAGE};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    credentials: CredentialStore,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwt_service", &self.jwt_service)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        jwt_service: JwtService,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            jwt_service,
            credentials,
            users,
        }
    }

    /// Register a new user and issue a session token
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, ApiError> {
        let (email, name, password) = match (
            non_empty(request.email),
            non_empty(request.name),
            request.password.filter(|p| !p.is_empty()),
        ) {
            (Some(email), Some(name), Some(password)) => (email, name, password),
            _ => return Err(ApiError::validation("Email, name and password are required")),
        };

        // Check if user already exists
        if self.users.find_by_email(&email).await?.is_some() {
            warn!("Signup rejected for already registered email");
            return Err(ApiError::Conflict(USER_EXISTS_MESSAGE.to_string()));
        }

        let password_hash = self.credentials.hash(&password)?;
        let user = User::new(CreateUser {
            email,
            name,
            password_hash,
        });

        // the unique index still guards against a concurrent signup
        self.users.create(&user).await?;

        let token = self.jwt_service.issue_token(user.id, &user.email)?;
        info!(user_id = %user.id, "User signed up");

        Ok(AuthResponse {
            message: "User created successfully".to_string(),
            token,
        })
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let (email, password) = match (non_empty(request.email), request.password) {
            (Some(email), Some(password)) => (email, password),
            _ => return Err(ApiError::validation("Email and password are required")),
        };

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        if !self.credentials.verify(&password, &user.password_hash) {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        let token = self.jwt_service.issue_token(user.id, &user.email)?;
        info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token,
        })
    }

    /// Validate a token and resolve it to an existing user
    pub async fn authorize(&self, token: &str) -> Result<AuthUser, ApiError> {
        let claims = self.jwt_service.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.id)
            .map_err(|_| ApiError::unauthorized(crate::auth::INVALID_TOKEN_MESSAGE))?;

        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "Token identity does not resolve to a user");
            ApiError::unauthorized("User not found")
        })?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

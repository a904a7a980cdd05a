use axum::{extract::FromRef, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::exercise::exercise_routes;
use super::health::health_check;
use super::workout::workout_routes;
use crate::auth::{cors_layer, AuthService, CredentialStore, JwtService};
use crate::repository::Repositories;
use crate::services::{CommentService, ExerciseService, WorkoutService};

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub exercise_service: ExerciseService,
    pub workout_service: WorkoutService,
    pub comment_service: CommentService,
}

impl AppState {
    pub fn new(repositories: Repositories, jwt_service: JwtService, credentials: CredentialStore) -> Self {
        Self {
            auth_service: AuthService::new(repositories.users.clone(), jwt_service, credentials),
            exercise_service: ExerciseService::new(repositories.exercises.clone()),
            workout_service: WorkoutService::new(
                repositories.workouts.clone(),
                repositories.exercises.clone(),
            ),
            comment_service: CommentService::new(repositories.comments),
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

pub fn create_routes(state: AppState) -> Router {
    let auth_service = state.auth_service.clone();

    Router::new()
        .route("/health", get(health_check))
        .nest("/users", auth_routes())
        .nest("/exercise", exercise_routes(auth_service.clone()))
        .nest("/workout", workout_routes(auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use super::parse_id;
use super::routes::AppState;
use crate::auth::{jwt_auth_middleware, AuthService, AuthUser};
use crate::errors::ApiError;
use crate::models::{CreateExerciseRequest, Exercise, ExercisePatch};
use crate::services::exercise_service::EXERCISE_NOT_FOUND;

/// Exercise routes, all behind the authorization gate
pub fn exercise_routes(auth_service: AuthService) -> Router<AppState> {
    Router::new()
        .route("/create", post(create_exercise))
        .route("/update/:id", put(update_exercise))
        .route("/list", get(list_exercises))
        .route("/delete/:id", delete(delete_exercise))
        .route("/:id", get(get_exercise))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
async fn create_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateExerciseRequest>, ApiError>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let exercise = state
        .exercise_service
        .create_exercise(user.user_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Exercise created successfully",
            "exercise_id": exercise.id,
        })),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, exercise_id = %id))]
async fn get_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise_id = parse_id(&id, EXERCISE_NOT_FOUND)?;
    let exercise = state.exercise_service.get_exercise(user.user_id, exercise_id).await?;
    Ok(Json(exercise))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, exercise_id = %id))]
async fn update_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<ExercisePatch>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let exercise_id = parse_id(&id, EXERCISE_NOT_FOUND)?;
    let exercise = state
        .exercise_service
        .update_exercise(user.user_id, exercise_id, patch)
        .await?;

    Ok(Json(json!({
        "message": "Exercise updated successfully",
        "exercise": exercise,
    })))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
async fn list_exercises(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let exercises = state.exercise_service.list_exercises(user.user_id).await?;
    Ok(Json(json!({ "exercises": exercises })))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, exercise_id = %id))]
async fn delete_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let exercise_id = parse_id(&id, EXERCISE_NOT_FOUND)?;
    state
        .exercise_service
        .delete_exercise(user.user_id, exercise_id)
        .await?;

    Ok(Json(json!({ "message": "Exercise deleted successfully" })))
}

use axum::{
    extract::{Path, Query, State},
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
use crate::models::{CreateCommentRequest, CreateWorkoutRequest, ReportQuery, UpdateWorkoutRequest, Workout, WorkoutReport};
use crate::services::workout_service::WORKOUT_NOT_FOUND;

/// Workout, comment and report routes, all behind the authorization gate
pub fn workout_routes(auth_service: AuthService) -> Router<AppState> {
    Router::new()
        .route("/create", post(create_workout))
        .route("/update/:id", put(update_workout))
        .route("/update_status/:id", put(update_status))
        .route("/list", get(list_workouts))
        .route("/delete/:id", delete(delete_workout))
        .route("/comment/:id", post(add_comment))
        .route("/comments/:id", get(list_comments))
        .route("/report", get(report))
        .route("/:id", get(get_workout))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
async fn create_workout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateWorkoutRequest>, ApiError>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let workout = state.workout_service.create_workout(user.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Workout created successfully",
            "workout_id": workout.id,
        })),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, workout_id = %id))]
async fn get_workout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Workout>, ApiError> {
    let workout_id = parse_id(&id, WORKOUT_NOT_FOUND)?;
    let workout = state.workout_service.get_workout(user.user_id, workout_id).await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, workout_id = %id))]
async fn update_workout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateWorkoutRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let workout_id = parse_id(&id, WORKOUT_NOT_FOUND)?;
    let workout = state
        .workout_service
        .update_workout(user.user_id, workout_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Workout updated successfully",
        "workout": workout,
    })))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, workout_id = %id))]
async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let workout_id = parse_id(&id, WORKOUT_NOT_FOUND)?;
    let status = state.workout_service.toggle_status(user.user_id, workout_id).await?;

    Ok(Json(json!({
        "message": "Workout status updated successfully",
        "status": status,
    })))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
async fn list_workouts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let workouts = state.workout_service.list_workouts(user.user_id).await?;
    Ok(Json(json!({ "workouts": workouts })))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, workout_id = %id))]
async fn delete_workout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let workout_id = parse_id(&id, WORKOUT_NOT_FOUND)?;
    state.workout_service.delete_workout(user.user_id, workout_id).await?;

    Ok(Json(json!({ "message": "Workout deleted successfully" })))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, workout_id = %id))]
async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<CreateCommentRequest>, ApiError>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let workout_id = parse_id(&id, WORKOUT_NOT_FOUND)?;
    let comment = state
        .comment_service
        .add_comment(user.user_id, workout_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment added successfully",
            "comment_id": comment.id,
        })),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, workout_id = %id))]
async fn list_comments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let workout_id = parse_id(&id, WORKOUT_NOT_FOUND)?;
    let comments = state.comment_service.list_comments(user.user_id, workout_id).await?;
    Ok(Json(json!({ "comments": comments })))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
async fn report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<ReportQuery>, ApiError>,
) -> Result<Json<WorkoutReport>, ApiError> {
    let report = state.workout_service.report(user.user_id, query).await?;
    Ok(Json(report))
}

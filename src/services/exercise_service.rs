use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{CreateExercise, CreateExerciseRequest, Exercise, ExercisePatch};
use crate::repository::ExerciseRepository;

pub const EXERCISE_NOT_FOUND: &str = "Exercise not found";

#[derive(Clone)]
pub struct ExerciseService {
    exercises: Arc<dyn ExerciseRepository + Send + Sync>,
}

impl ExerciseService {
    pub fn new(exercises: Arc<dyn ExerciseRepository + Send + Sync>) -> Self {
        Self { exercises }
    }

    pub async fn create_exercise(
        &self,
        user_id: Uuid,
        request: CreateExerciseRequest,
    ) -> Result<Exercise, ApiError> {
        let name = request.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let (name, duration) = match (name, request.duration) {
            (Some(name), Some(duration)) => (name, duration),
            _ => return Err(ApiError::validation("Name and duration are required")),
        };
        validate_duration(duration)?;

        let exercise = Exercise::new(CreateExercise {
            user_id,
            name,
            duration,
            description: request.description,
        });
        self.exercises.create(&exercise).await?;

        info!(user_id = %user_id, exercise_id = %exercise.id, "Exercise created");
        Ok(exercise)
    }

    pub async fn get_exercise(&self, user_id: Uuid, exercise_id: Uuid) -> Result<Exercise, ApiError> {
        self.exercises
            .find_by_id_and_owner(exercise_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(EXERCISE_NOT_FOUND))
    }

    pub async fn update_exercise(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        mut patch: ExercisePatch,
    ) -> Result<Exercise, ApiError> {
        patch.name = patch.name.map(|n| n.trim().to_string());
        if patch.name.as_deref().is_some_and(str::is_empty) {
            return Err(ApiError::validation("Name must not be empty"));
        }
        if let Some(duration) = patch.duration {
            validate_duration(duration)?;
        }

        let exercise = self
            .exercises
            .update_fields(exercise_id, user_id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found(EXERCISE_NOT_FOUND))?;

        info!(user_id = %user_id, exercise_id = %exercise_id, "Exercise updated");
        Ok(exercise)
    }

    pub async fn delete_exercise(&self, user_id: Uuid, exercise_id: Uuid) -> Result<(), ApiError> {
        if !self.exercises.delete_by_id(exercise_id, user_id).await? {
            return Err(ApiError::not_found(EXERCISE_NOT_FOUND));
        }

        info!(user_id = %user_id, exercise_id = %exercise_id, "Exercise deleted");
        Ok(())
    }

    pub async fn list_exercises(&self, user_id: Uuid) -> Result<Vec<Exercise>, ApiError> {
        self.exercises.list_by_owner(user_id).await
    }
}

fn validate_duration(duration: i32) -> Result<(), ApiError> {
    if duration <= 0 {
        return Err(ApiError::validation("Duration must be a positive number"));
    }
    Ok(())
}

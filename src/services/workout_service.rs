use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{
    parse_start_date_time, CreateWorkout, CreateWorkoutRequest, DateRange, ReportQuery,
    UpdateWorkoutRequest, Workout, WorkoutPatch, WorkoutReport, WorkoutStatus,
};
use crate::repository::{ExerciseRepository, WorkoutRepository};

pub const WORKOUT_NOT_FOUND: &str = "Workout not found";

#[derive(Clone)]
pub struct WorkoutService {
    workouts: Arc<dyn WorkoutRepository + Send + Sync>,
    exercises: Arc<dyn ExerciseRepository + Send + Sync>,
}

impl WorkoutService {
    pub fn new(
        workouts: Arc<dyn WorkoutRepository + Send + Sync>,
        exercises: Arc<dyn ExerciseRepository + Send + Sync>,
    ) -> Self {
        Self { workouts, exercises }
    }

    pub async fn create_workout(
        &self,
        user_id: Uuid,
        request: CreateWorkoutRequest,
    ) -> Result<Workout, ApiError> {
        let name = request.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let (name, start) = match (name, request.start_date_time) {
            (Some(name), Some(start)) => (name, start),
            _ => return Err(ApiError::validation("Name and start_date_time are required")),
        };
        let start_date_time = parse_start_date_time(&start)?;

        let exercises = request.exercises.unwrap_or_default();
        self.ensure_exercises_owned(user_id, &exercises).await?;

        let workout = Workout::new(CreateWorkout {
            user_id,
            name,
            start_date_time,
            exercises,
        });
        self.workouts.create(&workout).await?;

        info!(user_id = %user_id, workout_id = %workout.id, "Workout created");
        Ok(workout)
    }

    pub async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<Workout, ApiError> {
        self.workouts
            .find_by_id_and_owner(workout_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(WORKOUT_NOT_FOUND))
    }

    pub async fn update_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        request: UpdateWorkoutRequest,
    ) -> Result<Workout, ApiError> {
        let name = request.name.map(|n| n.trim().to_string());
        if name.as_deref().is_some_and(str::is_empty) {
            return Err(ApiError::validation("Name must not be empty"));
        }

        let patch = WorkoutPatch {
            name,
            start_date_time: request
                .start_date_time
                .as_deref()
                .map(parse_start_date_time)
                .transpose()?,
            exercises: request.exercises,
        };

        if let Some(exercises) = &patch.exercises {
            self.ensure_exercises_owned(user_id, exercises).await?;
        }

        let workout = self
            .workouts
            .update_fields(workout_id, user_id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found(WORKOUT_NOT_FOUND))?;

        info!(user_id = %user_id, workout_id = %workout_id, "Workout updated");
        Ok(workout)
    }

    /// Flip pending <-> done and return the new status
    pub async fn toggle_status(&self, user_id: Uuid, workout_id: Uuid) -> Result<WorkoutStatus, ApiError> {
        let updated = self
            .workouts
            .toggle_status(workout_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(WORKOUT_NOT_FOUND))?;

        info!(
            user_id = %user_id,
            workout_id = %workout_id,
            status = %updated.status,
            "Workout status toggled"
        );
        Ok(updated.status)
    }

    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<(), ApiError> {
        if !self.workouts.delete_by_id(workout_id, user_id).await? {
            return Err(ApiError::not_found(WORKOUT_NOT_FOUND));
        }

        info!(user_id = %user_id, workout_id = %workout_id, "Workout deleted");
        Ok(())
    }

    /// The caller's workouts, earliest start first
    pub async fn list_workouts(&self, user_id: Uuid) -> Result<Vec<Workout>, ApiError> {
        self.workouts.list_by_owner(user_id).await
    }

    pub async fn report(&self, user_id: Uuid, query: ReportQuery) -> Result<WorkoutReport, ApiError> {
        let range = DateRange::parse(&query)?;
        let (from, to) = range.bounds();

        let (total, done) = self.workouts.count_in_range(user_id, from, to).await?;
        Ok(WorkoutReport::from_counts(total, done))
    }

    async fn ensure_exercises_owned(&self, user_id: Uuid, exercises: &[Uuid]) -> Result<(), ApiError> {
        for exercise_id in exercises {
            if self
                .exercises
                .find_by_id_and_owner(*exercise_id, user_id)
                .await?
                .is_none()
            {
                return Err(ApiError::validation(format!(
                    "Invalid exercise reference: {exercise_id}"
                )));
            }
        }
        Ok(())
    }
}

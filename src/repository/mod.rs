//! Owner-scoped persistence for users, exercises, workouts and comments.
//!
//! Every read or write on an owned record filters by both the record id and
//! the owner id, so a caller holding another user's id sees nothing.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{Comment, Exercise, ExercisePatch, User, Workout, WorkoutPatch};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

pub const USER_EXISTS_MESSAGE: &str = "User already exists";

#[async_trait]
pub trait UserRepository {
    /// Fails with `ApiError::Conflict` when the email is already registered
    async fn create(&self, user: &User) -> Result<(), ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError>;
}

#[async_trait]
pub trait ExerciseRepository {
    async fn create(&self, exercise: &Exercise) -> Result<(), ApiError>;
    async fn find_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Exercise>, ApiError>;
    async fn update_fields(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &ExercisePatch,
    ) -> Result<Option<Exercise>, ApiError>;
    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, ApiError>;
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Exercise>, ApiError>;
}

#[async_trait]
pub trait WorkoutRepository {
    async fn create(&self, workout: &Workout) -> Result<(), ApiError>;
    async fn find_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Workout>, ApiError>;
    async fn update_fields(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &WorkoutPatch,
    ) -> Result<Option<Workout>, ApiError>;
    /// Flips pending <-> done in a single atomic write
    async fn toggle_status(&self, id: Uuid, owner: Uuid) -> Result<Option<Workout>, ApiError>;
    /// Deletes the workout together with its comments
    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, ApiError>;
    /// Ordered by start_date_time ascending
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Workout>, ApiError>;
    /// Returns (total, done) for workouts starting in `[from, to)`
    async fn count_in_range(
        &self,
        owner: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<(i64, i64), ApiError>;
}

#[async_trait]
pub trait CommentRepository {
    /// Inserts the comment and appends its id to the owner's workout as one
    /// atomic unit. Returns `None` when the workout is not the owner's.
    async fn add_to_workout(&self, owner: Uuid, comment: &Comment) -> Result<Option<Comment>, ApiError>;
    /// Comments in posting order, `None` when the workout is not the owner's
    async fn list_by_workout(&self, owner: Uuid, workout_id: Uuid) -> Result<Option<Vec<Comment>>, ApiError>;
}

/// Shared handles to every repository, cloned into each service
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository + Send + Sync>,
    pub exercises: Arc<dyn ExerciseRepository + Send + Sync>,
    pub workouts: Arc<dyn WorkoutRepository + Send + Sync>,
    pub comments: Arc<dyn CommentRepository + Send + Sync>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(PostgresStore::new(pool));
        Self {
            users: store.clone(),
            exercises: store.clone(),
            workouts: store.clone(),
            comments: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            exercises: store.clone(),
            workouts: store.clone(),
            comments: store,
        }
    }
}

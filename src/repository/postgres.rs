use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{CommentRepository, ExerciseRepository, UserRepository, WorkoutRepository, USER_EXISTS_MESSAGE};
use crate::errors::ApiError;
use crate::models::{Comment, Exercise, ExercisePatch, User, Workout, WorkoutPatch};

const EXERCISE_COLUMNS: &str = "id, user_id, name, duration, description, created_at, updated_at";
const WORKOUT_COLUMNS: &str =
    "id, user_id, name, status, start_date_time, exercises, comments, created_at, updated_at";

/// PostgreSQL implementation of every repository
#[derive(Debug, Clone)]
pub struct PostgresStore {
    db: PgPool,
}

impl PostgresStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                debug!("Duplicate email rejected by unique index");
                ApiError::Conflict(USER_EXISTS_MESSAGE.to_string())
            }
            other => ApiError::Database(other),
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ExerciseRepository for PostgresStore {
    async fn create(&self, exercise: &Exercise) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO exercises (id, user_id, name, duration, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(exercise.id)
        .bind(exercise.user_id)
        .bind(&exercise.name)
        .bind(exercise.duration)
        .bind(&exercise.description)
        .bind(exercise.created_at)
        .bind(exercise.updated_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Exercise>, ApiError> {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(exercise)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &ExercisePatch,
    ) -> Result<Option<Exercise>, ApiError> {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            "UPDATE exercises
             SET name = COALESCE($3, name),
                 duration = COALESCE($4, duration),
                 description = COALESCE($5, description),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&patch.name)
        .bind(patch.duration)
        .bind(&patch.description)
        .fetch_optional(&self.db)
        .await?;

        Ok(exercise)
    }

    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Exercise>, ApiError> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }
}

#[async_trait]
impl WorkoutRepository for PostgresStore {
    async fn create(&self, workout: &Workout) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO workouts (id, user_id, name, status, start_date_time, exercises, comments, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(workout.id)
        .bind(workout.user_id)
        .bind(&workout.name)
        .bind(workout.status)
        .bind(workout.start_date_time)
        .bind(&workout.exercises)
        .bind(&workout.comments)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Workout>, ApiError> {
        let workout = sqlx::query_as::<_, Workout>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(workout)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &WorkoutPatch,
    ) -> Result<Option<Workout>, ApiError> {
        let workout = sqlx::query_as::<_, Workout>(&format!(
            "UPDATE workouts
             SET name = COALESCE($3, name),
                 start_date_time = COALESCE($4, start_date_time),
                 exercises = COALESCE($5, exercises),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {WORKOUT_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&patch.name)
        .bind(patch.start_date_time)
        .bind(&patch.exercises)
        .fetch_optional(&self.db)
        .await?;

        Ok(workout)
    }

    async fn toggle_status(&self, id: Uuid, owner: Uuid) -> Result<Option<Workout>, ApiError> {
        let workout = sqlx::query_as::<_, Workout>(&format!(
            "UPDATE workouts
             SET status = CASE status
                     WHEN 'pending' THEN 'done'::workout_status
                     ELSE 'pending'::workout_status
                 END,
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {WORKOUT_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(workout)
    }

    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, ApiError> {
        // comments go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Workout>, ApiError> {
        let workouts = sqlx::query_as::<_, Workout>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1
             ORDER BY start_date_time ASC, created_at ASC"
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        Ok(workouts)
    }

    async fn count_in_range(
        &self,
        owner: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<(i64, i64), ApiError> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'done')
             FROM workouts
             WHERE user_id = $1 AND start_date_time >= $2 AND start_date_time < $3",
        )
        .bind(owner)
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await?;

        Ok(counts)
    }
}

#[async_trait]
impl CommentRepository for PostgresStore {
    #[instrument(skip(self, comment), fields(workout_id = %comment.workout_id))]
    async fn add_to_workout(&self, owner: Uuid, comment: &Comment) -> Result<Option<Comment>, ApiError> {
        let mut tx = self.db.begin().await?;

        let appended = sqlx::query(
            "UPDATE workouts SET comments = array_append(comments, $1), updated_at = NOW()
             WHERE id = $2 AND user_id = $3",
        )
        .bind(comment.id)
        .bind(comment.workout_id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        if appended.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO comments (id, workout_id, user_id, text, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id)
        .bind(comment.workout_id)
        .bind(comment.user_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(comment.clone()))
    }

    async fn list_by_workout(&self, owner: Uuid, workout_id: Uuid) -> Result<Option<Vec<Comment>>, ApiError> {
        let owned = sqlx::query("SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(owner)
            .fetch_optional(&self.db)
            .await?;

        if owned.is_none() {
            return Ok(None);
        }

        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, workout_id, user_id, text, created_at FROM comments
             WHERE workout_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(workout_id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(comments))
    }
}

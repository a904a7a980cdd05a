use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{CommentRepository, ExerciseRepository, UserRepository, WorkoutRepository, USER_EXISTS_MESSAGE};
use crate::errors::ApiError;
use crate::models::{Comment, Exercise, ExercisePatch, User, Workout, WorkoutPatch, WorkoutStatus};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    exercises: HashMap<Uuid, Exercise>,
    workouts: HashMap<Uuid, Workout>,
    comments: HashMap<Uuid, Comment>,
}

/// In-memory implementation of every repository for development and testing.
/// A single lock covers all collections, so multi-record writes are atomic.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, ApiError> {
        self.collections
            .lock()
            .map_err(|_| ApiError::Internal(anyhow::anyhow!("in-memory store lock poisoned")))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut store = self.lock()?;
        if store.users.values().any(|u| u.email == user.email) {
            debug!("Duplicate email in memory");
            return Err(ApiError::Conflict(USER_EXISTS_MESSAGE.to_string()));
        }
        store.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let store = self.lock()?;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        let store = self.lock()?;
        Ok(store.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl ExerciseRepository for InMemoryStore {
    async fn create(&self, exercise: &Exercise) -> Result<(), ApiError> {
        let mut store = self.lock()?;
        store.exercises.insert(exercise.id, exercise.clone());
        Ok(())
    }

    async fn find_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Exercise>, ApiError> {
        let store = self.lock()?;
        Ok(store
            .exercises
            .get(&id)
            .filter(|e| e.user_id == owner)
            .cloned())
    }

    async fn update_fields(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &ExercisePatch,
    ) -> Result<Option<Exercise>, ApiError> {
        let mut store = self.lock()?;
        Ok(store
            .exercises
            .get_mut(&id)
            .filter(|e| e.user_id == owner)
            .map(|exercise| {
                exercise.apply(patch);
                exercise.clone()
            }))
    }

    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, ApiError> {
        let mut store = self.lock()?;
        let owned = store.exercises.get(&id).is_some_and(|e| e.user_id == owner);
        if owned {
            store.exercises.remove(&id);
        }
        Ok(owned)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Exercise>, ApiError> {
        let store = self.lock()?;
        let mut exercises: Vec<Exercise> = store
            .exercises
            .values()
            .filter(|e| e.user_id == owner)
            .cloned()
            .collect();
        exercises.sort_by_key(|e| e.created_at);
        Ok(exercises)
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryStore {
    async fn create(&self, workout: &Workout) -> Result<(), ApiError> {
        let mut store = self.lock()?;
        store.workouts.insert(workout.id, workout.clone());
        Ok(())
    }

    async fn find_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Workout>, ApiError> {
        let store = self.lock()?;
        Ok(store
            .workouts
            .get(&id)
            .filter(|w| w.user_id == owner)
            .cloned())
    }

    async fn update_fields(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &WorkoutPatch,
    ) -> Result<Option<Workout>, ApiError> {
        let mut store = self.lock()?;
        Ok(store
            .workouts
            .get_mut(&id)
            .filter(|w| w.user_id == owner)
            .map(|workout| {
                workout.apply(patch);
                workout.clone()
            }))
    }

    async fn toggle_status(&self, id: Uuid, owner: Uuid) -> Result<Option<Workout>, ApiError> {
        let mut store = self.lock()?;
        Ok(store
            .workouts
            .get_mut(&id)
            .filter(|w| w.user_id == owner)
            .map(|workout| {
                workout.status = workout.status.toggled();
                workout.updated_at = Utc::now();
                workout.clone()
            }))
    }

    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, ApiError> {
        let mut store = self.lock()?;
        let owned = store.workouts.get(&id).is_some_and(|w| w.user_id == owner);
        if owned {
            store.workouts.remove(&id);
            store.comments.retain(|_, c| c.workout_id != id);
        }
        Ok(owned)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Workout>, ApiError> {
        let store = self.lock()?;
        let mut workouts: Vec<Workout> = store
            .workouts
            .values()
            .filter(|w| w.user_id == owner)
            .cloned()
            .collect();
        workouts.sort_by_key(|w| (w.start_date_time, w.created_at));
        Ok(workouts)
    }

    async fn count_in_range(
        &self,
        owner: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<(i64, i64), ApiError> {
        let store = self.lock()?;
        let in_range = store
            .workouts
            .values()
            .filter(|w| w.user_id == owner && w.start_date_time >= from && w.start_date_time < to);

        let (total, done) = in_range.fold((0i64, 0i64), |(total, done), w| {
            let done = if w.status == WorkoutStatus::Done { done + 1 } else { done };
            (total + 1, done)
        });

        Ok((total, done))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn add_to_workout(&self, owner: Uuid, comment: &Comment) -> Result<Option<Comment>, ApiError> {
        let mut store = self.lock()?;

        let Some(workout) = store
            .workouts
            .get_mut(&comment.workout_id)
            .filter(|w| w.user_id == owner)
        else {
            return Ok(None);
        };

        workout.comments.push(comment.id);
        workout.updated_at = Utc::now();
        store.comments.insert(comment.id, comment.clone());

        Ok(Some(comment.clone()))
    }

    async fn list_by_workout(&self, owner: Uuid, workout_id: Uuid) -> Result<Option<Vec<Comment>>, ApiError> {
        let store = self.lock()?;

        let Some(workout) = store.workouts.get(&workout_id).filter(|w| w.user_id == owner) else {
            return Ok(None);
        };

        let comments = workout
            .comments
            .iter()
            .filter_map(|id| store.comments.get(id).cloned())
            .collect();

        Ok(Some(comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateExercise, CreateUser, CreateWorkout};
    use crate::repository::Repositories;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn user(email: &str) -> User {
        User::new(CreateUser {
            email: email.to_string(),
            name: "Test".to_string(),
            password_hash: "hash".to_string(),
        })
    }

    fn workout(owner: Uuid, day: u32) -> Workout {
        Workout::new(CreateWorkout {
            user_id: owner,
            name: format!("Workout on {day}"),
            start_date_time: at(day, 8),
            exercises: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repos = Repositories::in_memory();
        repos.users.create(&user("a@x.com")).await.unwrap();

        assert_matches!(
            repos.users.create(&user("a@x.com")).await,
            Err(ApiError::Conflict(msg)) if msg == USER_EXISTS_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_exercise_access_is_owner_scoped() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();

        let exercise = Exercise::new(CreateExercise {
            user_id: owner,
            name: "Row".to_string(),
            duration: 20,
            description: None,
        });
        repos.exercises.create(&exercise).await.unwrap();

        assert!(repos.exercises.find_by_id_and_owner(exercise.id, intruder).await.unwrap().is_none());
        assert!(repos
            .exercises
            .update_fields(exercise.id, intruder, &ExercisePatch { duration: Some(1), ..Default::default() })
            .await
            .unwrap()
            .is_none());
        assert!(!repos.exercises.delete_by_id(exercise.id, intruder).await.unwrap());
        assert!(repos.exercises.list_by_owner(intruder).await.unwrap().is_empty());

        let stored = repos.exercises.find_by_id_and_owner(exercise.id, owner).await.unwrap().unwrap();
        assert_eq!(stored.duration, 20);
        assert!(repos.exercises.delete_by_id(exercise.id, owner).await.unwrap());
    }

    #[tokio::test]
    async fn test_workout_access_is_owner_scoped() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let w = workout(owner, 4);
        repos.workouts.create(&w).await.unwrap();

        let rename = WorkoutPatch {
            name: Some("Stolen".to_string()),
            ..Default::default()
        };
        assert!(repos.workouts.find_by_id_and_owner(w.id, intruder).await.unwrap().is_none());
        assert!(repos.workouts.update_fields(w.id, intruder, &rename).await.unwrap().is_none());
        assert!(repos.workouts.toggle_status(w.id, intruder).await.unwrap().is_none());
        assert!(!repos.workouts.delete_by_id(w.id, intruder).await.unwrap());
        assert!(repos.workouts.list_by_owner(intruder).await.unwrap().is_empty());
        assert!(repos.comments.list_by_workout(intruder, w.id).await.unwrap().is_none());

        let stored = repos.workouts.find_by_id_and_owner(w.id, owner).await.unwrap().unwrap();
        assert_eq!(stored, w);
    }

    #[tokio::test]
    async fn test_workouts_listed_by_start_time() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();

        for day in [20, 3, 11] {
            repos.workouts.create(&workout(owner, day)).await.unwrap();
        }

        let listed = repos.workouts.list_by_owner(owner).await.unwrap();
        let starts: Vec<_> = listed.iter().map(|w| w.start_date_time).collect();
        assert_eq!(starts, vec![at(3, 8), at(11, 8), at(20, 8)]);
    }

    #[tokio::test]
    async fn test_count_in_range() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();

        let done = workout(owner, 5);
        repos.workouts.create(&done).await.unwrap();
        repos.workouts.toggle_status(done.id, owner).await.unwrap();
        repos.workouts.create(&workout(owner, 6)).await.unwrap();
        repos.workouts.create(&workout(owner, 25)).await.unwrap();
        repos.workouts.create(&workout(Uuid::new_v4(), 5)).await.unwrap();

        let counts = repos.workouts.count_in_range(owner, at(1, 0), at(10, 0)).await.unwrap();
        assert_eq!(counts, (2, 1));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_cancel_out() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let w = workout(owner, 1);
        repos.workouts.create(&w).await.unwrap();
        let id = w.id;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let workouts = repos.workouts.clone();
                tokio::spawn(async move { workouts.toggle_status(id, owner).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap().unwrap();
        }

        let stored = repos.workouts.find_by_id_and_owner(w.id, owner).await.unwrap().unwrap();
        assert_eq!(stored.status, WorkoutStatus::Pending);
        assert!(repos.workouts.toggle_status(w.id, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_comment_appends_only_to_owned_workout() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let w = workout(owner, 1);
        repos.workouts.create(&w).await.unwrap();

        let first = Comment::new(w.id, owner, "first".to_string());
        let second = Comment::new(w.id, owner, "second".to_string());
        repos.comments.add_to_workout(owner, &first).await.unwrap().unwrap();
        repos.comments.add_to_workout(owner, &second).await.unwrap().unwrap();

        let foreign = Comment::new(w.id, Uuid::new_v4(), "nope".to_string());
        assert!(repos.comments.add_to_workout(foreign.user_id, &foreign).await.unwrap().is_none());

        let stored = repos.workouts.find_by_id_and_owner(w.id, owner).await.unwrap().unwrap();
        assert_eq!(stored.comments, vec![first.id, second.id]);

        let texts: Vec<_> = repos
            .comments
            .list_by_workout(owner, w.id)
            .await
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_deleting_workout_removes_comments() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let w = workout(owner, 1);
        repos.workouts.create(&w).await.unwrap();
        repos
            .comments
            .add_to_workout(owner, &Comment::new(w.id, owner, "gone".to_string()))
            .await
            .unwrap();

        assert!(repos.workouts.delete_by_id(w.id, owner).await.unwrap());
        assert!(repos.comments.list_by_workout(owner, w.id).await.unwrap().is_none());
    }
}

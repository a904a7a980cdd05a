use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub duration: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an exercise
#[derive(Debug, Default, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
}

/// Validated data for a new exercise
#[derive(Debug, Clone)]
pub struct CreateExercise {
    pub user_id: Uuid,
    pub name: String,
    pub duration: i32,
    pub description: Option<String>,
}

/// Partial update: `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
}

impl Exercise {
    pub fn new(data: CreateExercise) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            duration: data.duration,
            description: data.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: &ExercisePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        self.updated_at = Utc::now();
    }
}

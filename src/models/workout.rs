use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::ApiError;

pub const START_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Workout completion state. Only ever toggles between the two values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "workout_status", rename_all = "lowercase")]
pub enum WorkoutStatus {
    #[default]
    Pending,
    Done,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Pending => "pending",
            WorkoutStatus::Done => "done",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            WorkoutStatus::Pending => WorkoutStatus::Done,
            WorkoutStatus::Done => WorkoutStatus::Pending,
        }
    }
}

impl std::fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub status: WorkoutStatus,
    #[serde(with = "start_date_time_format")]
    pub start_date_time: NaiveDateTime,
    pub exercises: Vec<Uuid>,
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a workout
#[derive(Debug, Default, Deserialize)]
pub struct CreateWorkoutRequest {
    pub name: Option<String>,
    pub start_date_time: Option<String>,
    pub exercises: Option<Vec<Uuid>>,
}

/// Validated data for a new workout
#[derive(Debug, Clone)]
pub struct CreateWorkout {
    pub user_id: Uuid,
    pub name: String,
    pub start_date_time: NaiveDateTime,
    pub exercises: Vec<Uuid>,
}

/// Request body for a partial workout update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkoutRequest {
    pub name: Option<String>,
    pub start_date_time: Option<String>,
    pub exercises: Option<Vec<Uuid>>,
}

/// Partial update: `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub name: Option<String>,
    pub start_date_time: Option<NaiveDateTime>,
    pub exercises: Option<Vec<Uuid>>,
}

impl Workout {
    pub fn new(data: CreateWorkout) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            status: WorkoutStatus::Pending,
            start_date_time: data.start_date_time,
            exercises: data.exercises,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: &WorkoutPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(start) = patch.start_date_time {
            self.start_date_time = start;
        }
        if let Some(exercises) = &patch.exercises {
            self.exercises = exercises.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp
pub fn parse_start_date_time(value: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(value.trim(), START_DATE_TIME_FORMAT).map_err(|_| {
        ApiError::validation("Invalid start_date_time format, expected YYYY-MM-DD HH:MM:SS")
    })
}

mod start_date_time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::START_DATE_TIME_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(START_DATE_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, START_DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

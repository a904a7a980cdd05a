use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCommentRequest {
    pub text: Option<String>,
}

impl Comment {
    pub fn new(workout_id: Uuid, user_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id,
            user_id,
            text,
            created_at: Utc::now(),
        }
    }
}

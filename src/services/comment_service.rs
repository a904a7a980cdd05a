use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{Comment, CreateCommentRequest};
use crate::repository::CommentRepository;
use crate::services::workout_service::WORKOUT_NOT_FOUND;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository + Send + Sync>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository + Send + Sync>) -> Self {
        Self { comments }
    }

    /// Post a comment on one of the caller's workouts
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        request: CreateCommentRequest,
    ) -> Result<Comment, ApiError> {
        let text = request
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::validation("Comment text is required"))?;

        let comment = Comment::new(workout_id, user_id, text);
        let comment = self
            .comments
            .add_to_workout(user_id, &comment)
            .await?
            .ok_or_else(|| ApiError::not_found(WORKOUT_NOT_FOUND))?;

        info!(user_id = %user_id, workout_id = %workout_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    pub async fn list_comments(&self, user_id: Uuid, workout_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        self.comments
            .list_by_workout(user_id, workout_id)
            .await?
            .ok_or_else(|| ApiError::not_found(WORKOUT_NOT_FOUND))
    }
}

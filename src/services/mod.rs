// Business logic services

pub mod comment_service;
pub mod exercise_service;
pub mod workout_service;

pub use comment_service::CommentService;
pub use exercise_service::ExerciseService;
pub use workout_service::WorkoutService;

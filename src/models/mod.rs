// Data models

pub mod comment;
pub mod exercise;
pub mod report;
pub mod user;
pub mod workout;

pub use comment::*;
pub use exercise::*;
pub use report::*;
pub use user::*;
pub use workout::*;

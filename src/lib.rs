//! Fitness tracking API: accounts, session tokens, and owner-scoped
//! exercises, workouts and comments.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod repository;
pub mod services;

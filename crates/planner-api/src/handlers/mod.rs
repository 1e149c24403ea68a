//! HTTP handlers for planner-api.

pub mod auth;
pub mod extract;
pub mod health;
pub mod todos;

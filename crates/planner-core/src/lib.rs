//! # planner-core
//!
//! Core types, traits, and abstractions for the smart-planner service.
//!
//! This crate provides the to-do data model, the crate-wide error type and the
//! collaborator traits (model backend, persistence) that the other
//! smart-planner crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;

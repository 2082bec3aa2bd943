//! Shared types and models for the Garden Advisor platform
//!
//! This crate contains the domain types shared between the backend services,
//! external API clients, and the classifier registry.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;

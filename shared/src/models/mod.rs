//! Domain models for the Garden Advisor platform

pub mod detection;
pub mod location;
pub mod recommendation;
pub mod weather;

pub use detection::*;
pub use location::*;
pub use recommendation::*;
pub use weather::*;

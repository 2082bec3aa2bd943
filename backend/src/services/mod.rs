//! Business logic services for the Garden Advisor backend

pub mod analysis;
pub mod history;
pub mod knowledge;
pub mod location;
pub mod recommendation;
pub mod weather;

pub use analysis::AnalysisService;
pub use history::HistoryService;
pub use knowledge::KnowledgeService;
pub use location::LocationService;
pub use recommendation::RecommendationService;
pub use weather::WeatherService;

//! External API integrations

pub mod geolocation;
pub mod gemini;
pub mod speech;
pub mod weather;

pub use gemini::GeminiClient;
pub use geolocation::GeoIpClient;
pub use speech::SpeechClient;
pub use weather::{OpenMeteoClient, OpenWeatherClient};

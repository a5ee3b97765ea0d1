//! HTTP API handlers

pub mod health;
pub mod languages;
pub mod lessons;

pub use health::health_routes;
pub use languages::language_routes;
pub use lessons::lesson_routes;

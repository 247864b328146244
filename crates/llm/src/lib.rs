//! Roadmap generation on top of a generative text model.
//!
//! [`model::TextModel`] is the seam to the provider, [`client::GeminiClient`]
//! is the production implementation, and [`generator::RoadmapGenerator`]
//! turns generation parameters into validated roadmap content.

pub mod client;
pub mod error;
pub mod generator;
pub mod model;

pub use client::{GeminiClient, GeminiConfig};
pub use error::GenerateError;
pub use generator::RoadmapGenerator;
pub use model::TextModel;

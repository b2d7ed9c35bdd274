//! Generative model access for sitesmith.
//!
//! Wraps a model service behind a uniform gateway, builds the prompts for each
//! pipeline stage and parses the master plan the model returns.

pub mod gateway;
pub mod gemini;
pub mod generator;
pub mod plan;
pub mod prompts;

pub use gateway::{AiError, AiGateway, GenerateRequest, ModelClient, ResponseFormat};
pub use gemini::GeminiClient;
pub use generator::{Generator, GeneratorConfig};
pub use plan::{MasterPlan, PlanError, Section};

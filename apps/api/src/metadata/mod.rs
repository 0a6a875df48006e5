//! Stock-photo metadata generation.
//! Prompt building, the single model call, and reply parsing.
//! All model calls go through llm_client::VisionModel.

pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompts;

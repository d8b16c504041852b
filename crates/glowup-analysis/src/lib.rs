//! Then/now post analysis over a generative-language service.
//!
//! Cleans two batches of raw social posts, fans out the four analysis tasks
//! (overall comparison, per-period topic, per-period personality keywords,
//! growth advice) to the `generateContent` endpoint, and assembles a flat
//! eight-field report. Individual task failures degrade to error-tagged
//! content in their slot; the report is always complete. A separate module
//! rolls up engagement counters for raw timelines.

pub mod error;
pub mod generation;
pub mod metrics;
pub mod normalize;
pub mod prompts;
pub mod report;
pub mod schema;

pub use error::{ConfigError, GenerationError};
pub use generation::{Generated, GeminiClient, GeminiConfig};
pub use report::{analyze, AnalysisReport, AnalysisRequest, TopicResult};

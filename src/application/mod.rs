//! Application layer - Use cases and orchestration.
//!
//! The retrieval and generation services wrap provider ports; the ask
//! pipeline drives one gateway request across both remote services. Nothing
//! here depends on a concrete adapter.

pub mod pipeline;
pub mod retry;
pub mod services;

pub use pipeline::{AskPipeline, AskRun, AskState, GatewayError, PipelinePolicy};
pub use retry::RetryPolicy;
pub use services::{GenerationError, GenerationService, RetrievalError, RetrievalService};

/// Business logic layer for blog-service
///
/// - Pipeline: post generation and comment classification flows
pub mod pipeline;

pub use pipeline::{PipelineService, EMPTY_TOPIC, INVALID_COMMENT};

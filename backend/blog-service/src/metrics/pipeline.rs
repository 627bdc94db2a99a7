use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Generate-post outcomes (created, invalid_input, generation_failed, store_failed).
    pub static ref POSTS_GENERATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_posts_generated_total",
        "Generate-post requests segmented by outcome",
        &["result"]
    )
    .expect("failed to register blog_posts_generated_total");

    /// Comments stored, segmented by assigned sentiment.
    pub static ref COMMENTS_CLASSIFIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_comments_classified_total",
        "Stored comments segmented by sentiment label",
        &["sentiment"]
    )
    .expect("failed to register blog_comments_classified_total");

    /// Inference failures by stage (generation, classification) and kind.
    pub static ref INFERENCE_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_inference_failures_total",
        "Inference call failures segmented by stage and kind",
        &["stage", "kind"]
    )
    .expect("failed to register blog_inference_failures_total");

    /// Latency of inference calls by stage.
    pub static ref INFERENCE_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "blog_inference_duration_seconds",
        "Inference call duration segmented by stage",
        &["stage"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("failed to register blog_inference_duration_seconds");
}

//! Batch run wiring

pub mod pipeline;

pub use pipeline::{PipelineReport, RatingPipeline};

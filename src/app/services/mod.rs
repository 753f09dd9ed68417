pub mod photo_preprocessor;
pub mod pipeline;
pub mod quality_gate;
pub mod review_loop;

pub use photo_preprocessor::PhotoPreprocessor;
pub use pipeline::GenerationPipeline;
pub use quality_gate::QualityGate;
pub use review_loop::{ReviewOutcome, run_review};

pub mod backend_service;
pub mod palette_pipeline;

pub use backend_service::{BackendRequest, BackendService};
pub use palette_pipeline::{PalettePipeline, PalettePipelineBuilder, PipelineFailure};

pub mod context;
pub mod orchestration;
pub mod stages;

pub use context::{PaletteContext, PaletteMetrics, PipelineStage};
pub use orchestration::{PalettePipeline, PalettePipelineBuilder, PipelineFailure};
pub use stages::{dedup, normalize, rank, DedupPolicy};

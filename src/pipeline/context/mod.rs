pub mod metrics;
pub mod palette_context;
pub mod state;

pub use metrics::PaletteMetrics;
pub use palette_context::PaletteContext;
pub use state::{PipelineStage, ProcessingState};

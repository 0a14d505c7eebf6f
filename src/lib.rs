pub mod backend;
pub mod config;
pub mod error;
pub mod palette;
pub mod pipeline;

pub use backend::{ClusterBackend, CloudinaryStore, ColorBackend, Quantizer, RemoteScoreBackend, RemoteStore};
pub use error::{FailureKind, PaletteError, UpstreamStage};
pub use palette::{PaletteRequest, PaletteRequestConfig, PaletteResponse, PaletteResult, Swatch};
pub use pipeline::{PalettePipeline, PipelineFailure};

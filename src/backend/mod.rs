pub mod cloudinary;
pub mod cluster;
pub mod remote;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::PaletteError;
use crate::palette::{BackendKind, PaletteRequestConfig, RawSwatches};

pub use cloudinary::CloudinaryStore;
pub use cluster::{ClusterBackend, Quantizer};
pub use remote::{RemoteScoreBackend, RemoteStore, ResourceColors, UploadedImage};

/// A color extraction backend. Implementations narrow whatever their
/// source returns into `RawSwatches`, dropping absent records.
#[async_trait]
pub trait ColorBackend: Send + Sync {
    async fn extract(
        &self,
        image: Bytes,
        config: PaletteRequestConfig,
    ) -> Result<RawSwatches, PaletteError>;

    fn kind(&self) -> BackendKind;

    fn name(&self) -> &'static str;
}

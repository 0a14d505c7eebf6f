use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One `(hex, score)` pair from the remote scorer. The score is only
/// meaningful relative to the byte size of the uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRemoteSwatch {
    pub hex: String,
    pub score: f64,
}

/// One populated cluster from the local quantizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClusterSwatch {
    pub hex: String,
    pub rgb: [u8; 3],
    pub population: u64,
}

/// Named slots a vibrancy quantizer may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwatchSlot {
    Vibrant,
    Muted,
    DarkVibrant,
    DarkMuted,
    LightVibrant,
    LightMuted,
}

/// Quantizer output. Slots keep insertion order; unpopulated slots are `None`.
pub type SlotPalette = IndexMap<SwatchSlot, Option<RawClusterSwatch>>;

/// Backend output narrowed to a fixed shape, tagged by the backend that
/// produced it so the normalizer can pick the dominance rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSwatches {
    Remote(Vec<RawRemoteSwatch>),
    Cluster(Vec<RawClusterSwatch>),
}

impl RawSwatches {
    pub fn len(&self) -> usize {
        match self {
            RawSwatches::Remote(swatches) => swatches.len(),
            RawSwatches::Cluster(swatches) => swatches.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn backend_kind(&self) -> BackendKind {
        match self {
            RawSwatches::Remote(_) => BackendKind::RemoteScore,
            RawSwatches::Cluster(_) => BackendKind::Cluster,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    RemoteScore,
    Cluster,
}

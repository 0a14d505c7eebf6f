use std::fmt;
use std::num::NonZeroUsize;

use bytes::Bytes;

use crate::palette::{PaletteRequestConfig, RawSwatches, Swatch};

// Markers to track the state of a palette request through the pipeline
pub struct IdleState {
    pub(super) image: Option<Bytes>,
    pub(super) config: PaletteRequestConfig,
}

pub struct ValidatedState {
    pub(super) image: Bytes,
    pub(super) image_size: NonZeroUsize,
    pub(super) config: PaletteRequestConfig,
}

pub struct ExtractedState {
    pub(super) image_size: NonZeroUsize,
    pub(super) raw: RawSwatches,
}

pub struct NormalizedState {
    pub(super) swatches: Vec<Swatch>,
}

pub struct DeduplicatedState {
    pub(super) swatches: Vec<Swatch>,
}

pub struct RankedState {
    pub(super) swatches: Vec<Swatch>,
}

pub trait ProcessingState: 'static {
    const STAGE: PipelineStage;

    fn state_name() -> &'static str {
        Self::STAGE.name()
    }
}

impl ProcessingState for IdleState {
    const STAGE: PipelineStage = PipelineStage::Idle;
}

impl ProcessingState for ValidatedState {
    const STAGE: PipelineStage = PipelineStage::AwaitingBackend;
}

impl ProcessingState for ExtractedState {
    const STAGE: PipelineStage = PipelineStage::Normalizing;
}

impl ProcessingState for NormalizedState {
    const STAGE: PipelineStage = PipelineStage::Deduplicating;
}

impl ProcessingState for DeduplicatedState {
    const STAGE: PipelineStage = PipelineStage::Ranking;
}

impl ProcessingState for RankedState {
    const STAGE: PipelineStage = PipelineStage::Complete;
}

/// Where a request is in the pipeline. A context in a given typestate is
/// about to run the stage named by its `STAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    ValidatingConfig,
    AwaitingBackend,
    Normalizing,
    Deduplicating,
    Ranking,
    Complete,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "Idle",
            PipelineStage::ValidatingConfig => "ValidatingConfig",
            PipelineStage::AwaitingBackend => "AwaitingBackend",
            PipelineStage::Normalizing => "Normalizing",
            PipelineStage::Deduplicating => "Deduplicating",
            PipelineStage::Ranking => "Ranking",
            PipelineStage::Complete => "Complete",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use bytes::Bytes;
use uuid::Uuid;

use super::metrics::PaletteMetrics;
use super::state::{
    DeduplicatedState, ExtractedState, IdleState, NormalizedState, ProcessingState, RankedState,
    ValidatedState,
};
use crate::error::PaletteError;
use crate::palette::{PaletteRequest, PaletteRequestConfig, PaletteResult, RawSwatches};
use crate::pipeline::stages::{dedup, normalize, rank, DedupPolicy};

// PaletteContext with compile-time state tracking. Each transition consumes
// the context, so a request can only move forward.
pub struct PaletteContext<S> {
    id: Uuid,
    metrics: PaletteMetrics,
    processing_start: Instant,
    state: S,
}

impl<S: ProcessingState> PaletteContext<S> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn metrics(&self) -> &PaletteMetrics {
        &self.metrics
    }

    pub fn elapsed(&self) -> Duration {
        self.processing_start.elapsed()
    }

    pub fn state_name(&self) -> &'static str {
        S::state_name()
    }

    fn map_state<T>(self, transition: impl FnOnce(S) -> T) -> PaletteContext<T> {
        PaletteContext {
            id: self.id,
            metrics: self.metrics,
            processing_start: self.processing_start,
            state: transition(self.state),
        }
    }
}

impl PaletteContext<IdleState> {
    pub fn new(request: PaletteRequest) -> Self {
        let config = request.config();
        Self {
            id: Uuid::new_v4(),
            metrics: PaletteMetrics::new(),
            processing_start: Instant::now(),
            state: IdleState {
                image: request.image,
                config,
            },
        }
    }

    /// Fails with `MissingInput` when there is no image or it is empty.
    pub fn validate(self) -> Result<PaletteContext<ValidatedState>, PaletteError> {
        let image_size = self
            .state
            .image
            .as_ref()
            .and_then(|image| NonZeroUsize::new(image.len()))
            .ok_or(PaletteError::MissingInput)?;
        Ok(self.map_state(|idle| ValidatedState {
            image: idle.image.unwrap_or_default(),
            image_size,
            config: idle.config,
        }))
    }
}

impl PaletteContext<ValidatedState> {
    pub fn image(&self) -> &Bytes {
        &self.state.image
    }

    pub fn image_size(&self) -> NonZeroUsize {
        self.state.image_size
    }

    pub fn config(&self) -> PaletteRequestConfig {
        self.state.config
    }

    pub fn into_extracted(
        mut self,
        raw: RawSwatches,
        backend_duration: Duration,
    ) -> PaletteContext<ExtractedState> {
        self.metrics.record_backend_duration(backend_duration, raw.len());
        self.map_state(|validated| ExtractedState {
            image_size: validated.image_size,
            raw,
        })
    }
}

impl PaletteContext<ExtractedState> {
    pub fn raw(&self) -> &RawSwatches {
        &self.state.raw
    }

    pub fn normalize(self) -> PaletteContext<NormalizedState> {
        self.map_state(|extracted| NormalizedState {
            swatches: normalize(extracted.raw, extracted.image_size),
        })
    }
}

impl PaletteContext<NormalizedState> {
    pub fn dedup(self, policy: DedupPolicy) -> PaletteContext<DeduplicatedState> {
        self.map_state(|normalized| DeduplicatedState {
            swatches: dedup(normalized.swatches, policy),
        })
    }
}

impl PaletteContext<DeduplicatedState> {
    pub fn rank(self) -> PaletteContext<RankedState> {
        self.map_state(|deduplicated| RankedState {
            swatches: rank(deduplicated.swatches),
        })
    }
}

impl PaletteContext<RankedState> {
    pub fn into_result(mut self) -> (PaletteResult, PaletteMetrics) {
        let total = self.elapsed();
        self.metrics.finalize(total, self.state.swatches.len());
        (PaletteResult::from_ranked(self.state.swatches), self.metrics)
    }
}

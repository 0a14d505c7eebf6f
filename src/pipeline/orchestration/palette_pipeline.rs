use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, ServiceBuilder, ServiceExt};
use tracing::{debug, error, info, warn, Instrument};

use super::backend_service::{into_palette_error, BackendRequest, BackendService};
use crate::backend::ColorBackend;
use crate::config::Configuration;
use crate::error::{FailureKind, PaletteError};
use crate::palette::{BackendKind, PaletteRequest, PaletteResponse, PaletteResult, RawSwatches};
use crate::pipeline::context::state::IdleState;
use crate::pipeline::context::{PaletteContext, PipelineStage};
use crate::pipeline::stages::DedupPolicy;

/// Terminal `Failed` state: the stage the request was in and why it failed.
#[derive(Error, Debug)]
#[error("Palette pipeline failed while {stage}: {error}")]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    #[source]
    pub error: PaletteError,
}

impl PipelineFailure {
    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}

pub struct PalettePipelineBuilder {
    backend: Option<Arc<dyn ColorBackend>>,
    backend_timeout: Option<Duration>,
    dedup_policy: DedupPolicy,
}

impl PalettePipelineBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            backend_timeout: None,
            dedup_policy: DedupPolicy::default(),
        }
    }

    pub fn backend(mut self, backend: impl ColorBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    // Bounds the whole backend call, upload and metadata included.
    pub fn backend_timeout(mut self, backend_timeout: Duration) -> Self {
        self.backend_timeout = Some(backend_timeout);
        self
    }

    pub fn dedup_policy(mut self, dedup_policy: DedupPolicy) -> Self {
        self.dedup_policy = dedup_policy;
        self
    }

    /// Applies the process configuration, overriding earlier settings.
    pub fn configuration(mut self, configuration: &Configuration) -> Self {
        self.backend_timeout = configuration.backend_timeout();
        self.dedup_policy = configuration.dedup_policy;
        self
    }

    pub fn build(self) -> Result<PalettePipeline, PaletteError> {
        let backend = self
            .backend
            .ok_or_else(|| PaletteError::Configuration("Backend not set".to_string()))?;
        let backend_kind = backend.kind();
        let backend_name = backend.name();

        let service = ServiceBuilder::new()
            .option_layer(self.backend_timeout.map(TimeoutLayer::new))
            .service(BackendService::new(backend));

        Ok(PalettePipeline {
            backend: BoxCloneSyncService::new(service),
            backend_kind,
            backend_name,
            dedup_policy: self.dedup_policy,
        })
    }
}

impl Default for PalettePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one request at a time per call, with no state shared between
/// calls; a single pipeline can serve concurrent requests.
pub struct PalettePipeline {
    backend: BoxCloneSyncService<BackendRequest, RawSwatches, BoxError>,
    backend_kind: BackendKind,
    backend_name: &'static str,
    dedup_policy: DedupPolicy,
}

impl PalettePipeline {
    pub fn builder() -> PalettePipelineBuilder {
        PalettePipelineBuilder::new()
    }

    pub async fn process(&self, request: PaletteRequest) -> Result<PaletteResult, PipelineFailure> {
        let context = PaletteContext::new(request);
        let span = tracing::info_span!(
            "palette_request",
            request_id = %context.id(),
            backend = self.backend_name
        );
        self.run(context).instrument(span).await
    }

    /// Processes the request and shapes the outcome as the caller body.
    pub async fn respond(&self, request: PaletteRequest) -> (u16, PaletteResponse) {
        PaletteResponse::from_result(self.process(request).await.map_err(|failure| failure.error))
    }

    async fn run(&self, context: PaletteContext<IdleState>) -> Result<PaletteResult, PipelineFailure> {
        debug!("{} -> {}", context.state_name(), PipelineStage::ValidatingConfig);
        let context = context
            .validate()
            .map_err(|e| self.fail(PipelineStage::ValidatingConfig, e))?;

        debug!(
            "{} (quality {}, max colors {}, {} bytes)",
            context.state_name(),
            context.config().quality(),
            context.config().max_color_count(),
            context.image_size()
        );
        let backend_start = Instant::now();
        let request = BackendRequest {
            image: context.image().clone(),
            config: context.config(),
        };
        let raw = self
            .backend
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| self.fail(PipelineStage::AwaitingBackend, into_palette_error(e)))?;
        if raw.backend_kind() != self.backend_kind {
            return Err(self.fail(
                PipelineStage::AwaitingBackend,
                PaletteError::malformed(format!(
                    "{} backend returned {:?} swatches",
                    self.backend_name,
                    raw.backend_kind()
                )),
            ));
        }
        let context = context.into_extracted(raw, backend_start.elapsed());

        debug!("{} {} raw swatches", context.state_name(), context.raw().len());
        let context = context.normalize();
        debug!("{} with {:?}", context.state_name(), self.dedup_policy);
        let context = context.dedup(self.dedup_policy);
        debug!("{}", context.state_name());
        let context = context.rank();
        let (result, metrics) = context.into_result();

        info!(
            "Extracted {} colors from {} raw swatches in {:?} (backend {:?})",
            metrics.palette_size(),
            metrics.raw_swatch_count(),
            metrics.total_duration().unwrap_or_default(),
            metrics.backend_duration().unwrap_or_default()
        );
        Ok(result)
    }

    fn fail(&self, stage: PipelineStage, error: PaletteError) -> PipelineFailure {
        match &error {
            PaletteError::MissingInput => warn!("Rejected palette request in {}: {}", stage, error),
            PaletteError::UpstreamFailure {
                stage: upstream,
                status,
                body,
            } => error!(
                "Upstream {} failure in {} (status {}): {}",
                upstream, stage, status, body
            ),
            PaletteError::MalformedBackendResponse(_) => {
                error!("Backend contract mismatch in {}: {}", stage, error)
            }
            PaletteError::Unexpected(_) | PaletteError::Configuration(_) => {
                error!("Unexpected failure in {}: {:?}", stage, error)
            }
        }
        PipelineFailure { stage, error }
    }
}

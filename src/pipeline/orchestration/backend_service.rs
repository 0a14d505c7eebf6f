use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::task::{Context, Poll};
use futures::Future;
use tower::timeout::error::Elapsed;
use tower::{BoxError, Service};

use crate::backend::ColorBackend;
use crate::error::{PaletteError, UpstreamStage};
use crate::palette::{PaletteRequestConfig, RawSwatches};

pub struct BackendRequest {
    pub image: Bytes,
    pub config: PaletteRequestConfig,
}

/// Exposes a `ColorBackend` as a tower service so transport concerns such
/// as timeouts can be layered around it.
#[derive(Clone)]
pub struct BackendService {
    inner: Arc<dyn ColorBackend>,
}

impl BackendService {
    pub fn new(inner: Arc<dyn ColorBackend>) -> Self {
        Self { inner }
    }
}

impl Service<BackendRequest> for BackendService {
    type Response = RawSwatches;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BackendRequest) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move {
            let raw = inner.extract(req.image, req.config).await?;
            Ok(raw)
        })
    }
}

/// Recovers the palette error from whatever the layered service stack
/// returned. An elapsed timeout counts as a gateway timeout upstream.
pub fn into_palette_error(error: BoxError) -> PaletteError {
    match error.downcast::<PaletteError>() {
        Ok(error) => *error,
        Err(error) if error.is::<Elapsed>() => {
            PaletteError::upstream(UpstreamStage::Backend, 504, "backend call timed out")
        }
        Err(error) => PaletteError::Unexpected(error.to_string()),
    }
}

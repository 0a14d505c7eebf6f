use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::ColorBackend;
use crate::error::PaletteError;
use crate::palette::{is_hex_color, BackendKind, PaletteRequestConfig, RawRemoteSwatch, RawSwatches};

/// Handle to an image held by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub public_id: String,
}

/// Color metadata as the remote store returns it. `None` entries are
/// records the store left empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceColors {
    #[serde(default)]
    pub colors: Option<Vec<Option<(String, f64)>>>,
}

/// The two calls the remote scorer exposes. Each reports a non-success
/// status as `PaletteError::UpstreamFailure`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn upload(&self, image: Bytes) -> Result<UploadedImage, PaletteError>;

    async fn color_metadata(&self, image: &UploadedImage) -> Result<ResourceColors, PaletteError>;
}

/// Uploads the image, then asks the store for its color scores. No retry;
/// the metadata call is only made once the upload succeeded.
pub struct RemoteScoreBackend<S> {
    store: S,
}

impl<S: RemoteStore> RemoteScoreBackend<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: RemoteStore> ColorBackend for RemoteScoreBackend<S> {
    #[instrument(skip_all, fields(bytes = image.len()))]
    async fn extract(
        &self,
        image: Bytes,
        _config: PaletteRequestConfig,
    ) -> Result<RawSwatches, PaletteError> {
        let uploaded = self.store.upload(image).await?;
        debug!("Uploaded image as {}", uploaded.public_id);

        let metadata = self.store.color_metadata(&uploaded).await?;
        let swatches = narrow_remote_colors(metadata)?;
        debug!(
            "Remote store returned {} scored colors for {}",
            swatches.len(),
            uploaded.public_id
        );
        Ok(RawSwatches::Remote(swatches))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::RemoteScore
    }

    fn name(&self) -> &'static str {
        "remote-score"
    }
}

pub(crate) fn narrow_remote_colors(
    metadata: ResourceColors,
) -> Result<Vec<RawRemoteSwatch>, PaletteError> {
    let colors = metadata
        .colors
        .ok_or_else(|| PaletteError::malformed("color metadata has no colors field"))?;

    colors
        .into_iter()
        .flatten()
        .map(|(hex, score)| {
            if !is_hex_color(&hex) {
                return Err(PaletteError::malformed(format!(
                    "invalid hex color {:?}",
                    hex
                )));
            }
            if !score.is_finite() || score < 0.0 {
                return Err(PaletteError::malformed(format!(
                    "invalid score {} for {}",
                    score, hex
                )));
            }
            Ok(RawRemoteSwatch { hex, score })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::UpstreamStage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory store that counts calls.
    #[derive(Default)]
    pub struct FakeStore {
        pub upload_status: Option<u16>,
        pub metadata_status: Option<u16>,
        pub colors: ResourceColors,
        pub uploads: Arc<AtomicUsize>,
        pub metadata_calls: Arc<AtomicUsize>,
    }

    impl FakeStore {
        pub fn with_colors(colors: Vec<(&str, f64)>) -> Self {
            Self {
                colors: ResourceColors {
                    colors: Some(
                        colors
                            .into_iter()
                            .map(|(hex, score)| Some((hex.to_string(), score)))
                            .collect(),
                    ),
                },
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl RemoteStore for FakeStore {
        async fn upload(&self, _image: Bytes) -> Result<UploadedImage, PaletteError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.upload_status {
                return Err(PaletteError::upstream(UpstreamStage::Upload, status, "upload rejected"));
            }
            Ok(UploadedImage {
                public_id: "palette/test".to_string(),
            })
        }

        async fn color_metadata(
            &self,
            _image: &UploadedImage,
        ) -> Result<ResourceColors, PaletteError> {
            self.metadata_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.metadata_status {
                return Err(PaletteError::upstream(
                    UpstreamStage::Metadata,
                    status,
                    "metadata unavailable",
                ));
            }
            Ok(self.colors.clone())
        }
    }

    #[tokio::test]
    async fn test_extract_returns_remote_swatches() {
        let backend = RemoteScoreBackend::new(FakeStore::with_colors(vec![
            ("#FFFFFF", 80.5),
            ("#000000", 19.5),
        ]));
        let raw = backend
            .extract(Bytes::from_static(b"img"), PaletteRequestConfig::default())
            .await
            .unwrap();
        assert_eq!(
            raw,
            RawSwatches::Remote(vec![
                RawRemoteSwatch {
                    hex: "#FFFFFF".to_string(),
                    score: 80.5
                },
                RawRemoteSwatch {
                    hex: "#000000".to_string(),
                    score: 19.5
                },
            ])
        );
    }

    #[tokio::test]
    async fn test_upload_failure_skips_metadata() {
        let store = FakeStore {
            upload_status: Some(401),
            ..FakeStore::with_colors(vec![("#FFFFFF", 1.0)])
        };
        let metadata_calls = store.metadata_calls.clone();
        let backend = RemoteScoreBackend::new(store);
        let error = backend
            .extract(Bytes::from_static(b"img"), PaletteRequestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            PaletteError::UpstreamFailure {
                stage: UpstreamStage::Upload,
                status: 401,
                ..
            }
        ));
        assert_eq!(metadata_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_metadata_failure_is_upstream() {
        let store = FakeStore {
            metadata_status: Some(500),
            ..Default::default()
        };
        let backend = RemoteScoreBackend::new(store);
        let error = backend
            .extract(Bytes::from_static(b"img"), PaletteRequestConfig::default())
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), 500);
        assert!(matches!(
            error,
            PaletteError::UpstreamFailure {
                stage: UpstreamStage::Metadata,
                ..
            }
        ));
    }

    #[test]
    fn test_narrow_drops_null_records() {
        let metadata = ResourceColors {
            colors: Some(vec![Some(("#ABCDEF".to_string(), 2.0)), None]),
        };
        assert_eq!(narrow_remote_colors(metadata).unwrap().len(), 1);
    }

    #[test]
    fn test_narrow_rejects_missing_colors() {
        let error = narrow_remote_colors(ResourceColors::default()).unwrap_err();
        assert!(matches!(error, PaletteError::MalformedBackendResponse(_)));
    }

    #[test]
    fn test_narrow_rejects_bad_records() {
        let bad_hex = ResourceColors {
            colors: Some(vec![Some(("white".to_string(), 2.0))]),
        };
        assert!(narrow_remote_colors(bad_hex).is_err());

        let bad_score = ResourceColors {
            colors: Some(vec![Some(("#FFFFFF".to_string(), -1.0))]),
        };
        assert!(narrow_remote_colors(bad_score).is_err());
    }

    #[test]
    fn test_resource_colors_from_json() {
        let metadata: ResourceColors = serde_json::from_str(
            r##"{"public_id":"x","colors":[["#FFFFFF",80.5],null,["#000000",19.5]]}"##,
        )
        .unwrap();
        assert_eq!(narrow_remote_colors(metadata).unwrap().len(), 2);

        let metadata: ResourceColors = serde_json::from_str(r#"{"public_id":"x"}"#).unwrap();
        assert!(metadata.colors.is_none());
    }
}

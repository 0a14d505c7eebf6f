use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use super::remote::{RemoteStore, ResourceColors, UploadedImage};
use crate::config::CloudinaryConfig;
use crate::error::{PaletteError, UpstreamStage};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    public_id: Option<String>,
}

/// Cloudinary as the remote scoring store: an unsigned preset upload
/// followed by an Admin API resource lookup with `colors=true`.
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    pub fn resource_url(&self, public_id: &str) -> String {
        format!(
            "{}/{}/resources/image/upload/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name,
            public_id
        )
    }

    async fn check_status(response: Response, stage: UpstreamStage) -> Result<Response, PaletteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read Cloudinary {} error body: {}", stage, e);
                format!("<failed to read response body: {}>", e)
            }
        };
        debug!("Cloudinary {} returned {}: {}", stage, status.as_u16(), body);
        Err(PaletteError::upstream(stage, status.as_u16(), body))
    }
}

/// A request that never produced a response still failed upstream. Without
/// a status of its own it is reported as a bad gateway.
fn transport_error(stage: UpstreamStage, error: reqwest::Error) -> PaletteError {
    let status = error.status().map(|s| s.as_u16()).unwrap_or(502);
    PaletteError::upstream(stage, status, error.to_string())
}

#[async_trait]
impl RemoteStore for CloudinaryStore {
    async fn upload(&self, image: Bytes) -> Result<UploadedImage, PaletteError> {
        let form = Form::new()
            .part("file", Part::bytes(image.to_vec()).file_name("upload"))
            .text("upload_preset", self.config.upload_preset.clone());

        debug!("Uploading image to {}", self.upload_url());
        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(UpstreamStage::Upload, e))?;
        let response = Self::check_status(response, UpstreamStage::Upload).await?;

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| PaletteError::malformed(format!("upload response: {}", e)))?;
        let public_id = uploaded
            .public_id
            .ok_or_else(|| PaletteError::malformed("upload response has no public_id"))?;
        Ok(UploadedImage { public_id })
    }

    async fn color_metadata(&self, image: &UploadedImage) -> Result<ResourceColors, PaletteError> {
        let url = self.resource_url(&image.public_id);
        debug!("Fetching color metadata from {}", url);
        let response = self
            .client
            .get(url)
            .query(&[("colors", "true")])
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await
            .map_err(|e| transport_error(UpstreamStage::Metadata, e))?;
        let response = Self::check_status(response, UpstreamStage::Metadata).await?;

        response
            .json()
            .await
            .map_err(|e| PaletteError::malformed(format!("color metadata response: {}", e)))
    }
}

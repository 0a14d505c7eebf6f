use serde::Serialize;

use super::swatch::Swatch;
use crate::error::{PaletteError, UpstreamStage};

/// Dominance-descending swatches with no repeated hex.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PaletteResult(Vec<Swatch>);

impl PaletteResult {
    /// Callers are expected to pass ranked, deduplicated swatches.
    pub(crate) fn from_ranked(swatches: Vec<Swatch>) -> Self {
        Self(swatches)
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn hexes(&self) -> Vec<&str> {
        self.0.iter().map(Swatch::hex).collect()
    }
}

/// Body returned to the caller, with the status it should be sent with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaletteResponse {
    Success {
        colors: PaletteResult,
    },
    Failure {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl PaletteResponse {
    pub fn from_result(result: Result<PaletteResult, PaletteError>) -> (u16, Self) {
        match result {
            Ok(colors) => (200, PaletteResponse::Success { colors }),
            Err(error) => (error.status_code(), Self::from_error(&error)),
        }
    }

    /// Upstream failures expose the upstream body as `details`; everything
    /// else only carries its message.
    pub fn from_error(error: &PaletteError) -> Self {
        match error {
            PaletteError::MissingInput => PaletteResponse::Failure {
                error: error.to_string(),
                details: None,
            },
            PaletteError::UpstreamFailure { stage, body, .. } => PaletteResponse::Failure {
                error: upstream_message(*stage).to_string(),
                details: Some(body.clone()),
            },
            PaletteError::MalformedBackendResponse(detail)
            | PaletteError::Unexpected(detail)
            | PaletteError::Configuration(detail) => PaletteResponse::Failure {
                error: "Internal Server Error: Failed to extract colors".to_string(),
                details: Some(detail.clone()),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"error":"Internal Server Error: Failed to extract colors"}"#.to_string()
        })
    }
}

fn upstream_message(stage: UpstreamStage) -> &'static str {
    match stage {
        UpstreamStage::Upload => "Cloudinary upload failed",
        UpstreamStage::Metadata => "Failed to fetch color palette",
        UpstreamStage::Backend => "Failed to extract colors",
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, instrument};

use super::ColorBackend;
use crate::error::PaletteError;
use crate::palette::{
    is_hex_color, BackendKind, PaletteRequestConfig, RawClusterSwatch, RawSwatches, SlotPalette,
};

/// A local pixel-clustering quantizer. CPU bound; called off the async
/// runtime.
pub trait Quantizer: Send + Sync + 'static {
    fn quantize(
        &self,
        image: &[u8],
        quality: u8,
        max_color_count: u16,
    ) -> Result<SlotPalette, PaletteError>;
}

impl<F> Quantizer for F
where
    F: Fn(&[u8], u8, u16) -> Result<SlotPalette, PaletteError> + Send + Sync + 'static,
{
    fn quantize(
        &self,
        image: &[u8],
        quality: u8,
        max_color_count: u16,
    ) -> Result<SlotPalette, PaletteError> {
        self(image, quality, max_color_count)
    }
}

pub struct ClusterBackend<Q> {
    quantizer: Arc<Q>,
}

impl<Q: Quantizer> ClusterBackend<Q> {
    pub fn new(quantizer: Q) -> Self {
        Self {
            quantizer: Arc::new(quantizer),
        }
    }
}

#[async_trait]
impl<Q: Quantizer> ColorBackend for ClusterBackend<Q> {
    #[instrument(skip_all, fields(quality = config.quality(), max_color_count = config.max_color_count()))]
    async fn extract(
        &self,
        image: Bytes,
        config: PaletteRequestConfig,
    ) -> Result<RawSwatches, PaletteError> {
        let quantizer = self.quantizer.clone();
        let slots = tokio::task::spawn_blocking(move || {
            quantizer.quantize(&image, config.quality(), config.max_color_count())
        })
        .await??;

        let swatches = narrow_slots(slots)?;
        debug!("Quantizer populated {} slots", swatches.len());
        Ok(RawSwatches::Cluster(swatches))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Cluster
    }

    fn name(&self) -> &'static str {
        "cluster"
    }
}

/// Drops empty slots, keeping slot order.
pub(crate) fn narrow_slots(slots: SlotPalette) -> Result<Vec<RawClusterSwatch>, PaletteError> {
    slots
        .into_iter()
        .filter_map(|(slot, swatch)| swatch.map(|swatch| (slot, swatch)))
        .map(|(slot, swatch)| {
            if is_hex_color(&swatch.hex) {
                Ok(swatch)
            } else {
                Err(PaletteError::malformed(format!(
                    "invalid hex color {:?} in {:?} slot",
                    swatch.hex, slot
                )))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::SwatchSlot;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn swatch(hex: &str, rgb: [u8; 3], population: u64) -> Option<RawClusterSwatch> {
        Some(RawClusterSwatch {
            hex: hex.to_string(),
            rgb,
            population,
        })
    }

    #[tokio::test]
    async fn test_extract_drops_empty_slots() {
        let backend = ClusterBackend::new(|_: &[u8], _: u8, _: u16| -> Result<SlotPalette, PaletteError> {
            let mut slots = SlotPalette::new();
            slots.insert(SwatchSlot::Vibrant, swatch("#112233", [17, 34, 51], 500));
            slots.insert(SwatchSlot::Muted, None);
            slots.insert(SwatchSlot::DarkVibrant, swatch("#112233", [17, 34, 51], 500));
            Ok(slots)
        });
        let raw = backend
            .extract(Bytes::from_static(b"img"), PaletteRequestConfig::default())
            .await
            .unwrap();
        assert_eq!(raw.backend_kind(), BackendKind::Cluster);
        assert_eq!(raw.len(), 2);
    }

    #[tokio::test]
    async fn test_quantizer_receives_clamped_config() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let quantize = move |image: &[u8], quality: u8, max_color_count: u16| -> Result<SlotPalette, PaletteError> {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(image, b"img");
            assert_eq!(quality, 10);
            assert_eq!(max_color_count, 16);
            Ok(SlotPalette::new())
        };
        let backend = ClusterBackend::new(quantize);
        let raw = backend
            .extract(
                Bytes::from_static(b"img"),
                PaletteRequestConfig::new(Some(99), Some(0)),
            )
            .await
            .unwrap();
        assert!(raw.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_quantizer_error_propagates() {
        let backend = ClusterBackend::new(|_: &[u8], _: u8, _: u16| -> Result<SlotPalette, PaletteError> {
            Err(PaletteError::Unexpected("unsupported image format".to_string()))
        });
        let error = backend
            .extract(Bytes::from_static(b"img"), PaletteRequestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(error, PaletteError::Unexpected(_)));
    }

    #[test]
    fn test_narrow_rejects_invalid_hex() {
        let mut slots = SlotPalette::new();
        slots.insert(SwatchSlot::LightMuted, swatch("nope", [0, 0, 0], 1));
        let error = narrow_slots(slots).unwrap_err();
        assert!(matches!(error, PaletteError::MalformedBackendResponse(_)));
    }
}

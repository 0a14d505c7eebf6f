use std::time::Duration;

/// Metrics collected while processing one palette request
#[derive(Debug, Clone, Default)]
pub struct PaletteMetrics {
    backend_duration: Option<Duration>,
    total_duration: Option<Duration>,
    raw_swatch_count: usize,
    palette_size: usize,
}

impl PaletteMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_backend_duration(&mut self, duration: Duration, raw_swatch_count: usize) {
        self.backend_duration = Some(duration);
        self.raw_swatch_count = raw_swatch_count;
    }

    pub fn finalize(&mut self, total: Duration, palette_size: usize) {
        self.total_duration = Some(total);
        self.palette_size = palette_size;
    }

    pub fn backend_duration(&self) -> Option<Duration> {
        self.backend_duration
    }

    pub fn total_duration(&self) -> Option<Duration> {
        self.total_duration
    }

    pub fn raw_swatch_count(&self) -> usize {
        self.raw_swatch_count
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }
}

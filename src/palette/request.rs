use bytes::Bytes;

pub const MIN_QUALITY: i64 = 1;
pub const MAX_QUALITY: i64 = 10;
pub const DEFAULT_QUALITY: i64 = 1;
pub const MIN_MAX_COLOR_COUNT: i64 = 16;
pub const MAX_MAX_COLOR_COUNT: i64 = 256;
pub const DEFAULT_MAX_COLOR_COUNT: i64 = 256;

/// Quantizer tuning. Both values are always clamped to their bounds,
/// whatever the client sent. The remote scorer ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteRequestConfig {
    quality: u8,
    max_color_count: u16,
}

impl PaletteRequestConfig {
    pub fn new(quality: Option<i64>, max_color_count: Option<i64>) -> Self {
        let quality = quality
            .unwrap_or(DEFAULT_QUALITY)
            .clamp(MIN_QUALITY, MAX_QUALITY);
        let max_color_count = max_color_count
            .unwrap_or(DEFAULT_MAX_COLOR_COUNT)
            .clamp(MIN_MAX_COLOR_COUNT, MAX_MAX_COLOR_COUNT);
        Self {
            quality: quality as u8,
            max_color_count: max_color_count as u16,
        }
    }

    /// Builds the config from raw form fields. Blank or unparseable values
    /// fall back to the defaults.
    pub fn from_form(quality: Option<&str>, max_color_count: Option<&str>) -> Self {
        Self::new(parse_field(quality), parse_field(max_color_count))
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn max_color_count(&self) -> u16 {
        self.max_color_count
    }
}

impl Default for PaletteRequestConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn parse_field(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

/// What a caller submits: the image plus optional tuning.
#[derive(Debug, Clone, Default)]
pub struct PaletteRequest {
    pub image: Option<Bytes>,
    pub quality: Option<i64>,
    pub max_color_count: Option<i64>,
}

impl PaletteRequest {
    pub fn new(image: impl Into<Bytes>) -> Self {
        Self {
            image: Some(image.into()),
            quality: None,
            max_color_count: None,
        }
    }

    pub fn quality(mut self, quality: i64) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn max_color_count(mut self, max_color_count: i64) -> Self {
        self.max_color_count = Some(max_color_count);
        self
    }

    pub fn config(&self) -> PaletteRequestConfig {
        PaletteRequestConfig::new(self.quality, self.max_color_count)
    }
}

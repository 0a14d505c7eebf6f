use serde::{Deserialize, Serialize};

/// A single representative color with the signal used to rank it.
///
/// `hex` is the identity of a swatch: two swatches with the same hex
/// (ignoring case) are the same color, whatever their dominance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    hex: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    rgb: Option<[u8; 3]>,
    dominance: f64,
}

impl Swatch {
    pub fn new(hex: impl Into<String>, rgb: Option<[u8; 3]>, dominance: f64) -> Self {
        Self {
            hex: hex.into(),
            rgb,
            dominance,
        }
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> Option<[u8; 3]> {
        self.rgb
    }

    pub fn dominance(&self) -> f64 {
        self.dominance
    }

    /// Case-insensitive identity key.
    pub fn color_key(&self) -> String {
        self.hex.to_ascii_lowercase()
    }
}

/// Returns true for `#` followed by exactly six hex digits.
pub fn is_hex_color(hex: &str) -> bool {
    match hex.strip_prefix('#') {
        Some(digits) => digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

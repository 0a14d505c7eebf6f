mod raw;
mod request;
mod response;
mod swatch;

pub use raw::{BackendKind, RawClusterSwatch, RawRemoteSwatch, RawSwatches, SlotPalette, SwatchSlot};
pub use request::{
    PaletteRequest, PaletteRequestConfig, DEFAULT_MAX_COLOR_COUNT, DEFAULT_QUALITY,
    MAX_MAX_COLOR_COUNT, MAX_QUALITY, MIN_MAX_COLOR_COUNT, MIN_QUALITY,
};
pub use response::{PaletteResponse, PaletteResult};
pub use swatch::{is_hex_color, Swatch};

use std::num::NonZeroUsize;

use crate::palette::{RawClusterSwatch, RawRemoteSwatch, RawSwatches, Swatch};

/// Calibration constant applied to remote scores. The result approximates,
/// but is not, a percentage of the image; the value is kept as is so
/// palettes stay comparable with earlier output.
pub const REMOTE_SCORE_SCALE: f64 = 10_000.0;

/// Turns backend output into swatches using the dominance rule of the
/// backend that produced it.
pub fn normalize(raw: RawSwatches, image_byte_size: NonZeroUsize) -> Vec<Swatch> {
    match raw {
        RawSwatches::Remote(swatches) => swatches
            .into_iter()
            .map(|swatch| normalize_remote(swatch, image_byte_size))
            .collect(),
        RawSwatches::Cluster(swatches) => swatches.into_iter().map(normalize_cluster).collect(),
    }
}

fn normalize_remote(swatch: RawRemoteSwatch, image_byte_size: NonZeroUsize) -> Swatch {
    let dominance = (swatch.score / image_byte_size.get() as f64) * REMOTE_SCORE_SCALE;
    Swatch::new(swatch.hex, None, dominance)
}

// Raw pixel count, not a share of the total.
fn normalize_cluster(swatch: RawClusterSwatch) -> Swatch {
    Swatch::new(swatch.hex, Some(swatch.rgb), swatch.population as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(bytes: usize) -> NonZeroUsize {
        NonZeroUsize::new(bytes).unwrap()
    }

    #[test]
    fn test_remote_scores_are_scaled_by_image_size() {
        let raw = RawSwatches::Remote(vec![
            RawRemoteSwatch {
                hex: "#FFFFFF".to_string(),
                score: 80.5,
            },
            RawRemoteSwatch {
                hex: "#000000".to_string(),
                score: 19.5,
            },
        ]);
        let swatches = normalize(raw, size(1000));
        assert_eq!(swatches.len(), 2);
        assert!((swatches[0].dominance() - 805.0).abs() < 1e-9);
        assert!((swatches[1].dominance() - 195.0).abs() < 1e-9);
        assert_eq!(swatches[0].rgb(), None);
    }

    #[test]
    fn test_cluster_population_is_dominance() {
        let raw = RawSwatches::Cluster(vec![RawClusterSwatch {
            hex: "#112233".to_string(),
            rgb: [17, 34, 51],
            population: 500,
        }]);
        let swatches = normalize(raw, size(1));
        assert_eq!(swatches, vec![Swatch::new("#112233", Some([17, 34, 51]), 500.0)]);
    }

    #[test]
    fn test_hex_is_passed_through() {
        let raw = RawSwatches::Remote(vec![RawRemoteSwatch {
            hex: "#aBc123".to_string(),
            score: 1.0,
        }]);
        assert_eq!(normalize(raw, size(10))[0].hex(), "#aBc123");
    }
}

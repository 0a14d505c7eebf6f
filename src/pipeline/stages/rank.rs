use crate::palette::Swatch;

/// Orders swatches by dominance, highest first. The sort is stable, so
/// swatches with equal dominance keep their incoming order.
pub fn rank(mut swatches: Vec<Swatch>) -> Vec<Swatch> {
    swatches.sort_by(|a, b| b.dominance().total_cmp(&a.dominance()));
    swatches
}

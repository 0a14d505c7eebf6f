use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Deserialize;

use crate::palette::Swatch;

/// Which swatch survives when several share a hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Keep the first swatch seen and drop the rest.
    #[default]
    FirstSeen,
    /// Keep the first position but the highest dominance seen for it.
    MaxDominance,
}

/// Collapses swatches with the same hex, compared case-insensitively.
/// Output order is the order in which each color was first seen.
pub fn dedup(swatches: Vec<Swatch>, policy: DedupPolicy) -> Vec<Swatch> {
    let mut unique: IndexMap<String, Swatch> = IndexMap::with_capacity(swatches.len());

    for swatch in swatches {
        match unique.entry(swatch.color_key()) {
            Entry::Vacant(entry) => {
                entry.insert(swatch);
            }
            Entry::Occupied(mut entry) => {
                if policy == DedupPolicy::MaxDominance
                    && swatch.dominance() > entry.get().dominance()
                {
                    entry.insert(swatch);
                }
            }
        }
    }

    unique.into_values().collect()
}

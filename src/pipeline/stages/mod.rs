mod dedup;
mod normalize;
mod rank;

pub use dedup::{dedup, DedupPolicy};
pub use normalize::{normalize, REMOTE_SCORE_SCALE};
pub use rank::rank;

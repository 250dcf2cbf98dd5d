// ── Domain model ──

mod signal;
mod snapshot;

pub use signal::{QualityBucket, SignalKind, classify};
pub use snapshot::{Dataset, Snapshot};

pub(crate) use snapshot::value_to_text;

pub mod analyzer;
pub mod result_cache;
pub mod scoring;
pub mod snapshot_file;
pub mod universe;

pub use analyzer::BatchAnalyzer;
pub use result_cache::{ResultCache, Snapshot};
pub use scoring::{build_scorer, ClassifierScorer, Scorer, ThresholdScorer};
pub use snapshot_file::SnapshotFile;
pub use universe::{load_universe, Universe};

//! The three fault detectors (spec §4).

pub mod chronic_idle;
pub mod read_error;
pub mod source_decay;

pub use chronic_idle::ChronicIdleDetector;
pub use read_error::ReadErrorDetector;
pub use source_decay::SourceDecayDetector;

//! The chromatogram building pipeline.
//!
//! scans -> [`ObservationStream`] -> [`IntervalPartition`](crate::models::partition::IntervalPartition)
//! -> [`ContinuityFilter`] and [`pad_gaps`] -> [`Chromatogram`](crate::models::chromatogram::Chromatogram)s.

pub mod builder;
pub mod context;
pub mod continuity;
pub mod observation_stream;

pub use builder::{
    BuildOutput,
    BuildStats,
    ChromatogramBuilder,
    build_chromatograms,
};
pub use context::RunContext;
pub use continuity::{
    ContinuityFilter,
    Rejection,
    longest_run_at_or_above,
    pad_gaps,
};
pub use observation_stream::{
    ObservationStream,
    StreamedObservation,
};

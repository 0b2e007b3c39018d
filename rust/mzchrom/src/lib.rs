#![doc = include_str!("../README.md")]

// Re-export main structures
pub use crate::building::{
    BuildOutput,
    BuildStats,
    ChromatogramBuilder,
    RunContext,
    build_chromatograms,
};
pub use crate::config::{
    BuilderConfig,
    PaddingConfig,
};
pub use crate::models::chromatogram::Chromatogram;
pub use crate::models::partition::IntervalPartition;
pub use crate::models::scan::{
    Observation,
    RawDataSource,
    Scan,
    ScanSelection,
};
pub use crate::models::tolerance::MzTolerance;
pub use crate::models::trace::TraceAccumulator;

// Re-export traits
pub use crate::models::scan::SelectsScans;
pub use crate::models::tolerance::ToleranceWindow;

// Declare modules
pub mod building;
pub mod config;
pub mod errors;
pub mod models;
pub mod utils;
pub use crate::utils::TupleRange;

// Re-export errors
pub use crate::errors::{
    DataProcessingError,
    DataReadingError,
    MzChromError,
};

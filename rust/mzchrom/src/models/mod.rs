pub mod chromatogram;
pub mod partition;
pub mod scan;
pub mod tolerance;
pub mod trace;

pub use chromatogram::{
    Apex,
    Chromatogram,
    ChromatogramPoint,
};
pub use partition::{
    IntervalPartition,
    MzInterval,
    Placement,
    TraceId,
};
pub use scan::{
    Observation,
    Polarity,
    RawDataSource,
    Scan,
    ScanHeader,
    ScanSelection,
    SelectsScans,
};
pub use tolerance::{
    MzTolerance,
    ToleranceWindow,
};
pub use trace::{
    ScanPosition,
    TraceAccumulator,
};

use std::fmt::Display;

#[derive(Debug)]
pub enum MzChromError {
    DataReadingError(DataReadingError),
    DataProcessingError(DataProcessingError),
    /// The run was cancelled through its [`RunContext`](crate::RunContext).
    /// No partial output is produced.
    Cancelled,
}

impl Display for MzChromError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataReadingError(e) => write!(f, "Error reading scan data: {}", e),
            Self::DataProcessingError(e) => write!(f, "Error processing data: {}", e),
            Self::Cancelled => write!(f, "Chromatogram building was cancelled"),
        }
    }
}

impl std::error::Error for MzChromError {}

/// Errors that make the scans of a raw data source unusable as a whole.
///
/// Any of these aborts the run for that source.
#[derive(Debug, Clone, PartialEq)]
pub enum DataReadingError {
    /// A selected scan carries no centroided data at all,
    /// mass detection has to run before building chromatograms.
    MissingDetectionData { scan_number: u32 },
    /// Scans were supplied out of acquisition order.
    ScanOrderViolation {
        scan_number: u32,
        rt_seconds: f32,
        previous_rt_seconds: f32,
    },
    NoMatchingScans,
}

impl Display for DataReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDetectionData { scan_number } => write!(
                f,
                "Scan #{} does not have centroided data, run mass detection first",
                scan_number
            ),
            Self::ScanOrderViolation {
                scan_number,
                rt_seconds,
                previous_rt_seconds,
            } => write!(
                f,
                "Scan #{} (RT {}s) is out of acquisition order, previous scan was at RT {}s. Only scans with increasing scan numbers and retention times can be used",
                scan_number, rt_seconds, previous_rt_seconds
            ),
            Self::NoMatchingScans => write!(f, "No scans match the scan selection"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataProcessingError {
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    ExpectedNonEmptyData,
}

impl Display for DataProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "Invalid value {} for '{}': {}", value, name, reason),
            Self::ExpectedNonEmptyData => write!(f, "Expected non-empty data"),
        }
    }
}

impl From<DataProcessingError> for MzChromError {
    fn from(e: DataProcessingError) -> Self {
        MzChromError::DataProcessingError(e)
    }
}

impl From<DataReadingError> for MzChromError {
    fn from(e: DataReadingError) -> Self {
        MzChromError::DataReadingError(e)
    }
}

pub type Result<T> = std::result::Result<T, MzChromError>;

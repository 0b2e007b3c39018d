use crate::utils::TupleRange;
use serde::{
    Deserialize,
    Serialize,
};

/// A single centroided signal, a (m/z, intensity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub mz: f64,
    pub intensity: f64,
}

impl Observation {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }

    /// A usable centroid has a finite, positive m/z and a finite intensity.
    pub fn is_valid(&self) -> bool {
        self.mz.is_finite() && self.mz > 0.0 && self.intensity.is_finite()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    #[default]
    Unknown,
}

/// One acquisition event as handed over by the raw data reader.
///
/// `centroids` is `None` when mass detection never ran on the scan,
/// which is different from a scan where nothing was detected
/// (`Some` of an empty vector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub scan_number: u32,
    pub rt_seconds: f32,
    #[serde(default = "default_ms_level")]
    pub ms_level: u8,
    #[serde(default)]
    pub polarity: Polarity,
    pub centroids: Option<Vec<Observation>>,
}

fn default_ms_level() -> u8 {
    1
}

impl Scan {
    pub fn new(scan_number: u32, rt_seconds: f32, centroids: Vec<Observation>) -> Self {
        Self {
            scan_number,
            rt_seconds,
            ms_level: 1,
            polarity: Polarity::Unknown,
            centroids: Some(centroids),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.as_ref().is_none_or(|x| x.is_empty())
    }

    pub fn header(&self) -> ScanHeader {
        ScanHeader {
            scan_number: self.scan_number,
            rt_seconds: self.rt_seconds,
        }
    }
}

/// Identity of a selected scan, kept around after its centroids
/// have been flattened into the observation stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanHeader {
    pub scan_number: u32,
    pub rt_seconds: f32,
}

/// Scans of one raw data file, in acquisition order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDataSource {
    pub name: String,
    pub scans: Vec<Scan>,
}

impl RawDataSource {
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

/// Decides which scans of a raw data source take part in a run.
pub trait SelectsScans {
    fn selects(&self, scan: &Scan) -> bool;
}

impl<F> SelectsScans for F
where
    F: Fn(&Scan) -> bool,
{
    fn selects(&self, scan: &Scan) -> bool {
        self(scan)
    }
}

/// Declarative scan filter, every restriction left as `None` matches all scans.
///
/// Example:
/// ```
/// use mzchrom::models::scan::{Scan, ScanSelection, SelectsScans};
///
/// let selection = ScanSelection {
///     ms_level: Some(1),
///     ..Default::default()
/// };
/// let scan = Scan::new(1, 0.5, vec![]);
/// assert!(selection.selects(&scan));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSelection {
    #[serde(default)]
    pub ms_level: Option<u8>,
    #[serde(default)]
    pub rt_seconds: Option<TupleRange<f32>>,
    #[serde(default)]
    pub scan_numbers: Option<TupleRange<u32>>,
}

impl SelectsScans for ScanSelection {
    fn selects(&self, scan: &Scan) -> bool {
        self.ms_level.is_none_or(|x| x == scan.ms_level)
            && self.rt_seconds.is_none_or(|x| x.contains(scan.rt_seconds))
            && self.scan_numbers.is_none_or(|x| x.contains(scan.scan_number))
    }
}

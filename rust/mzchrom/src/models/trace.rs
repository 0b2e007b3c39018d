use super::scan::Observation;
use crate::utils::streaming_calculators::{
    RunningMean,
    RunningStatsCalculator,
};
use std::collections::BTreeMap;

/// Position of a scan in the sequence of selected scans of a run.
///
/// Consecutive positions are consecutive scans, this is what the
/// continuity checks rely on.
pub type ScanPosition = u32;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TracePoint {
    observation: Observation,
    padding: bool,
}

/// Accumulates the observations of a single m/z region across scans.
///
/// Holds at most one observation per scan: the first one inserted wins.
/// Since observations are fed in decreasing intensity order, that is
/// also the most intense one.
///
/// The mean m/z is updated on every accepted insertion. Zero-intensity
/// padding points added after the fact do not move it.
#[derive(Debug, Clone)]
pub struct TraceAccumulator {
    points: BTreeMap<ScanPosition, TracePoint>,
    mz_mean: RunningMean,
    weighted_mz: RunningStatsCalculator,
    duplicate_scan_hits: usize,
}

impl TraceAccumulator {
    pub fn new(scan: ScanPosition, seed: Observation) -> Self {
        let mut out = Self {
            points: BTreeMap::new(),
            mz_mean: RunningMean::default(),
            weighted_mz: RunningStatsCalculator::default(),
            duplicate_scan_hits: 0,
        };
        out.insert(scan, seed);
        out
    }

    /// Adds an observation at `scan`.
    ///
    /// Returns false (and leaves the trace untouched) if the scan
    /// already holds an observation.
    pub fn insert(&mut self, scan: ScanPosition, observation: Observation) -> bool {
        if self.points.contains_key(&scan) {
            self.duplicate_scan_hits += 1;
            return false;
        }
        self.points.insert(
            scan,
            TracePoint {
                observation,
                padding: false,
            },
        );
        self.mz_mean.add(observation.mz);
        self.weighted_mz.add(observation.intensity, observation.mz);
        true
    }

    /// Adds a zero-intensity sentinel at an unoccupied scan.
    ///
    /// Returns false if the scan is already occupied, existing points
    /// are never overwritten.
    pub fn insert_padding(&mut self, scan: ScanPosition) -> bool {
        if self.points.contains_key(&scan) {
            return false;
        }
        let observation = Observation::new(self.mean_mz(), 0.0);
        self.points.insert(
            scan,
            TracePoint {
                observation,
                padding: true,
            },
        );
        true
    }

    pub fn observation_at(&self, scan: ScanPosition) -> Option<Observation> {
        self.points.get(&scan).map(|x| x.observation)
    }

    pub fn is_padding_at(&self, scan: ScanPosition) -> bool {
        self.points.get(&scan).is_some_and(|x| x.padding)
    }

    /// Arithmetic mean of the m/z of all detected observations.
    ///
    /// A trace is always seeded on construction so this is never empty.
    pub fn mean_mz(&self) -> f64 {
        self.mz_mean.mean().unwrap_or(f64::NAN)
    }

    /// Intensity weighted mean m/z of the detected observations.
    pub fn weighted_mean_mz(&self) -> f64 {
        self.weighted_mz.mean().unwrap_or_else(|| self.mean_mz())
    }

    /// All occupied scans (detected and padding) in ascending order.
    pub fn scans(&self) -> impl Iterator<Item = ScanPosition> + '_ {
        self.points.keys().copied()
    }

    /// Scans holding a detected (non padding) observation, ascending.
    pub fn detected_scans(&self) -> impl Iterator<Item = ScanPosition> + '_ {
        self.points
            .iter()
            .filter(|(_, v)| !v.padding)
            .map(|(k, _)| *k)
    }

    /// `(scan, observation, is_padding)` in ascending scan order.
    pub fn iter(&self) -> impl Iterator<Item = (ScanPosition, Observation, bool)> + '_ {
        self.points
            .iter()
            .map(|(k, v)| (*k, v.observation, v.padding))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn num_detected(&self) -> usize {
        self.mz_mean.count()
    }

    /// Number of insertions rejected because their scan was taken.
    pub fn duplicate_scan_hits(&self) -> usize {
        self.duplicate_scan_hits
    }
}

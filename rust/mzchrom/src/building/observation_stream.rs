//! Flattening of the selected scans into one intensity ordered stream.

use crate::errors::DataReadingError;
use crate::models::scan::{
    Observation,
    Scan,
    ScanHeader,
    SelectsScans,
};
use crate::models::trace::ScanPosition;
use rayon::prelude::*;
use tracing::{
    debug,
    info,
    warn,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamedObservation {
    pub scan: ScanPosition,
    pub observation: Observation,
}

/// All observations of the selected scans, most intense first.
#[derive(Debug, Clone)]
pub struct ObservationStream {
    /// Headers of the selected scans, indexed by [`ScanPosition`].
    pub scans: Vec<ScanHeader>,
    pub observations: Vec<StreamedObservation>,
    pub num_empty_scans: usize,
    pub num_invalid_skipped: usize,
}

impl ObservationStream {
    /// Selects the scans of a run and flattens their centroids.
    ///
    /// Ties in intensity are left in no particular order.
    ///
    /// # Errors
    ///
    /// - [`DataReadingError::NoMatchingScans`] if the selection is empty.
    /// - [`DataReadingError::ScanOrderViolation`] if the selected scans are
    ///   not in acquisition order.
    /// - [`DataReadingError::MissingDetectionData`] if a selected scan was
    ///   never centroided.
    pub fn from_scans(
        scans: &[Scan],
        selection: &impl SelectsScans,
    ) -> Result<Self, DataReadingError> {
        let selected: Vec<&Scan> = scans.iter().filter(|x| selection.selects(x)).collect();
        if selected.is_empty() {
            return Err(DataReadingError::NoMatchingScans);
        }

        let num_empty_scans = check_acquisition_order(&selected)?;
        if num_empty_scans > 0 {
            info!("{} scans were found to be empty", num_empty_scans);
        }
        warn_on_mixed_scan_kinds(&selected);

        let mut num_invalid_skipped = 0;
        let mut observations = Vec::new();
        for (pos, scan) in selected.iter().enumerate() {
            let centroids = scan
                .centroids
                .as_ref()
                .ok_or(DataReadingError::MissingDetectionData {
                    scan_number: scan.scan_number,
                })?;
            for obs in centroids.iter() {
                if !obs.is_valid() {
                    num_invalid_skipped += 1;
                    continue;
                }
                observations.push(StreamedObservation {
                    scan: pos as ScanPosition,
                    observation: *obs,
                });
            }
        }
        if num_invalid_skipped > 0 {
            warn!(
                "Skipped {} observations with non-finite or non-positive m/z, or non-finite intensity",
                num_invalid_skipped
            );
        }

        observations.par_sort_unstable_by(|a, b| {
            b.observation
                .intensity
                .total_cmp(&a.observation.intensity)
        });
        debug!(
            "Streaming {} observations from {} scans",
            observations.len(),
            selected.len()
        );

        Ok(Self {
            scans: selected.iter().map(|x| x.header()).collect(),
            observations,
            num_empty_scans,
            num_invalid_skipped,
        })
    }

    pub fn num_scans(&self) -> usize {
        self.scans.len()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Checks scan numbers strictly increase and retention times never
/// decrease. Empty scans only take part in the scan number check.
///
/// Returns the number of empty scans.
fn check_acquisition_order(scans: &[&Scan]) -> Result<usize, DataReadingError> {
    let mut num_empty = 0;
    let mut prev_rt = f32::NEG_INFINITY;
    let mut prev_scan_number: Option<u32> = None;
    for scan in scans.iter() {
        let out_of_order = prev_scan_number.is_some_and(|x| scan.scan_number <= x)
            || (!scan.is_empty() && scan.rt_seconds < prev_rt);
        if out_of_order {
            return Err(DataReadingError::ScanOrderViolation {
                scan_number: scan.scan_number,
                rt_seconds: scan.rt_seconds,
                previous_rt_seconds: prev_rt,
            });
        }
        prev_scan_number = Some(scan.scan_number);
        if scan.is_empty() {
            num_empty += 1;
        } else {
            prev_rt = scan.rt_seconds;
        }
    }
    Ok(num_empty)
}

fn warn_on_mixed_scan_kinds(scans: &[&Scan]) {
    let first = scans[0];
    if let Some(other) = scans.iter().find(|x| x.ms_level != first.ms_level) {
        warn!(
            "Building chromatograms over mixed MS levels ({} and {}), results will likely be wrong. Restrict the scan selection to one MS level",
            first.ms_level, other.ms_level
        );
    }
    if let Some(other) = scans.iter().find(|x| x.polarity != first.polarity) {
        warn!(
            "Building chromatograms over mixed polarities ({:?} and {:?}), results will likely be wrong. Process each polarity separately",
            first.polarity, other.polarity
        );
    }
}

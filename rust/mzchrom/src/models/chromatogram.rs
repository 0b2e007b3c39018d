//! Finished chromatograms, the form kept traces are handed over in.
//!
//! A [`TraceAccumulator`] only knows scan positions. Converting it needs the
//! headers of the selected scans so every point gets its scan number and
//! retention time back.

use super::scan::ScanHeader;
use super::trace::{
    ScanPosition,
    TraceAccumulator,
};
use crate::errors::DataProcessingError;
use crate::utils::{
    TupleRange,
    trapezoid_area,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChromatogramPoint {
    pub scan_position: ScanPosition,
    pub scan_number: u32,
    pub rt_seconds: f32,
    pub mz: f64,
    pub intensity: f64,
    /// True for the zero-intensity points added around detection gaps.
    pub padding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Apex {
    pub scan_number: u32,
    pub rt_seconds: f32,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chromatogram {
    pub mean_mz: f64,
    pub weighted_mean_mz: f64,
    pub apex: Apex,
    /// Trapezoidal area under the intensity profile, over retention
    /// time in seconds.
    pub area: f64,
    /// Range of the detected (non padding) masses.
    pub mz_range: TupleRange<f64>,
    /// Range of the retention times of the detected points.
    pub rt_range: TupleRange<f32>,
    pub num_detected: usize,
    pub points: Vec<ChromatogramPoint>,
}

impl Chromatogram {
    /// Summarizes a trace.
    ///
    /// `scans` are the headers of the selected scans, indexed by scan
    /// position. Fails with [`DataProcessingError::ExpectedNonEmptyData`]
    /// if the trace has no detected point.
    ///
    /// # Panics
    ///
    /// If a point of the trace sits at a position outside of `scans`.
    pub fn from_trace(
        trace: &TraceAccumulator,
        scans: &[ScanHeader],
    ) -> Result<Self, DataProcessingError> {
        let points: Vec<ChromatogramPoint> = trace
            .iter()
            .map(|(pos, obs, padding)| {
                let header = scans[pos as usize];
                ChromatogramPoint {
                    scan_position: pos,
                    scan_number: header.scan_number,
                    rt_seconds: header.rt_seconds,
                    mz: obs.mz,
                    intensity: obs.intensity,
                    padding,
                }
            })
            .collect();

        let mut detected = points.iter().filter(|x| !x.padding);
        let first = detected
            .next()
            .ok_or(DataProcessingError::ExpectedNonEmptyData)?;

        let mut apex = first;
        let mut mz_range = TupleRange::singleton(first.mz);
        let mut rt_range = TupleRange::singleton(first.rt_seconds);
        for point in detected {
            // Strictly greater keeps the earliest of tied apexes.
            if point.intensity > apex.intensity {
                apex = point;
            }
            mz_range = mz_range.span(TupleRange::singleton(point.mz));
            rt_range = rt_range.span(TupleRange::singleton(point.rt_seconds));
        }
        let apex = Apex {
            scan_number: apex.scan_number,
            rt_seconds: apex.rt_seconds,
            height: apex.intensity,
        };

        let rts: Vec<f64> = points.iter().map(|x| x.rt_seconds as f64).collect();
        let intensities: Vec<f64> = points.iter().map(|x| x.intensity).collect();
        let area = trapezoid_area(&rts, &intensities);

        Ok(Self {
            mean_mz: trace.mean_mz(),
            weighted_mean_mz: trace.weighted_mean_mz(),
            apex,
            area,
            mz_range,
            rt_range,
            num_detected: trace.num_detected(),
            points,
        })
    }

    /// Intensities over the whole selected scan sequence, zero where
    /// the chromatogram has no point.
    pub fn dense_intensities(&self, num_scans: usize) -> Vec<f64> {
        let mut out = vec![0.0; num_scans];
        for point in self.points.iter() {
            if let Some(slot) = out.get_mut(point.scan_position as usize) {
                *slot = point.intensity;
            }
        }
        out
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}

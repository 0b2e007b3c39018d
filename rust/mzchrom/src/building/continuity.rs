use crate::config::{
    BuilderConfig,
    PaddingConfig,
};
use crate::models::trace::{
    ScanPosition,
    TraceAccumulator,
};
use std::fmt::Display;
use std::ops::Range;

/// Length of the longest run of consecutive scans where the trace holds a
/// detected point at or above `threshold`.
///
/// Scans are consecutive when their positions in the selected scan
/// sequence are, a scan the trace has no point in breaks the run.
pub fn longest_run_at_or_above(trace: &TraceAccumulator, threshold: f64) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut prev: Option<ScanPosition> = None;
    for (pos, obs, padding) in trace.iter() {
        if padding || obs.intensity < threshold {
            continue;
        }
        current = match prev {
            Some(p) if p + 1 == pos => current + 1,
            _ => 1,
        };
        prev = Some(pos);
        longest = longest.max(current);
    }
    longest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ShortRun { longest_run: usize, required: usize },
    TooFewPoints { num_points: usize, required: usize },
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShortRun {
                longest_run,
                required,
            } => write!(
                f,
                "longest continuous run of {} scans is shorter than {}",
                longest_run, required
            ),
            Self::TooFewPoints {
                num_points,
                required,
            } => write!(f, "{} detected points, at least {} required", num_points, required),
        }
    }
}

/// Decides which finished traces are real signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuityFilter {
    pub min_group_intensity: f64,
    pub min_consecutive_scans: usize,
    pub min_total_points: usize,
}

impl ContinuityFilter {
    pub fn from_config(config: &BuilderConfig) -> Self {
        Self {
            min_group_intensity: config.min_group_intensity,
            min_consecutive_scans: config.min_consecutive_scans as usize,
            min_total_points: config.min_total_points as usize,
        }
    }

    /// `Ok(())` if the trace is kept.
    pub fn check(&self, trace: &TraceAccumulator) -> Result<(), Rejection> {
        let num_points = trace.num_detected();
        if num_points < self.min_total_points {
            return Err(Rejection::TooFewPoints {
                num_points,
                required: self.min_total_points,
            });
        }
        let longest_run = longest_run_at_or_above(trace, self.min_group_intensity);
        if longest_run < self.min_consecutive_scans {
            return Err(Rejection::ShortRun {
                longest_run,
                required: self.min_consecutive_scans,
            });
        }
        Ok(())
    }
}

/// Flanks the detection gaps of a trace with zero-intensity points.
///
/// A gap is a stretch of scans without a detection, including the ones
/// before the first and after the last detection (up to `num_scans`).
/// For every gap at least `min_gap_width` scans wide, up to
/// `trailing_zeros` points go right after the detection preceding it and
/// up to `leading_zeros` right before the detection following it. The
/// two sides together never fill more than the gap.
///
/// Existing points are never overwritten. Returns the number of points
/// added.
pub fn pad_gaps(trace: &mut TraceAccumulator, num_scans: usize, config: &PaddingConfig) -> usize {
    let detected: Vec<ScanPosition> = trace.detected_scans().collect();
    let (Some(&first), Some(&last)) = (detected.first(), detected.last()) else {
        return 0;
    };
    let min_gap = config.min_gap_width as usize;
    let leading = config.leading_zeros as usize;
    let trailing = config.trailing_zeros as usize;
    let mut added = 0;

    let first = first as usize;
    if first >= min_gap {
        let num = leading.min(first);
        added += fill(trace, first - num..first);
    }

    for pair in detected.windows(2) {
        let (left, right) = (pair[0] as usize, pair[1] as usize);
        let width = right - left - 1;
        if width == 0 || width < min_gap {
            continue;
        }
        let num_trailing = trailing.min(width);
        let num_leading = leading.min(width - num_trailing);
        added += fill(trace, left + 1..left + 1 + num_trailing);
        added += fill(trace, right - num_leading..right);
    }

    let last = last as usize;
    let width = num_scans.saturating_sub(last + 1);
    if width > 0 && width >= min_gap {
        let num = trailing.min(width);
        added += fill(trace, last + 1..last + 1 + num);
    }

    added
}

fn fill(trace: &mut TraceAccumulator, positions: Range<usize>) -> usize {
    positions
        .filter(|pos| trace.insert_padding(*pos as ScanPosition))
        .count()
}

//! Dynamic partition of the m/z axis into disjoint intervals.
//!
//! Every interval owns exactly one [`TraceAccumulator`] for its whole
//! lifetime. Intervals are created once, when an observation that no
//! existing interval contains is intense enough to seed a trace, and are
//! never grown, shrunk or split afterwards.
//!
//! Intervals are closed-open `[low, high)`, so two neighbours can share an
//! endpoint and still every mass belongs to at most one interval.
//!
//! The intervals live in a `BTreeMap` keyed by their low bound, the traces
//! in an arena (`Vec`) addressed by [`TraceId`]. Since the intervals are
//! disjoint, ordering by low bound is also ordering by high bound, which
//! is what makes the nearest neighbour lookups enough to keep the
//! partition disjoint on insertion.

use super::scan::Observation;
use super::tolerance::ToleranceWindow;
use super::trace::{
    ScanPosition,
    TraceAccumulator,
};
use crate::utils::TupleRange;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::ops::Bound::{
    Excluded,
    Unbounded,
};

#[cfg(test)]
mod tests;

/// Stable handle of a trace inside an [`IntervalPartition`].
pub type TraceId = usize;

/// Closed-open `[low, high)` region of the m/z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MzInterval {
    pub low: f64,
    pub high: f64,
}

impl MzInterval {
    pub fn contains(&self, mz: f64) -> bool {
        self.low <= mz && mz < self.high
    }

    pub fn overlaps(&self, other: &MzInterval) -> bool {
        self.low < other.high && other.low < self.high
    }
}

#[derive(Debug, Clone, Copy)]
struct IntervalSlot {
    high: f64,
    trace: TraceId,
}

/// What happened to an observation fed to [`IntervalPartition::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Fell inside an existing interval. `inserted` is false when that
    /// trace already had an observation at the same scan.
    Absorbed { trace: TraceId, inserted: bool },
    /// Started a new interval and trace.
    Seeded(TraceId),
    /// The clipped interval was empty and touched its right neighbour,
    /// the observation went to the neighbour's trace.
    Collapsed { trace: TraceId, inserted: bool },
    /// Not contained anywhere and too weak to seed a trace.
    BelowSeedIntensity,
}

/// Bounds a new interval would get after clipping its tolerance window
/// against its neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedBounds {
    New(MzInterval),
    /// Zero-width interval sitting on the low bound of the right neighbour.
    CollapseIntoRight,
    /// Anything else, means the partition was already inconsistent.
    Unresolved { low: f64, high: f64 },
}

/// Resolves the bounds of a new interval from its tolerance window and
/// the neighbours that intrude into it.
///
/// - `left` is the interval to the left of the seed whose high bound lies
///   past the window start (typically the one containing the window start).
/// - `right` is the interval to the right of the seed whose low bound lies
///   before or at the window end (typically the one containing the window end).
///
/// ```
/// use mzchrom::models::partition::{resolve_seed_bounds, MzInterval, SeedBounds};
/// use mzchrom::utils::TupleRange;
///
/// let window = TupleRange::try_new(99.99, 100.01).unwrap();
/// let right = MzInterval { low: 100.005, high: 100.02 };
/// assert_eq!(
///     resolve_seed_bounds(window, None, Some(right)),
///     SeedBounds::New(MzInterval { low: 99.99, high: 100.005 }),
/// );
/// ```
pub fn resolve_seed_bounds(
    window: TupleRange<f64>,
    left: Option<MzInterval>,
    right: Option<MzInterval>,
) -> SeedBounds {
    let low = left.map_or(window.start(), |x| x.high);
    let high = right.map_or(window.end(), |x| x.low);

    if low < high {
        SeedBounds::New(MzInterval { low, high })
    } else if low == high && right.is_some() {
        SeedBounds::CollapseIntoRight
    } else {
        SeedBounds::Unresolved { low, high }
    }
}

/// The set of live intervals and the traces they own.
///
/// Not synchronized, one partition belongs to one run.
#[derive(Debug, Default)]
pub struct IntervalPartition {
    by_low: BTreeMap<OrderedFloat<f64>, IntervalSlot>,
    traces: Vec<TraceAccumulator>,
}

impl IntervalPartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live intervals (and traces).
    pub fn len(&self) -> usize {
        self.by_low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_low.is_empty()
    }

    /// Interval containing `mz`, if any.
    pub fn containing(&self, mz: f64) -> Option<(MzInterval, TraceId)> {
        self.nearest_left(mz).filter(|(iv, _)| iv.contains(mz))
    }

    /// Interval with the largest low bound that is `<= mz`.
    ///
    /// Note that it might contain `mz`.
    pub fn nearest_left(&self, mz: f64) -> Option<(MzInterval, TraceId)> {
        self.by_low
            .range(..=OrderedFloat(mz))
            .next_back()
            .map(|(low, slot)| Self::unpack(*low, slot))
    }

    /// Interval with the smallest low bound that is `> mz`.
    pub fn nearest_right(&self, mz: f64) -> Option<(MzInterval, TraceId)> {
        self.by_low
            .range((Excluded(OrderedFloat(mz)), Unbounded))
            .next()
            .map(|(low, slot)| Self::unpack(*low, slot))
    }

    fn unpack(low: OrderedFloat<f64>, slot: &IntervalSlot) -> (MzInterval, TraceId) {
        (
            MzInterval {
                low: low.into_inner(),
                high: slot.high,
            },
            slot.trace,
        )
    }

    /// Registers a new interval owning `trace`.
    ///
    /// # Panics
    ///
    /// If the interval is empty or overlaps a live interval.
    pub fn insert(&mut self, interval: MzInterval, trace: TraceAccumulator) -> TraceId {
        assert!(
            interval.low < interval.high,
            "Attempted to insert an empty interval [{}, {})",
            interval.low,
            interval.high
        );
        if let Some((left, _)) = self.nearest_left(interval.low) {
            assert!(
                !left.overlaps(&interval),
                "Interval [{}, {}) overlaps its left neighbour [{}, {})",
                interval.low,
                interval.high,
                left.low,
                left.high
            );
        }
        if let Some((right, _)) = self.nearest_right(interval.low) {
            assert!(
                !right.overlaps(&interval),
                "Interval [{}, {}) overlaps its right neighbour [{}, {})",
                interval.low,
                interval.high,
                right.low,
                right.high
            );
        }

        let id = self.traces.len();
        self.traces.push(trace);
        self.by_low.insert(
            OrderedFloat(interval.low),
            IntervalSlot {
                high: interval.high,
                trace: id,
            },
        );
        id
    }

    pub fn trace(&self, id: TraceId) -> &TraceAccumulator {
        &self.traces[id]
    }

    fn trace_mut(&mut self, id: TraceId) -> &mut TraceAccumulator {
        &mut self.traces[id]
    }

    /// Assigns one observation to a trace, seeding a new one if needed.
    ///
    /// Observations have to be fed in decreasing intensity order for the
    /// per-scan "most intense wins" rule to hold.
    ///
    /// # Panics
    ///
    /// If the tolerance window does not contain the observation's m/z or
    /// the seed bounds cannot be resolved, see [`IntervalPartition::seed`].
    pub fn place(
        &mut self,
        scan: ScanPosition,
        observation: Observation,
        min_seed_intensity: f64,
        tolerance: &impl ToleranceWindow,
    ) -> Placement {
        if let Some((_, trace)) = self.containing(observation.mz) {
            let inserted = self.trace_mut(trace).insert(scan, observation);
            return Placement::Absorbed { trace, inserted };
        }

        if observation.intensity < min_seed_intensity {
            return Placement::BelowSeedIntensity;
        }

        let window = tolerance.mz_window(observation.mz);
        self.seed(scan, observation, window)
    }

    /// Starts a new trace at an observation no live interval contains.
    ///
    /// The new interval spans `window` clipped so it does not overlap its
    /// neighbours.
    ///
    /// # Panics
    ///
    /// - If `window` does not contain the observation's m/z.
    /// - If the observation is already contained in a live interval.
    /// - If the clipped bounds are inverted, or empty without a right
    ///   neighbour to collapse into.
    pub fn seed(
        &mut self,
        scan: ScanPosition,
        observation: Observation,
        window: TupleRange<f64>,
    ) -> Placement {
        let mz = observation.mz;
        assert!(
            window.contains(mz),
            "Tolerance window [{}, {}] does not contain the seed m/z {}",
            window.start(),
            window.end(),
            mz
        );

        let left = self.nearest_left(mz);
        if let Some((iv, _)) = left {
            assert!(!iv.contains(mz), "Seed m/z {} is already claimed", mz);
        }
        let left = left.filter(|(iv, _)| iv.high > window.start());
        let right = self
            .nearest_right(mz)
            .filter(|(iv, _)| iv.low <= window.end());

        let bounds = resolve_seed_bounds(window, left.map(|x| x.0), right.map(|x| x.0));
        match (bounds, right) {
            (SeedBounds::New(interval), _) => {
                let trace = TraceAccumulator::new(scan, observation);
                Placement::Seeded(self.insert(interval, trace))
            }
            (SeedBounds::CollapseIntoRight, Some((_, trace))) => {
                let inserted = self.trace_mut(trace).insert(scan, observation);
                Placement::Collapsed { trace, inserted }
            }
            (bounds, _) => panic!(
                "Unable to resolve interval bounds {:?} for seed m/z {} (window [{}, {}])",
                bounds,
                mz,
                window.start(),
                window.end()
            ),
        }
    }

    /// Live intervals with their traces, in ascending m/z order.
    pub fn iter(&self) -> impl Iterator<Item = (MzInterval, &TraceAccumulator)> + '_ {
        self.by_low.iter().map(move |(low, slot)| {
            let (iv, id) = Self::unpack(*low, slot);
            (iv, &self.traces[id])
        })
    }

    /// True if consecutive intervals are all non-empty and non-overlapping.
    pub fn is_disjoint(&self) -> bool {
        let intervals: Vec<MzInterval> = self.iter().map(|(iv, _)| iv).collect();
        intervals.iter().all(|x| x.low < x.high)
            && intervals.windows(2).all(|w| w[0].high <= w[1].low)
    }

    /// Consumes the partition, returning the traces in ascending
    /// interval order.
    pub fn into_traces(self) -> Vec<TraceAccumulator> {
        let mut slots: Vec<Option<TraceAccumulator>> =
            self.traces.into_iter().map(Some).collect();
        self.by_low
            .values()
            .filter_map(|slot| slots[slot.trace].take())
            .collect()
    }
}

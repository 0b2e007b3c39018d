use super::context::RunContext;
use super::continuity::{
    ContinuityFilter,
    Rejection,
    pad_gaps,
};
use super::observation_stream::ObservationStream;
use crate::config::BuilderConfig;
use crate::errors::Result;
use crate::models::chromatogram::Chromatogram;
use crate::models::partition::{
    IntervalPartition,
    Placement,
};
use crate::models::scan::{
    RawDataSource,
    Scan,
    ScanHeader,
    SelectsScans,
};
use crate::models::tolerance::{
    MzTolerance,
    ToleranceWindow,
};
use crate::models::trace::TraceAccumulator;
use serde::Serialize;
use std::fmt::Display;
use std::time::{
    Duration,
    Instant,
};
use tracing::{
    debug,
    info,
    trace,
};

/// Counters collected over one run.
///
/// Usually used for logging.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildStats {
    pub scans_selected: usize,
    pub empty_scans: usize,
    pub observations: usize,
    pub invalid_skipped: usize,
    pub absorbed: usize,
    pub duplicate_scan_discarded: usize,
    pub below_seed_discarded: usize,
    pub collapsed: usize,
    pub traces_created: usize,
    pub rejected_short_run: usize,
    pub rejected_few_points: usize,
    pub traces_kept: usize,
    pub padding_points: usize,
    pub elapsed: Duration,
}

impl Display for BuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Chromatogram Building Stats:")?;
        writeln!(
            f,
            "Scans selected: {} ({} empty)",
            self.scans_selected, self.empty_scans
        )?;
        writeln!(
            f,
            "Observations: {} ({} invalid skipped)",
            self.observations, self.invalid_skipped
        )?;
        writeln!(
            f,
            "Absorbed: {}, same scan duplicates: {}, below seed intensity: {}, collapsed: {}",
            self.absorbed, self.duplicate_scan_discarded, self.below_seed_discarded, self.collapsed
        )?;
        writeln!(
            f,
            "Traces created: {}, kept: {} (rejected short run: {}, too few points: {})",
            self.traces_created,
            self.traces_kept,
            self.rejected_short_run,
            self.rejected_few_points
        )?;
        writeln!(f, "Padding points added: {}", self.padding_points)?;
        writeln!(f, "Elapsed: {:.2?}", self.elapsed)?;
        Ok(())
    }
}

/// Result of a run over one raw data source.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub name: String,
    /// Headers of the selected scans, `points[i].scan_position` indexes here.
    pub scans: Vec<ScanHeader>,
    /// Kept chromatograms, ascending by mean m/z.
    pub chromatograms: Vec<Chromatogram>,
    pub stats: BuildStats,
}

/// Builds chromatograms from the scans of one raw data source at a time.
///
/// The tolerance policy is injected, [`ChromatogramBuilder::new`] uses the
/// one in the configuration.
///
/// ```
/// use mzchrom::{BuilderConfig, ChromatogramBuilder, MzTolerance, RunContext};
/// use mzchrom::models::scan::{Observation, RawDataSource, Scan};
///
/// let config = BuilderConfig {
///     tolerance: MzTolerance::Absolute((0.01, 0.01)),
///     min_seed_intensity: 100.0,
///     min_group_intensity: 0.0,
///     min_consecutive_scans: 2,
///     ..Default::default()
/// };
/// let source = RawDataSource {
///     name: "run_1".into(),
///     scans: vec![
///         Scan::new(1, 1.0, vec![Observation::new(100.0, 1000.0)]),
///         Scan::new(2, 2.0, vec![Observation::new(100.001, 900.0)]),
///     ],
/// };
/// let builder = ChromatogramBuilder::new(config).unwrap();
/// let out = builder.build(&source, &RunContext::new()).unwrap();
/// assert_eq!(out.chromatograms.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ChromatogramBuilder<T: ToleranceWindow = MzTolerance> {
    config: BuilderConfig,
    tolerance: T,
}

impl ChromatogramBuilder<MzTolerance> {
    pub fn new(config: BuilderConfig) -> Result<Self> {
        let tolerance = config.tolerance;
        Self::with_tolerance_policy(config, tolerance)
    }
}

impl<T: ToleranceWindow> ChromatogramBuilder<T> {
    /// Uses `tolerance` instead of the tolerance in `config`.
    pub fn with_tolerance_policy(config: BuilderConfig, tolerance: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tolerance })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Runs over a raw data source, selecting scans as configured.
    pub fn build(&self, source: &RawDataSource, ctx: &RunContext) -> Result<BuildOutput> {
        self.build_scans(&source.name, &source.scans, &self.config.scan_selection, ctx)
    }

    /// Runs over `scans`, selecting them with `selection`.
    ///
    /// # Errors
    ///
    /// Any [`DataReadingError`](crate::DataReadingError) of the scans, or
    /// [`MzChromError::Cancelled`](crate::MzChromError::Cancelled) if the
    /// run was cancelled. Nothing is returned in either case.
    #[tracing::instrument(level = "info", skip_all, fields(source = %name))]
    pub fn build_scans(
        &self,
        name: &str,
        scans: &[Scan],
        selection: &impl SelectsScans,
        ctx: &RunContext,
    ) -> Result<BuildOutput> {
        info!("Started chromatogram builder on {}", name);
        let start = Instant::now();
        ctx.check_cancelled()?;

        let stream = ObservationStream::from_scans(scans, selection)?;
        let (traces, mut stats) = self.build_traces(&stream, ctx)?;

        let chromatograms = traces
            .iter()
            .map(|x| Chromatogram::from_trace(x, &stream.scans))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        stats.elapsed = start.elapsed();
        ctx.advance_to(1.0);
        info!("Finished chromatogram builder on {}", name);
        info!("{}", stats);

        Ok(BuildOutput {
            name: name.to_string(),
            scans: stream.scans,
            chromatograms,
            stats,
        })
    }

    /// Partitions the stream into traces, filters and pads them.
    ///
    /// Kept traces come back sorted by mean m/z. Progress goes from 0 to
    /// 0.5 over the observations and from 0.5 to 1 over the traces, the
    /// cancellation flag is checked once per observation and once per
    /// trace.
    pub fn build_traces(
        &self,
        stream: &ObservationStream,
        ctx: &RunContext,
    ) -> Result<(Vec<TraceAccumulator>, BuildStats)> {
        let mut stats = BuildStats {
            scans_selected: stream.num_scans(),
            empty_scans: stream.num_empty_scans,
            observations: stream.len(),
            invalid_skipped: stream.num_invalid_skipped,
            ..Default::default()
        };

        let mut partition = IntervalPartition::new();
        let num_obs = stream.len().max(1) as f64;
        for (i, item) in stream.observations.iter().enumerate() {
            ctx.check_cancelled()?;
            ctx.advance_to(0.5 * i as f64 / num_obs);

            let placement = partition.place(
                item.scan,
                item.observation,
                self.config.min_seed_intensity,
                &self.tolerance,
            );
            match placement {
                Placement::Absorbed { inserted, .. } => {
                    stats.absorbed += 1;
                    if !inserted {
                        stats.duplicate_scan_discarded += 1;
                    }
                }
                Placement::Collapsed { inserted, .. } => {
                    stats.collapsed += 1;
                    if !inserted {
                        stats.duplicate_scan_discarded += 1;
                    }
                }
                Placement::Seeded(_) => stats.traces_created += 1,
                Placement::BelowSeedIntensity => stats.below_seed_discarded += 1,
            }
        }
        ctx.advance_to(0.5);
        debug!(
            "Partitioned {} observations into {} traces",
            stats.observations,
            partition.len()
        );

        let filter = ContinuityFilter::from_config(&self.config);
        let candidates = partition.into_traces();
        let num_candidates = candidates.len().max(1) as f64;
        let mut kept = Vec::new();
        for (i, mut candidate) in candidates.into_iter().enumerate() {
            ctx.check_cancelled()?;
            ctx.advance_to(0.5 + 0.5 * i as f64 / num_candidates);

            match filter.check(&candidate) {
                Ok(()) => {
                    stats.padding_points +=
                        pad_gaps(&mut candidate, stream.num_scans(), &self.config.padding);
                    kept.push(candidate);
                }
                Err(reason) => {
                    trace!(
                        "Rejected trace at m/z {:.4}: {}",
                        candidate.mean_mz(),
                        reason
                    );
                    match reason {
                        Rejection::ShortRun { .. } => stats.rejected_short_run += 1,
                        Rejection::TooFewPoints { .. } => stats.rejected_few_points += 1,
                    }
                }
            }
        }
        ctx.check_cancelled()?;

        kept.sort_by(|a, b| a.mean_mz().total_cmp(&b.mean_mz()));
        stats.traces_kept = kept.len();
        Ok((kept, stats))
    }
}

/// Builds the chromatograms of one raw data source with `config`.
pub fn build_chromatograms(
    source: &RawDataSource,
    config: &BuilderConfig,
    ctx: &RunContext,
) -> Result<BuildOutput> {
    ChromatogramBuilder::new(config.clone())?.build(source, ctx)
}

// Streaming aggregators used while traces are being filled. Values arrive
// one at a time and nothing gets buffered.

/// Running arithmetic mean of a stream of values.
///
/// # Example
///
/// ```
/// use mzchrom::utils::streaming_calculators::RunningMean;
///
/// let mut calc = RunningMean::default();
/// calc.add(100.0);
/// calc.add(100.002);
/// assert!((calc.mean().unwrap() - 100.001).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` until at least one value has been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Weighted running mean, updated incrementally.
///
/// Each new value moves the mean towards itself proportionally to its
/// share of the accumulated weight. Values with a zero, negative or NaN
/// weight are ignored.
///
/// # Example
///
/// ```
/// use mzchrom::utils::streaming_calculators::RunningStatsCalculator;
///
/// let mut calc = RunningStatsCalculator::default();
/// calc.add(1.0, 10.0);
/// calc.add(1.0, 0.0);
/// calc.add(2.0, 10.0);
/// // Equivalent to the mean of [10.0, 0.0, 10.0, 10.0]
/// assert!((calc.mean().unwrap() - 7.5).abs() < 1e-9);
/// ```
///
/// # Notes
///
/// The mean is squeezed into the observed min/max of the values, so
/// floating point drift cannot push it out of the range of its inputs.
///
/// # References
///
/// - <https://nestedsoftware.com/2018/03/27/calculating-standard-deviation-on-streaming-data-253l.23919.html>
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStatsCalculator {
    weight: f64,
    mean_n: f64,
    min: f64,
    max: f64,
}

impl RunningStatsCalculator {
    pub fn add(&mut self, weight: f64, value: f64) {
        if weight.is_nan() || weight <= 0.0 {
            return;
        }
        if self.weight == 0.0 {
            self.weight = weight;
            self.mean_n = value;
            self.min = value;
            self.max = value;
            return;
        }

        self.weight += weight;
        let weight_ratio = weight / self.weight;
        let delta = value - self.mean_n;
        self.mean_n += delta * weight_ratio;

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.mean_n = self.mean_n.min(self.max).max(self.min);
    }

    /// `None` while no positive weight has been accumulated.
    pub fn mean(&self) -> Option<f64> {
        if self.weight == 0.0 {
            return None;
        }
        Some(self.mean_n)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

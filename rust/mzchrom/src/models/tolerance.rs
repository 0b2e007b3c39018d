use crate::errors::DataProcessingError;
use crate::utils::TupleRange;
use serde::{
    Deserialize,
    Serialize,
};

/// Anything that can turn an m/z value into a closed acceptance window.
///
/// The chromatogram builder only ever talks to this trait, so any policy
/// (including a plain closure) can be injected.
///
/// Implementations must return a window that contains `mz` and has a
/// non-zero width, otherwise seeding a trace at that mass is impossible.
pub trait ToleranceWindow {
    fn mz_window(&self, mz: f64) -> TupleRange<f64>;
}

impl<F> ToleranceWindow for F
where
    F: Fn(f64) -> TupleRange<f64>,
{
    fn mz_window(&self, mz: f64) -> TupleRange<f64> {
        self(mz)
    }
}

/// M/z tolerance settings.
///
/// Convention:
/// In contrast with how some software defines tolerance, here we define the ranges
/// in terms of positive values. For instance, here a tolerance of (1,1) on a value
/// of 10 means a range of (9,11) while in some software the same range would be defined
/// as (-1,1).
///
/// Example:
/// ```
/// use mzchrom::MzTolerance;
/// use mzchrom::ToleranceWindow;
///
/// let tol = MzTolerance::Combined { da: 0.002, ppm: 10.0 };
/// // At 100 Da, 10 ppm is 0.001 Da, so the absolute part wins.
/// let window = tol.mz_window(100.0);
/// assert!((window.start() - 99.998).abs() < 1e-9);
/// assert!((window.end() - 100.002).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum MzTolerance {
    #[serde(rename = "da")]
    Absolute((f64, f64)),
    #[serde(rename = "ppm")]
    Ppm((f64, f64)),
    /// Symmetric window whose half width is the larger of the
    /// absolute and the relative tolerance at the given mass.
    #[serde(rename = "combined")]
    Combined { da: f64, ppm: f64 },
}

impl Default for MzTolerance {
    fn default() -> Self {
        MzTolerance::Combined {
            da: 0.002,
            ppm: 10.0,
        }
    }
}

impl MzTolerance {
    /// Calculate the m/z tolerance range.
    ///
    /// # Returns
    ///
    /// A `TupleRange<f64>` representing `[mz - tolerance_low, mz + tolerance_high]`.
    ///
    /// # Panics
    ///
    /// If the tolerance is negative or NaN, [`MzTolerance::validate`]
    /// rejects those at configuration time.
    pub fn mz_range(&self, mz: f64) -> TupleRange<f64> {
        let (low, high) = match *self {
            MzTolerance::Absolute((low, high)) => (low, high),
            MzTolerance::Ppm((low, high)) => (mz * low / 1e6, mz * high / 1e6),
            MzTolerance::Combined { da, ppm } => {
                let half_width = da.max(mz * ppm / 1e6);
                (half_width, half_width)
            }
        };
        (mz - low, mz + high).try_into().expect(
            "mz tolerance should never result in an invalid range, since low and high are positive",
        )
    }

    /// Checks that every window produced by this tolerance is non-empty.
    pub fn validate(&self) -> Result<(), DataProcessingError> {
        fn positive(name: &'static str, value: f64) -> Result<(), DataProcessingError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(DataProcessingError::InvalidParameter {
                    name,
                    value,
                    reason: "tolerance has to be a positive finite number",
                })
            }
        }

        match *self {
            MzTolerance::Absolute((low, high)) => {
                positive("tolerance.da.low", low)?;
                positive("tolerance.da.high", high)
            }
            MzTolerance::Ppm((low, high)) => {
                positive("tolerance.ppm.low", low)?;
                positive("tolerance.ppm.high", high)
            }
            MzTolerance::Combined { da, ppm } => {
                // One of the two may be zero, as long as the max is not.
                if !(da.is_finite() && ppm.is_finite()) || da < 0.0 || ppm < 0.0 {
                    return Err(DataProcessingError::InvalidParameter {
                        name: "tolerance.combined",
                        value: if da.is_finite() && da >= 0.0 { ppm } else { da },
                        reason: "tolerance components cannot be negative or infinite",
                    });
                }
                if da == 0.0 {
                    positive("tolerance.combined.ppm", ppm)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl ToleranceWindow for MzTolerance {
    fn mz_window(&self, mz: f64) -> TupleRange<f64> {
        self.mz_range(mz)
    }
}

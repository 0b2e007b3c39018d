use crate::errors::DataProcessingError;
use crate::models::scan::ScanSelection;
use crate::models::tolerance::MzTolerance;
use serde::{
    Deserialize,
    Serialize,
};

/// How many zero-intensity points flank the detection gaps of a kept trace.
///
/// Setting both counts to zero disables padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingConfig {
    /// Gaps narrower than this many scans are left alone.
    pub min_gap_width: u32,
    /// Zeros placed right before a detection that follows a gap.
    pub leading_zeros: u32,
    /// Zeros placed right after a detection that precedes a gap.
    pub trailing_zeros: u32,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            min_gap_width: 1,
            leading_zeros: 1,
            trailing_zeros: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub tolerance: MzTolerance,
    /// Observations below this intensity never start a new trace.
    pub min_seed_intensity: f64,
    /// Continuity threshold, only points at or above it count towards
    /// the consecutive scan run of a trace.
    pub min_group_intensity: f64,
    pub min_consecutive_scans: u32,
    /// Minimum number of detected points of a kept trace, 0 disables it.
    pub min_total_points: u32,
    pub padding: PaddingConfig,
    pub scan_selection: ScanSelection,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            tolerance: MzTolerance::default(),
            min_seed_intensity: 1e4,
            min_group_intensity: 1e3,
            min_consecutive_scans: 5,
            min_total_points: 0,
            padding: PaddingConfig::default(),
            scan_selection: ScanSelection::default(),
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<(), DataProcessingError> {
        self.tolerance.validate()?;
        non_negative("min_seed_intensity", self.min_seed_intensity)?;
        non_negative("min_group_intensity", self.min_group_intensity)?;
        if self.min_consecutive_scans == 0 {
            return Err(DataProcessingError::InvalidParameter {
                name: "min_consecutive_scans",
                value: 0.0,
                reason: "a trace needs at least one scan",
            });
        }
        if self.padding.min_gap_width == 0 {
            return Err(DataProcessingError::InvalidParameter {
                name: "padding.min_gap_width",
                value: 0.0,
                reason: "a gap is at least one scan wide",
            });
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), DataProcessingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DataProcessingError::InvalidParameter {
            name,
            value,
            reason: "intensity thresholds have to be finite and non-negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BuilderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let conf = BuilderConfig {
            min_seed_intensity: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            conf.validate(),
            Err(DataProcessingError::InvalidParameter {
                name: "min_seed_intensity",
                ..
            })
        ));

        let conf = BuilderConfig {
            min_consecutive_scans: 0,
            ..Default::default()
        };
        assert!(conf.validate().is_err());

        let conf = BuilderConfig {
            padding: PaddingConfig {
                min_gap_width: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(conf.validate().is_err());

        let conf = BuilderConfig {
            tolerance: MzTolerance::Absolute((0.0, 0.0)),
            ..Default::default()
        };
        assert!(conf.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let conf: BuilderConfig = serde_json::from_str(
            r#"{"tolerance": {"da": [0.01, 0.01]}, "min_consecutive_scans": 2, "padding": {"leading_zeros": 0}}"#,
        )
        .unwrap();
        assert_eq!(conf.tolerance, MzTolerance::Absolute((0.01, 0.01)));
        assert_eq!(conf.min_consecutive_scans, 2);
        assert_eq!(conf.min_seed_intensity, 1e4);
        assert_eq!(conf.padding.leading_zeros, 0);
        assert_eq!(conf.padding.trailing_zeros, 1);
    }
}

//! Filter thresholds, read from a TOML file.
//!
//! Every section and every key is optional; anything left out keeps its
//! default. A missing file means all defaults.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

/// Thresholds for dominant isoform switching.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisThresholds {
    /// Mean TPM an isoform must reach in a cluster to be dominant there.
    pub min_tpm: f64,
    /// Percentage of the cluster's cells that must express the isoform.
    pub min_percent_expressing: f64,
}

/// Thresholds for differential isoform expression between categories.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeThresholds {
    pub min_fold_change: f64,
    pub min_tpm: f64,
    pub min_percent_expressing: f64,
}

/// Thresholds for category-specific isoform expression.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CseThresholds {
    /// Selected categories must reach this TPM or `min_percent_expressing`.
    pub min_tpm: f64,
    pub min_percent_expressing: f64,
    /// Other categories must stay under this TPM or `max_percent_expressing`.
    pub max_tpm: f64,
    pub max_percent_expressing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterParams {
    pub dis: DisThresholds,
    pub de: DeThresholds,
    pub cse: CseThresholds,
}

const DEFAULT_PARAMETERS: FilterParams = FilterParams {
    dis: DisThresholds {
        min_tpm: 10.0,
        min_percent_expressing: 50.0,
    },
    de: DeThresholds {
        min_fold_change: 10.0,
        min_tpm: 10.0,
        min_percent_expressing: 50.0,
    },
    cse: CseThresholds {
        min_tpm: 10.0,
        min_percent_expressing: 75.0,
        max_tpm: 25.0,
        max_percent_expressing: 25.0,
    },
};

impl Default for DisThresholds {
    fn default() -> Self {
        DEFAULT_PARAMETERS.dis
    }
}

impl Default for DeThresholds {
    fn default() -> Self {
        DEFAULT_PARAMETERS.de
    }
}

impl Default for CseThresholds {
    fn default() -> Self {
        DEFAULT_PARAMETERS.cse
    }
}

macro_rules! warn_if_non_default {
    ($params:expr, $section:ident, $($field:ident),+) => {
        $(
            if DEFAULT_PARAMETERS.$section.$field != $params.$section.$field {
                warn!(
                    "using non-default {}.{} = {:?}",
                    stringify!($section),
                    stringify!($field),
                    $params.$section.$field
                );
            }
        )+
    };
}

impl FilterParams {
    /// Read thresholds from `path`, falling back to the defaults when the
    /// file does not exist.
    pub fn from_path(path: &Path) -> Result<FilterParams> {
        if !path.exists() {
            warn!(
                "could not find filter parameters at {}, falling back to defaults",
                path.display()
            );
            return Ok(FilterParams::default());
        }
        let s = std::fs::read_to_string(path).with_context(|| path.display().to_string())?;
        let params = FilterParams::from_toml(&s).with_context(|| path.display().to_string())?;
        info!("read filter parameters from {}", path.display());
        Ok(params)
    }

    pub fn from_toml(s: &str) -> Result<FilterParams> {
        let params: FilterParams = toml::from_str(s)?;
        params.warn_non_default();
        Ok(params)
    }

    fn warn_non_default(&self) {
        warn_if_non_default!(self, dis, min_tpm, min_percent_expressing);
        warn_if_non_default!(self, de, min_fold_change, min_tpm, min_percent_expressing);
        warn_if_non_default!(
            self,
            cse,
            min_tpm,
            min_percent_expressing,
            max_tpm,
            max_percent_expressing
        );
    }
}

/// A filter configuration that must not reach the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterConfigError {
    #[error("TPM cutoffs must be non-negative numbers")]
    NegativeTpm,

    #[error("Percent cutoffs must be numbers in range [0, 100]")]
    PercentOutOfRange,

    #[error("Min fold change cutoffs must be numbers ≥ 1")]
    FoldChangeBelowOne,

    #[error("Must select at least two categories to filter by differential isoform expression")]
    TooFewDeCategories,

    #[error("Must select at least one category to filter by category-specific isoform expression")]
    NoCseCategories,

    #[error("No category named {0:?} in the active label set")]
    UnknownCategory(String),
}

// NaN fails every comparison, so it is rejected along with out-of-range values.
fn check_tpm(v: f64) -> Result<(), FilterConfigError> {
    if v >= 0.0 {
        Ok(())
    } else {
        Err(FilterConfigError::NegativeTpm)
    }
}

fn check_percent(v: f64) -> Result<(), FilterConfigError> {
    if (0.0..=100.0).contains(&v) {
        Ok(())
    } else {
        Err(FilterConfigError::PercentOutOfRange)
    }
}

impl DisThresholds {
    pub fn validate(&self) -> Result<(), FilterConfigError> {
        check_tpm(self.min_tpm)?;
        check_percent(self.min_percent_expressing)
    }
}

impl DeThresholds {
    pub fn validate(&self) -> Result<(), FilterConfigError> {
        check_tpm(self.min_tpm)?;
        check_percent(self.min_percent_expressing)?;
        if self.min_fold_change >= 1.0 {
            Ok(())
        } else {
            Err(FilterConfigError::FoldChangeBelowOne)
        }
    }
}

impl CseThresholds {
    pub fn validate(&self) -> Result<(), FilterConfigError> {
        check_tpm(self.min_tpm)?;
        check_tpm(self.max_tpm)?;
        check_percent(self.min_percent_expressing)?;
        check_percent(self.max_percent_expressing)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_all_defaults() -> Result<()> {
        assert_eq!(FilterParams::from_toml("")?, DEFAULT_PARAMETERS);
        assert_eq!(FilterParams::default().cse.max_tpm, 25.0);
        Ok(())
    }

    #[test]
    fn partial_sections_keep_defaults() -> Result<()> {
        let params = FilterParams::from_toml(
            r#"
            [de]
            min_fold_change = 2.5

            [cse]
            max_percent_expressing = 10
            "#,
        )?;
        assert_eq!(params.de.min_fold_change, 2.5);
        assert_eq!(params.de.min_tpm, 10.0);
        assert_eq!(params.cse.max_percent_expressing, 10.0);
        assert_eq!(params.dis, DisThresholds::default());
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FilterParams::from_toml("[dis]\nmin_tmp = 3.0\n").is_err());
    }

    #[test]
    fn missing_file_falls_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let params = FilterParams::from_path(&dir.path().join("nope.toml"))?;
        assert_eq!(params, FilterParams::default());

        let path = dir.path().join("params.toml");
        std::fs::write(&path, "[dis]\nmin_tpm = 1\n")?;
        assert_eq!(FilterParams::from_path(&path)?.dis.min_tpm, 1.0);
        Ok(())
    }

    #[test]
    fn threshold_ranges() {
        assert_eq!(DisThresholds::default().validate(), Ok(()));
        let dis = DisThresholds {
            min_tpm: -1.0,
            ..Default::default()
        };
        assert_eq!(dis.validate(), Err(FilterConfigError::NegativeTpm));
        let de = DeThresholds {
            min_fold_change: 0.5,
            ..Default::default()
        };
        assert_eq!(de.validate(), Err(FilterConfigError::FoldChangeBelowOne));
        let cse = CseThresholds {
            max_percent_expressing: 100.5,
            ..Default::default()
        };
        assert_eq!(cse.validate(), Err(FilterConfigError::PercentOutOfRange));
        let cse = CseThresholds {
            max_tpm: f64::NAN,
            ..Default::default()
        };
        assert_eq!(cse.validate(), Err(FilterConfigError::NegativeTpm));
    }
}

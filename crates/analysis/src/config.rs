//! Typed evaluation settings.
//!
//! Settings are usually read from a TOML file:
//!
//! ```toml
//! model_path = "models/vit.bin"
//! device = "cpu"
//! batch_size = 64
//! test_fraction = 0.2
//! targets = ["theta_E", "e1", "e2"]
//!
//! [inspect]
//! batches = 2
//! samples_per_batch = 3
//! ```
//!
//! Only `model_path` and `batch_size` are required.

use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use lenseval_core::{Device, TargetError, TargetSet};
use serde::Deserialize;
use thiserror::Error;

use crate::inspect::InspectLimits;

/// Fraction of the dataset held out for evaluation when none is specified.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Errors that can occur when loading or validating a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("batch_size must be at least 1")]
    ZeroBatchSize,

    #[error("test_fraction must be in (0, 1], got {0}")]
    TestFraction(f64),

    #[error(transparent)]
    Targets(#[from] TargetError),

    #[error("{0}")]
    Device(String),
}

/// Settings for one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    model_path: PathBuf,
    device: Device,
    batch_size: NonZeroUsize,
    test_fraction: f64,
    targets: TargetSet,
    inspect: InspectLimits,
}

/// On-disk layout of a [`Config`], before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    model_path: PathBuf,
    #[serde(default)]
    device: Option<String>,
    batch_size: usize,
    #[serde(default)]
    test_fraction: Option<f64>,
    #[serde(default)]
    targets: Option<Vec<String>>,
    #[serde(default)]
    inspect: InspectLimits,
}

impl Config {
    /// Creates a config with the default device, targets, test fraction, and
    /// inspection limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBatchSize`] if `batch_size` is zero.
    pub fn new(model_path: impl Into<PathBuf>, batch_size: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            model_path: model_path.into(),
            device: Device::default(),
            batch_size: NonZeroUsize::new(batch_size).ok_or(ConfigError::ZeroBatchSize)?,
            test_fraction: DEFAULT_TEST_FRACTION,
            targets: TargetSet::default(),
            inspect: InspectLimits::default(),
        })
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or any setting is invalid.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(s)?;

        let mut config = Self::new(raw.model_path, raw.batch_size)?.with_inspect(raw.inspect);
        if let Some(device) = raw.device {
            config = config.with_device(device.parse().map_err(ConfigError::Device)?);
        }
        if let Some(fraction) = raw.test_fraction {
            config = config.with_test_fraction(fraction)?;
        }
        if let Some(names) = raw.targets {
            config = config.with_targets(TargetSet::new(names)?);
        }

        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Sets the device the model is placed on.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Sets the tracked targets.
    #[must_use]
    pub fn with_targets(mut self, targets: TargetSet) -> Self {
        self.targets = targets;
        self
    }

    /// Sets how much is shown by sample inspection.
    #[must_use]
    pub fn with_inspect(mut self, inspect: InspectLimits) -> Self {
        self.inspect = inspect;
        self
    }

    /// Sets the fraction of the dataset held out for evaluation.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < fraction <= 1`.
    pub fn with_test_fraction(mut self, fraction: f64) -> Result<Self, ConfigError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::TestFraction(fraction));
        }
        self.test_fraction = fraction;
        Ok(self)
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    #[must_use]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the number of samples per provider batch.
    #[must_use]
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    #[must_use]
    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    #[must_use]
    pub fn inspect(&self) -> InspectLimits {
        self.inspect
    }
}

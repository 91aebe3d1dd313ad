use std::{fmt, path::Path, str::FromStr};

use ndarray::{Array2, Array4, ArrayView4};

/// Where a model's parameters and activations live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// Host memory.
    #[default]
    Cpu,

    /// A CUDA device, by ordinal.
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    /// Parses `cpu`, `cuda` (ordinal 0) or `cuda:<ordinal>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|ordinal| ordinal.parse().ok())
                .map(Self::Cuda)
                .ok_or_else(|| format!("unrecognized device `{other}`")),
        }
    }
}

/// Whether a model behaves as during training or during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Train,
    Eval,
}

/// A batched image regressor.
///
/// A regressor maps a batch of images shaped `(batch, channels, height, width)`
/// to predictions shaped `(batch, outputs)`. Output columns are identified by
/// [`output_names`](Regressor::output_names), never by position alone.
///
/// Forward passes must be deterministic in [`Mode::Eval`], which makes repeated
/// evaluation passes over the same data reproducible.
pub trait Regressor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Names of the prediction columns, in column order.
    fn output_names(&self) -> &[String];

    /// Converts raw provider images into the model's expected input convention.
    ///
    /// The default passes images through unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the images cannot be converted.
    fn prepare(&self, images: ArrayView4<'_, f32>) -> Result<Array4<f32>, Self::Error> {
        Ok(images.to_owned())
    }

    /// Runs a forward pass over a prepared batch.
    ///
    /// # Errors
    ///
    /// Each regressor defines its own `Error` type for inference failures.
    fn forward(&self, images: &Array4<f32>) -> Result<Array2<f32>, Self::Error>;

    /// Moves the model to `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is unavailable.
    fn to_device(&mut self, device: Device) -> Result<(), Self::Error> {
        let _ = device;
        Ok(())
    }

    /// Switches between training and inference behavior.
    fn set_mode(&mut self, mode: Mode) {
        let _ = mode;
    }

    /// Frees device memory and any open handles.
    ///
    /// Called once when the owning session ends.
    fn release(&mut self) {}
}

/// A regressor that can be restored from a serialized artifact.
pub trait LoadRegressor: Regressor + Sized {
    /// Loads the model stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact is missing or malformed.
    fn load(path: &Path) -> Result<Self, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_devices() {
        assert_eq!("cpu".parse::<Device>(), Ok(Device::Cpu));
        assert_eq!("cuda".parse::<Device>(), Ok(Device::Cuda(0)));
        assert_eq!(" cuda:3 ".parse::<Device>(), Ok(Device::Cuda(3)));
        assert!("tpu".parse::<Device>().is_err());
        assert!("cuda:x".parse::<Device>().is_err());
    }

    #[test]
    fn device_display_round_trips() {
        for device in [Device::Cpu, Device::Cuda(1)] {
            assert_eq!(device.to_string().parse::<Device>(), Ok(device));
        }
    }
}

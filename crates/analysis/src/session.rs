//! Scoped ownership of a loaded model.

use std::{ops::Deref, path::Path};

use lenseval_core::{Device, LoadRegressor, Mode, Regressor};
use tracing::{debug, info};

/// A regressor placed on a device in evaluation mode.
///
/// The session acquires the model when it is created and releases it, through
/// [`Regressor::release`], when dropped.
#[derive(Debug)]
pub struct Session<M: Regressor> {
    model: M,
    device: Device,
}

impl<M: Regressor> Session<M> {
    /// Places an already constructed model on `device` and switches it to
    /// [`Mode::Eval`].
    ///
    /// The model is released even if placement fails.
    ///
    /// # Errors
    ///
    /// Returns the model's error if it cannot be moved to `device`.
    pub fn new(model: M, device: Device) -> Result<Self, M::Error> {
        let mut session = Self { model, device };
        session.model.to_device(device)?;
        session.model.set_mode(Mode::Eval);
        debug!(%device, outputs = ?session.model.output_names(), "session acquired");
        Ok(session)
    }

    /// Returns the device the model was placed on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: LoadRegressor> Session<M> {
    /// Loads the model stored at `path`, places it on `device`, and switches it
    /// to [`Mode::Eval`].
    ///
    /// A loaded model is released if placement fails.
    ///
    /// # Errors
    ///
    /// Returns the model's error if loading or device placement fails.
    pub fn open(path: impl AsRef<Path>, device: Device) -> Result<Self, M::Error> {
        let path = path.as_ref();
        let model = M::load(path)?;
        info!(path = %path.display(), %device, "loaded model");
        Self::new(model, device)
    }
}

impl<M: Regressor> Deref for Session<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M: Regressor> Drop for Session<M> {
    fn drop(&mut self) {
        self.model.release();
        debug!(device = %self.device, "session released");
    }
}

//! Evaluates a moment-based regressor on synthetic Einstein rings.
//!
//! ```text
//! cargo run -p lenseval-observers --features plot --example lensing -- compare theta_E
//! cargo run -p lenseval-observers --features plot --example lensing -- inspect
//! cargo run -p lenseval-observers --features plot --example lensing -- evaluate.toml compare e1
//! ```
//!
//! A config file must point `model_path` at an artifact named `moments`, such
//! as `models/moments.bin`. Set `RUST_LOG=debug` to see per-batch logging.

use std::{
    env,
    error::Error,
    path::{Path, PathBuf},
};

use lenseval_analysis::{Config, Evaluation, Session, test_loader};
use lenseval_core::{InMemoryDataset, LoadRegressor, Regressor, Sample};
use lenseval_observers::{
    ProgressObserver, ReportLog, ShowConfig, show_comparison, show_samples,
};
use ndarray::{Array2, Array3, Array4, ArrayView4, Axis, s};
use tracing_subscriber::EnvFilter;

const SIZE: usize = 32;
const PIXEL_SCALE: f32 = 0.1;
const RING_WIDTH: f32 = 1.2;

/// Renders a ring of radius `theta_e` sheared by `(e1, e2)`.
fn ring(theta_e: f32, e1: f32, e2: f32) -> Array3<f32> {
    let center = (SIZE as f32 - 1.0) / 2.0;
    let radius = theta_e / PIXEL_SCALE;
    Array3::from_shape_fn((1, SIZE, SIZE), |(_, row, col)| {
        let dx = col as f32 - center;
        let dy = row as f32 - center;
        let rho = ((1.0 - e1) * dx * dx + (1.0 + e1) * dy * dy - 2.0 * e2 * dx * dy)
            .max(0.0)
            .sqrt();
        (-(rho - radius).powi(2) / (2.0 * RING_WIDTH * RING_WIDTH)).exp()
    })
}

fn synthetic_dataset(n: usize) -> InMemoryDataset {
    (0..n)
        .map(|i| {
            let phase = i as f32;
            let theta_e = 0.6 + 0.5 * (0.5 + 0.5 * (phase * 0.37).sin());
            let e1 = 0.2 * (phase * 0.71).sin();
            let e2 = 0.2 * (phase * 1.13).cos();
            Sample::new(ring(theta_e, e1, e2), [("theta_E", theta_e), ("e1", e1), ("e2", e2)])
        })
        .collect()
}

/// Raised for artifacts that do not name the moment estimator.
#[derive(Debug, thiserror::Error)]
#[error("no moment estimator at {0}")]
struct UnknownArtifact(PathBuf);

/// Estimates the ring radius and ellipticity from second moments.
struct MomentRegressor {
    names: Vec<String>,
}

impl MomentRegressor {
    fn new() -> Self {
        Self {
            names: vec!["e1".into(), "e2".into(), "theta_E".into()],
        }
    }

    fn moments(image: ndarray::ArrayView2<'_, f32>) -> [f32; 3] {
        let center = (SIZE as f32 - 1.0) / 2.0;
        let (mut total, mut radius, mut qxx, mut qyy, mut qxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for ((row, col), &w) in image.indexed_iter() {
            let dx = col as f32 - center;
            let dy = row as f32 - center;
            total += w;
            radius += w * dx.hypot(dy);
            qxx += w * dx * dx;
            qyy += w * dy * dy;
            qxy += w * dx * dy;
        }
        let trace = (qxx + qyy).max(f32::EPSILON);
        [
            (qxx - qyy) / trace,
            2.0 * qxy / trace,
            radius / total.max(f32::EPSILON) * PIXEL_SCALE,
        ]
    }
}

impl Regressor for MomentRegressor {
    type Error = UnknownArtifact;

    fn output_names(&self) -> &[String] {
        &self.names
    }

    /// Suppresses the faint background outside the ring.
    fn prepare(&self, images: ArrayView4<'_, f32>) -> Result<Array4<f32>, UnknownArtifact> {
        Ok(images.mapv(|v| if v < 0.05 { 0.0 } else { v }))
    }

    fn forward(&self, images: &Array4<f32>) -> Result<Array2<f32>, UnknownArtifact> {
        let rows = images.len_of(Axis(0));
        let mut out = Array2::zeros((rows, self.names.len()));
        for i in 0..rows {
            let moments = Self::moments(images.slice(s![i, 0, .., ..]));
            out.row_mut(i).assign(&ndarray::arr1(&moments));
        }
        Ok(out)
    }
}

impl LoadRegressor for MomentRegressor {
    /// The estimator has no weights; any artifact named `moments` selects it.
    fn load(path: &Path) -> Result<Self, UnknownArtifact> {
        if path.file_stem().is_some_and(|stem| stem == "moments") {
            Ok(Self::new())
        } else {
            Err(UnknownArtifact(path.to_owned()))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config_path = args
        .first()
        .filter(|arg| Path::new(arg).extension().is_some_and(|ext| ext == "toml"))
        .cloned();
    let config = match config_path {
        Some(path) => {
            args.remove(0);
            Config::load(path)?
        }
        None => Config::new("models/moments.bin", 32)?,
    };

    let dataset = synthetic_dataset(2_000);
    let loader = test_loader(&dataset, &config);
    let session = Session::<MomentRegressor>::open(config.model_path(), config.device())?;

    let mut progress = ProgressObserver::new();
    let evaluation = Evaluation::observed(config, session, loader, &mut progress)?;

    match args.first().map(String::as_str) {
        Some("inspect") => {
            let mut log = ReportLog::new();
            evaluation.show_configured_samples(&mut log)?;
            let config = ShowConfig::new().title("Inspected samples").image_scale(6.0);
            show_samples(log.into_reports(), config)?;
        }
        Some("compare") | None => {
            let target = args.get(1).map_or("theta_E", String::as_str);
            let plot = evaluation.comparison(target)?;
            show_comparison(&plot, ShowConfig::new())?;
        }
        Some(other) => {
            return Err(format!("unknown mode `{other}`, expected `compare` or `inspect`").into());
        }
    }
    Ok(())
}

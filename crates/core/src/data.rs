use std::{collections::BTreeMap, error::Error as StdError, num::NonZeroUsize, ops::Range};

use ndarray::{Array2, Array3, Array4, ArrayView1, Axis};
use thiserror::Error;

use crate::Target;

/// A single labeled image.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Image shaped `(channels, height, width)`.
    pub image: Array3<f32>,

    /// Ground-truth value for each labeled target.
    pub targets: BTreeMap<Target, f32>,
}

impl Sample {
    /// Creates a sample from an image and `(target, value)` labels.
    pub fn new<I, T>(image: Array3<f32>, targets: I) -> Self
    where
        I: IntoIterator<Item = (T, f32)>,
        T: Into<Target>,
    {
        Self {
            image,
            targets: targets.into_iter().map(|(t, v)| (t.into(), v)).collect(),
        }
    }
}

/// Errors raised when indexing a dataset.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    #[error("sample index {index} out of range for dataset of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Errors raised when assembling a [`Batch`].
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("a batch must hold at least one sample")]
    Empty,

    #[error("image shape {found:?} does not match batch shape {expected:?}")]
    ImageShape {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("target `{target}` has shape {found:?}, expected {expected:?}")]
    TargetShape {
        target: Target,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("sample {index} is labeled with a different set of targets")]
    TargetKeys { index: usize },

    #[error("dataset error: {0}")]
    Dataset(#[source] Box<dyn StdError + Send + Sync>),
}

/// A group of samples processed together in one forward pass.
///
/// Every target column is shaped `(len, 1)`, one singleton vector per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    images: Array4<f32>,
    targets: BTreeMap<Target, Array2<f32>>,
}

impl Batch {
    /// Creates a batch from stacked images and per-target truth columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty or a target column is not shaped
    /// `(images.len_of(Axis(0)), 1)`.
    pub fn new(
        images: Array4<f32>,
        targets: BTreeMap<Target, Array2<f32>>,
    ) -> Result<Self, BatchError> {
        let len = images.len_of(Axis(0));
        if len == 0 {
            return Err(BatchError::Empty);
        }

        for (target, column) in &targets {
            if column.dim() != (len, 1) {
                return Err(BatchError::TargetShape {
                    target: target.clone(),
                    expected: (len, 1),
                    found: column.dim(),
                });
            }
        }

        Ok(Self { images, targets })
    }

    /// Stacks samples into a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is empty, if image shapes differ, or if
    /// samples are labeled with different targets.
    pub fn stack(samples: &[Sample]) -> Result<Self, BatchError> {
        let first = samples.first().ok_or(BatchError::Empty)?;

        for sample in samples {
            if sample.image.shape() != first.image.shape() {
                return Err(BatchError::ImageShape {
                    expected: first.image.shape().to_vec(),
                    found: sample.image.shape().to_vec(),
                });
            }
        }
        if let Some(index) = samples
            .iter()
            .position(|s| !s.targets.keys().eq(first.targets.keys()))
        {
            return Err(BatchError::TargetKeys { index });
        }

        let views: Vec<_> = samples.iter().map(|s| s.image.view()).collect();
        let images = ndarray::stack(Axis(0), &views).map_err(|_| BatchError::ImageShape {
            expected: first.image.shape().to_vec(),
            found: Vec::new(),
        })?;

        let targets = first
            .targets
            .keys()
            .map(|target| {
                let column = Array2::from_shape_fn((samples.len(), 1), |(i, _)| {
                    samples[i].targets[target]
                });
                (target.clone(), column)
            })
            .collect();

        Self::new(images, targets)
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len_of(Axis(0))
    }

    /// Always `false`; a batch holds at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the stacked images, shaped `(batch, channels, height, width)`.
    #[must_use]
    pub fn images(&self) -> &Array4<f32> {
        &self.images
    }

    /// Returns the ground-truth values for `target`, one per sample.
    #[must_use]
    pub fn truth(&self, target: &str) -> Option<ArrayView1<'_, f32>> {
        self.targets.get(target).map(|column| column.column(0))
    }
}

/// A finite, ordered source of batches.
///
/// Each call to [`batches`](DataProvider::batches) starts a fresh pass.
pub trait DataProvider {
    type Error: StdError + Send + Sync + 'static;

    /// Total number of samples yielded by one full pass.
    fn len(&self) -> usize;

    /// Returns `true` if a pass yields no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of batches yielded by one full pass.
    fn batch_count(&self) -> usize;

    /// Starts a pass over the data.
    fn batches(&self) -> impl Iterator<Item = Result<Batch, Self::Error>> + '_;
}

/// An indexable collection of samples.
pub trait Dataset {
    type Error: StdError + Send + Sync + 'static;

    /// Returns the number of samples.
    fn len(&self) -> usize;

    /// Returns `true` if the dataset holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the sample at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the sample cannot be read.
    fn get(&self, index: usize) -> Result<Sample, Self::Error>;
}

/// A dataset held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryDataset {
    samples: Vec<Sample>,
}

impl InMemoryDataset {
    #[must_use]
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }
}

impl FromIterator<Sample> for InMemoryDataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Dataset for InMemoryDataset {
    type Error = SampleError;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<Sample, SampleError> {
        self.samples
            .get(index)
            .cloned()
            .ok_or(SampleError::OutOfRange {
                index,
                len: self.samples.len(),
            })
    }
}

/// A contiguous view into another dataset.
#[derive(Debug)]
pub struct Subset<'a, D> {
    dataset: &'a D,
    range: Range<usize>,
}

/// Indices are relative to the start of the subset; an index past its end is
/// reported against the subset's own length.
impl<D> Dataset for Subset<'_, D>
where
    D: Dataset,
    D::Error: From<SampleError>,
{
    type Error = D::Error;

    fn len(&self) -> usize {
        self.range.len()
    }

    fn get(&self, index: usize) -> Result<Sample, D::Error> {
        if index >= self.range.len() {
            return Err(SampleError::OutOfRange {
                index,
                len: self.range.len(),
            }
            .into());
        }
        self.dataset.get(self.range.start + index)
    }
}

/// Splits a dataset into leading train and trailing test subsets.
///
/// The test subset holds `round(len * test_fraction)` samples, clamped to the
/// dataset length. The split is deterministic.
pub fn train_test_split<D: Dataset>(
    dataset: &D,
    test_fraction: f64,
) -> (Subset<'_, D>, Subset<'_, D>) {
    let len = dataset.len();

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let n_test = ((len as f64 * test_fraction.clamp(0.0, 1.0)).round() as usize).min(len);
    let split = len - n_test;

    (
        Subset {
            dataset,
            range: 0..split,
        },
        Subset {
            dataset,
            range: split..len,
        },
    )
}

/// Batches a dataset in index order, without shuffling.
///
/// The final batch is shorter when the dataset length is not a multiple of the
/// batch size.
#[derive(Debug)]
pub struct DataLoader<D> {
    dataset: D,
    batch_size: NonZeroUsize,
}

impl<D: Dataset> DataLoader<D> {
    pub fn new(dataset: D, batch_size: NonZeroUsize) -> Self {
        Self {
            dataset,
            batch_size,
        }
    }

    /// Returns the number of samples per batch.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    fn load(&self, range: Range<usize>) -> Result<Batch, BatchError> {
        let samples = range
            .map(|i| self.dataset.get(i))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| BatchError::Dataset(Box::new(err)))?;
        Batch::stack(&samples)
    }
}

impl<D: Dataset> DataProvider for DataLoader<D> {
    type Error = BatchError;

    fn len(&self) -> usize {
        self.dataset.len()
    }

    fn batch_count(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size.get())
    }

    fn batches(&self) -> impl Iterator<Item = Result<Batch, BatchError>> + '_ {
        let len = self.dataset.len();
        let size = self.batch_size.get();
        (0..len)
            .step_by(size)
            .map(move |start| self.load(start..(start + size).min(len)))
    }
}

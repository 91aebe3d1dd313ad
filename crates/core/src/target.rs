use std::{borrow::Borrow, fmt};

use thiserror::Error;

/// A named scalar quantity predicted per sample, such as `theta_E`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Target(String);

impl Target {
    /// Creates a target from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the target's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Target {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Errors that can occur when building a [`TargetSet`] or [`OutputIndex`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("at least one target must be tracked")]
    Empty,

    #[error("target `{0}` is listed more than once")]
    Duplicate(Target),

    #[error("model has no output named `{0}`")]
    MissingOutput(Target),
}

/// The fixed, ordered set of targets an evaluation tracks.
///
/// The set is validated once at construction and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    targets: Vec<Target>,
}

impl TargetSet {
    /// Creates a target set from names, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if no names are given or a name repeats.
    pub fn new<I, T>(names: I) -> Result<Self, TargetError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let mut targets: Vec<Target> = Vec::new();
        for target in names.into_iter().map(Into::into) {
            if targets.contains(&target) {
                return Err(TargetError::Duplicate(target));
            }
            targets.push(target);
        }

        if targets.is_empty() {
            return Err(TargetError::Empty);
        }

        Ok(Self { targets })
    }

    /// Returns `true` if `name` is a tracked target.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.targets.iter().any(|t| t.name() == name)
    }

    /// Returns the number of tracked targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always `false`; a target set holds at least one target.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterates over the targets in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }
}

impl Default for TargetSet {
    /// The Einstein radius and the two ellipticity components.
    fn default() -> Self {
        Self {
            targets: ["theta_E", "e1", "e2"].into_iter().map(Target::new).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A validated mapping from each tracked target to its model output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputIndex {
    columns: Vec<(Target, usize)>,
}

impl OutputIndex {
    /// Resolves every target in `targets` against the model's output names.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::MissingOutput`] for the first target that has no
    /// output of the same name.
    pub fn new(targets: &TargetSet, output_names: &[String]) -> Result<Self, TargetError> {
        let columns = targets
            .iter()
            .map(|target| {
                output_names
                    .iter()
                    .position(|name| name == target.name())
                    .map(|column| (target.clone(), column))
                    .ok_or_else(|| TargetError::MissingOutput(target.clone()))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { columns })
    }

    /// Returns the output column for `target`, if it is tracked.
    #[must_use]
    pub fn column(&self, target: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(t, _)| t.name() == target)
            .map(|(_, column)| *column)
    }

    /// Iterates over `(target, column)` pairs in target-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&Target, usize)> {
        self.columns.iter().map(|(target, column)| (target, *column))
    }

    /// Returns the largest column index referenced.
    #[must_use]
    pub fn max_column(&self) -> usize {
        self.columns.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }
}

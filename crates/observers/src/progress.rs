use indicatif::{ProgressBar, ProgressStyle};
use lenseval_analysis::aggregate::{Action, Event};
use lenseval_core::Observer;

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} samples ({eta}) {msg}";

/// Draws a progress bar while an aggregation pass absorbs batches.
///
/// The bar length follows the provider's sample count, taken from each
/// [`Event`], and the bar finishes once every sample has been seen.
///
/// # Example
///
/// ```ignore
/// let mut progress = ProgressObserver::new();
/// let solution = aggregate::aggregate(&model, &loader, &targets, &mut progress)?;
/// ```
#[derive(Clone)]
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    /// Creates an observer that draws to stderr.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE)
                .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-")),
        );
        Self { bar }
    }

    /// Creates an observer that tracks progress without drawing.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Returns the underlying bar.
    #[must_use]
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    fn record(&self, event: &Event) {
        self.bar.set_length(event.total as u64);
        self.bar.set_position(event.samples_seen as u64);
        self.bar.set_message(format!("batch {}", event.batch + 1));

        if event.samples_seen >= event.total {
            self.bar.finish_with_message("done");
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer<Event, Action> for ProgressObserver {
    fn observe(&mut self, event: &Event) -> Option<Action> {
        self.record(event);
        None
    }
}

/// Allows `&mut ProgressObserver` to be passed to passes that take an observer
/// by value, so the bar can be inspected after the pass completes.
impl Observer<Event, Action> for &mut ProgressObserver {
    fn observe(&mut self, event: &Event) -> Option<Action> {
        (*self).observe(event)
    }
}

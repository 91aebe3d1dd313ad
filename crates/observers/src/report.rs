use lenseval_analysis::inspect::{Action, SampleReport};
use lenseval_core::Observer;
use tracing::debug;

/// Prints sample inspection reports and keeps them for display.
///
/// Each report's lines are written to stdout in the order they arrive; the
/// reports themselves are retained so a display surface can show the images
/// afterwards. Pass `&mut ReportLog` to keep ownership across the pass.
#[derive(Debug, Default)]
pub struct ReportLog {
    reports: Vec<SampleReport>,
    quiet: bool,
    limit: Option<usize>,
}

impl ReportLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects reports without printing them.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Stops the pass once `limit` reports have been collected.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the collected reports in arrival order.
    #[must_use]
    pub fn reports(&self) -> &[SampleReport] {
        &self.reports
    }

    /// Consumes the log, returning the collected reports.
    #[must_use]
    pub fn into_reports(self) -> Vec<SampleReport> {
        self.reports
    }
}

impl Observer<SampleReport, Action> for ReportLog {
    fn observe(&mut self, report: &SampleReport) -> Option<Action> {
        if !self.quiet {
            println!("batch {}, sample {}", report.batch, report.sample);
            println!("{report}");
        }
        debug!(batch = report.batch, sample = report.sample, "collected report");

        self.reports.push(report.clone());
        match self.limit {
            Some(limit) if self.reports.len() >= limit => Some(Action::StopEarly),
            _ => None,
        }
    }
}

impl Observer<SampleReport, Action> for &mut ReportLog {
    fn observe(&mut self, report: &SampleReport) -> Option<Action> {
        (*self).observe(report)
    }
}

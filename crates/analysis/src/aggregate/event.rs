/// Event emitted by an aggregation pass after each batch is absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Zero-based batch number.
    pub batch: usize,

    /// Number of samples in this batch.
    pub batch_len: usize,

    /// Samples absorbed so far, including this batch.
    pub samples_seen: usize,

    /// Samples the provider reports for a full pass.
    pub total: usize,
}

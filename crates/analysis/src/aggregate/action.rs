/// Control actions supported by an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current batch and return the values collected so far.
    StopEarly,
}

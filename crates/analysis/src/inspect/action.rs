/// Control actions supported by an inspection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop without inspecting further samples.
    StopEarly,
}

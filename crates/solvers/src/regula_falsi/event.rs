use super::Bracket;

/// Control actions supported by the regula falsi solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop and return the current candidate.
    StopEarly,
}

/// Event emitted for each candidate level.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Iteration counter, starting at 1.
    pub iter: usize,
    /// Bracket the candidate was interpolated from.
    pub bracket: &'a Bracket,
    /// Candidate level.
    pub level: f64,
    /// Volume held at the candidate level.
    pub volume: f64,
}

/// Watches a regula falsi run one candidate at a time.
///
/// The cross-check tests use observers to assert that each candidate lies
/// inside its bracket, and to cut a run short with [`Action::StopEarly`]
/// when only the first few steps matter. Any `FnMut(&Event<'_>) ->
/// Option<Action>` closure is an observer; `()` watches nothing.
pub trait Observer {
    /// Inspects one candidate and optionally tells the solver what to do.
    fn observe(&mut self, event: &Event<'_>) -> Option<Action>;
}

impl<F> Observer for F
where
    F: FnMut(&Event<'_>) -> Option<Action>,
{
    fn observe(&mut self, event: &Event<'_>) -> Option<Action> {
        self(event)
    }
}

impl Observer for () {
    fn observe(&mut self, _event: &Event<'_>) -> Option<Action> {
        None
    }
}

use crate::envelope::ActionEnvelope;
use crate::types::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Win,
    Lose,
}

/// A single-threaded, tick-driven simulation that an external driver advances.
///
/// Implementations own their clock: every call to [`Game::step`] is exactly one
/// logical step regardless of how much wall-clock time passed between calls.
pub trait Game: Sized {
    type Config: Clone;
    type Action: Clone;
    type Observation: Clone;
    type Event: Clone;

    fn new(config: Self::Config, seed: u64) -> Self;

    /// Apply `actions` in order, then advance one tick.
    fn step(&mut self, actions: &[ActionEnvelope<Self::Action>], out_events: &mut Vec<Self::Event>);

    fn observe(&self) -> Self::Observation;

    fn is_terminal(&self) -> Option<TerminalOutcome>;

    /// Return to the initial playing state. Must be accepted in any state.
    fn reset(&mut self);

    /// Ticks advanced since creation or the last reset.
    fn tick_count(&self) -> Tick;
}

use sim_core::{ActionEnvelope, Game, TerminalOutcome, Tick};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub events: Vec<G::Event>,
}

/// Drives a [`Game`] one tick per call and feeds it actions scheduled for that tick.
///
/// This is the "frame scheduler" seat: a UI shell calls [`MatchHost::step_one_tick`]
/// once per frame, a headless tool calls [`MatchHost::run_for_ticks`].
pub struct MatchHost<G: Game> {
    game: G,
    current_tick: Tick,
    pending_actions: BTreeMap<Tick, Vec<ActionEnvelope<G::Action>>>,
}

impl<G: Game> MatchHost<G> {
    pub fn new(config: G::Config, seed: u64) -> Self {
        Self {
            game: G::new(config, seed),
            current_tick: 0,
            pending_actions: BTreeMap::new(),
        }
    }

    /// Submit an action to be executed at the given tick.
    /// If `intended_tick` is in the past or current, schedules for the next tick.
    /// Returns the actual tick the action was scheduled for.
    pub fn submit(&mut self, mut action: ActionEnvelope<G::Action>) -> Tick {
        let scheduled_tick = if action.intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            action.intended_tick
        };

        action.intended_tick = scheduled_tick;
        self.pending_actions
            .entry(scheduled_tick)
            .or_default()
            .push(action);

        scheduled_tick
    }

    pub fn run_for_ticks(&mut self, max_ticks: Tick) -> RunResult<G> {
        let mut all_events = Vec::new();

        for _ in 0..max_ticks {
            match self.step_one_tick() {
                Some(tick_events) => all_events.extend(tick_events),
                None => break,
            }
        }

        RunResult {
            outcome: self.game.is_terminal(),
            final_tick: self.current_tick,
            events: all_events,
        }
    }

    /// Advance by one tick. Returns None if the game is already terminal,
    /// otherwise the events from this tick.
    pub fn step_one_tick(&mut self) -> Option<Vec<G::Event>> {
        if self.game.is_terminal().is_some() {
            return None;
        }

        self.current_tick += 1;

        let mut actions = self
            .pending_actions
            .remove(&self.current_tick)
            .unwrap_or_default();

        // Sort by (source, action_id) for determinism
        actions.sort_by_key(|a| (a.source, a.action_id));

        let mut tick_events = Vec::new();
        self.game.step(&actions, &mut tick_events);

        Some(tick_events)
    }

    /// Start a fresh match on the same game instance. Pending actions are dropped.
    pub fn reset(&mut self) {
        let dropped: usize = self.pending_actions.values().map(Vec::len).sum();
        if dropped > 0 {
            tracing::debug!(dropped, "discarding pending actions on reset");
        }
        self.pending_actions.clear();
        self.current_tick = 0;
        self.game.reset();
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn observe(&self) -> G::Observation {
        self.game.observe()
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn pending_len(&self) -> usize {
        self.pending_actions.values().map(Vec::len).sum()
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}

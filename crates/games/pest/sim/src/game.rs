use crate::actions::PestAction;
use crate::config::PestConfig;
use crate::economy::Economy;
use crate::error::PlacementError;
use crate::events::{MatchEvent, TickOutcome};
use crate::state::PestState;
use crate::systems;
use crate::world::{EmplacementId, EntityStore};
use pest_types::{EmplacementKind, MatchState, PestObservation};
use sim_core::{ActionEnvelope, Game, TerminalOutcome, Tick};
use tracing::{debug, info};

/// One match of pest defense. Owns all state; advanced only by [`PestMatch::tick`].
pub struct PestMatch {
    state: PestState,
    /// Placement results waiting to be reported by the next tick.
    pending: Vec<MatchEvent>,
}

impl PestMatch {
    /// Expects a config that passes [`PestConfig::validate`]; zero intervals
    /// would divide by zero mid-match.
    pub fn new(config: PestConfig, seed: u64) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid pest config");
        Self {
            state: PestState::new(config, seed),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &PestState {
        &self.state
    }

    pub fn config(&self) -> &PestConfig {
        &self.state.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.state.store
    }

    pub fn light(&self) -> u32 {
        self.state.economy.light()
    }

    pub fn wave(&self) -> u32 {
        self.state.waves.wave()
    }

    pub fn match_state(&self) -> MatchState {
        self.state.state
    }

    pub fn tick_count(&self) -> Tick {
        self.state.tick
    }

    /// Build an emplacement. A rejected request changes nothing.
    pub fn place(
        &mut self,
        row: u32,
        col: u32,
        kind: EmplacementKind,
    ) -> Result<EmplacementId, PlacementError> {
        let result = systems::try_place(&mut self.state, row, col, kind);
        match result {
            Ok(id) => self.pending.push(MatchEvent::EmplacementPlaced { id, row, col, kind }),
            Err(reason) => {
                debug!(row, col, ?kind, %reason, "placement rejected");
                self.pending.push(MatchEvent::PlacementRejected {
                    row,
                    col,
                    kind,
                    reason,
                });
            }
        }
        result
    }

    /// Advance exactly one logical step. Does nothing once the match is over.
    pub fn tick(&mut self) -> TickOutcome {
        let mut events = std::mem::take(&mut self.pending);
        if self.state.state.is_terminal() {
            return self.outcome(events);
        }

        let state = &mut self.state;
        state.tick += 1;
        state.waves.advance_clock();
        systems::regen(state, &mut events);

        // Only entities that existed before this tick get to act in it.
        let roster = state.store.roster();
        systems::spawn_invaders(state, &mut events);
        systems::emplacement_actions(state, &roster.emplacements, &mut events);
        systems::invader_actions(state, &roster.invaders, &mut events);
        if state.state == MatchState::Playing {
            systems::projectile_actions(state, &roster.projectiles, &mut events);
        }
        systems::collect_garbage(state, &mut events);
        systems::check_wave_complete(state, &mut events);

        if state.state.is_terminal() {
            info!(
                tick = state.tick,
                wave = state.waves.wave(),
                state = ?state.state,
                "match ended"
            );
            events.push(MatchEvent::MatchEnded { state: state.state });
        }

        self.outcome(events)
    }

    /// Back to a fresh wave-1 match with starting light. Accepted in any state.
    pub fn reset(&mut self) {
        let state = &mut self.state;
        state.store.clear();
        state.economy = Economy::new(state.config.starting_light);
        state.waves.reset();
        state.tick = 0;
        state.state = MatchState::Playing;
        self.pending.clear();
        self.pending.push(MatchEvent::MatchReset);
        info!("match reset");
    }

    pub fn observe(&self) -> PestObservation {
        crate::observe::build_observation(&self.state)
    }

    fn outcome(&self, events: Vec<MatchEvent>) -> TickOutcome {
        TickOutcome {
            tick: self.state.tick,
            events,
            light: self.state.economy.light(),
            wave: self.state.waves.wave(),
            state: self.state.state,
        }
    }
}

impl Game for PestMatch {
    type Config = PestConfig;
    type Action = PestAction;
    type Observation = PestObservation;
    type Event = MatchEvent;

    fn new(config: Self::Config, seed: u64) -> Self {
        PestMatch::new(config, seed)
    }

    fn step(
        &mut self,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        for action in actions {
            match action.payload {
                PestAction::Place { row, col, kind } => {
                    // Reported through the event stream.
                    let _ = self.place(row, col, kind);
                }
            }
        }
        out_events.extend(self.tick().events);
    }

    fn observe(&self) -> Self::Observation {
        PestMatch::observe(self)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        match self.state.state {
            MatchState::Playing => None,
            MatchState::GameOver => Some(TerminalOutcome::Lose),
            MatchState::Victory => Some(TerminalOutcome::Win),
        }
    }

    fn reset(&mut self) {
        PestMatch::reset(self)
    }

    fn tick_count(&self) -> Tick {
        self.state.tick
    }
}

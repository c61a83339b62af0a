use crate::types::{ActionId, Tick};

/// Who asked for an action.
///
/// A human player and an automated placement policy go through the same
/// action surface; the source only matters for ordering and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionSource {
    Player,
    Policy,
}

#[derive(Clone, Debug)]
pub struct ActionEnvelope<A> {
    pub source: ActionSource,
    pub action_id: ActionId,
    pub intended_tick: Tick,
    pub payload: A,
}

impl<A> ActionEnvelope<A> {
    pub fn from_player(action_id: ActionId, intended_tick: Tick, payload: A) -> Self {
        Self {
            source: ActionSource::Player,
            action_id,
            intended_tick,
            payload,
        }
    }

    pub fn from_policy(action_id: ActionId, intended_tick: Tick, payload: A) -> Self {
        Self {
            source: ActionSource::Policy,
            action_id,
            intended_tick,
            payload,
        }
    }
}

//! Tick-driven simulation core for the pest defense mini-game.
//!
//! A [`PestMatch`] owns the whole board. Drivers call [`PestMatch::place`] for
//! player or policy input and [`PestMatch::tick`] once per logical step, then
//! poll the returned [`TickOutcome`] or [`PestMatch::observe`].

pub mod actions;
pub mod config;
pub mod economy;
pub mod error;
pub mod events;
pub mod game;
pub mod grid;
pub mod observe;
pub mod state;
pub mod systems;
pub mod waves;
pub mod world;

pub use actions::PestAction;
pub use config::PestConfig;
pub use error::{ConfigError, PlacementError};
pub use events::{
    IncomeSource, MatchEvent, Removal, RemovalCause, RemovedEntity, Spawned, TickOutcome,
};
pub use game::PestMatch;
pub use grid::Grid;
pub use world::{EmplacementId, EntityStore, InvaderId, ProjectileId};

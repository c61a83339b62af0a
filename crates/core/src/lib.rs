pub mod envelope;
pub mod game;
pub mod types;

pub use envelope::{ActionEnvelope, ActionSource};
pub use game::{Game, TerminalOutcome};
pub use types::{ActionId, Tick};

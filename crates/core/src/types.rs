/// Logical simulation step counter. One call to `Game::step` advances it by one.
pub type Tick = u64;

/// Per-source sequence number used to order actions scheduled for the same tick.
pub type ActionId = u64;

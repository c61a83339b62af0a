use crate::error::PlacementError;
use crate::world::{EmplacementId, InvaderId, ProjectileId};
use pest_types::{EmplacementKind, InvaderKind, MatchState, ProjectileKind};
use sim_core::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalCause {
    /// Invader hp reached zero.
    Killed,
    /// Projectile hit something or left the board.
    Expired,
    /// Emplacement was chewed down by besieging invaders.
    Sieged,
    /// Invader crossed the defended boundary.
    Breached,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RemovedEntity {
    Emplacement {
        id: EmplacementId,
        kind: EmplacementKind,
        row: u32,
        col: u32,
    },
    Invader {
        id: InvaderId,
        kind: InvaderKind,
        row: u32,
        x: f32,
    },
    Projectile {
        id: ProjectileId,
        kind: ProjectileKind,
        row: u32,
        x: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Removal {
    pub entity: RemovedEntity,
    pub cause: RemovalCause,
}

impl Removal {
    /// A boss slug went down. Shells use this for the big screen-shake cue.
    pub fn is_boss_kill(&self) -> bool {
        matches!(
            (&self.entity, self.cause),
            (
                RemovedEntity::Invader {
                    kind: InvaderKind::BossSlug,
                    ..
                },
                RemovalCause::Killed
            )
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Spawned {
    Invader {
        id: InvaderId,
        kind: InvaderKind,
        row: u32,
        x: f32,
    },
    Projectile {
        id: ProjectileId,
        kind: ProjectileKind,
        row: u32,
        x: f32,
        source: EmplacementId,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IncomeSource {
    Regen,
    LampIncome,
    WaveClear,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatchEvent {
    EmplacementPlaced {
        id: EmplacementId,
        row: u32,
        col: u32,
        kind: EmplacementKind,
    },
    PlacementRejected {
        row: u32,
        col: u32,
        kind: EmplacementKind,
        reason: PlacementError,
    },
    Spawned(Spawned),
    Removed(Removal),
    /// A projectile landed. `crit` is a UV beam on a wet target.
    ProjectileImpact {
        projectile: ProjectileId,
        invader: InvaderId,
        damage: i32,
        crit: bool,
    },
    FlytrapFed {
        flytrap: EmplacementId,
        invader: InvaderId,
        damage: i32,
    },
    SiegeStrike {
        invader: InvaderId,
        emplacement: EmplacementId,
        damage: i32,
    },
    LightCredited {
        amount: u32,
        source: IncomeSource,
    },
    WaveCleared {
        wave: u32,
    },
    MatchEnded {
        state: MatchState,
    },
    MatchReset,
}

/// Everything a rendering shell needs after one call to `tick()`.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub tick: Tick,
    pub events: Vec<MatchEvent>,
    pub light: u32,
    pub wave: u32,
    pub state: MatchState,
}

impl TickOutcome {
    pub fn spawned(&self) -> impl Iterator<Item = &Spawned> {
        self.events.iter().filter_map(|event| match event {
            MatchEvent::Spawned(spawned) => Some(spawned),
            _ => None,
        })
    }

    pub fn removed(&self) -> impl Iterator<Item = &Removal> {
        self.events.iter().filter_map(|event| match event {
            MatchEvent::Removed(removal) => Some(removal),
            _ => None,
        })
    }
}

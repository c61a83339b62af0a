//! Canonical serializable types for the Pest Defense game.
//!
//! Shared between `sim_pest` (the simulation core) and whatever shell renders
//! it. Everything here is plain data: the simulation never pushes frames, the
//! shell polls a [`PestObservation`] after each tick.

use serde::{Deserialize, Serialize};

/// Defensive unit a player can place on a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmplacementKind {
    /// Sprays slow, low-damage water that soaks its target.
    Mister,
    /// Fires fast UV beams and trickles passive light income.
    UvLamp,
    /// Inert, very durable blocker.
    StickyTrap,
    /// Ambush trap that devours the first pest to wander into it, then digests.
    Flytrap,
}

impl EmplacementKind {
    pub const ALL: [EmplacementKind; 4] = [
        EmplacementKind::Mister,
        EmplacementKind::UvLamp,
        EmplacementKind::StickyTrap,
        EmplacementKind::Flytrap,
    ];
}

/// Pest tiers, weakest to strongest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvaderKind {
    Aphid,
    SpiderMite,
    Mealybug,
    Snail,
    BossSlug,
}

impl InvaderKind {
    pub const ALL: [InvaderKind; 5] = [
        InvaderKind::Aphid,
        InvaderKind::SpiderMite,
        InvaderKind::Mealybug,
        InvaderKind::Snail,
        InvaderKind::BossSlug,
    ];

    pub fn is_boss(self) -> bool {
        matches!(self, InvaderKind::BossSlug)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Water,
    UvBeam,
}

/// Match lifecycle. `GameOver` and `Victory` are terminal until reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    Playing,
    GameOver,
    Victory,
}

impl MatchState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchState::Playing)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapState {
    Waiting,
    Fed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvaderBehavior {
    Advancing,
    Besieging,
}

/// Board geometry in the units the simulation uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: f32,
    pub board_width: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmplacementInfo {
    pub id: u64,
    pub row: u32,
    pub col: u32,
    pub kind: EmplacementKind,
    pub hp: i32,
    pub max_hp: i32,
    /// Only present for flytraps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trap_state: Option<TrapState>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvaderInfo {
    pub id: u64,
    pub row: u32,
    pub x: f32,
    pub kind: InvaderKind,
    pub hp: i32,
    pub max_hp: i32,
    pub wet: bool,
    pub behavior: InvaderBehavior,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileInfo {
    pub id: u64,
    pub row: u32,
    pub x: f32,
    pub kind: ProjectileKind,
}

/// Full game state observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PestObservation {
    pub tick: u64,
    pub state: MatchState,

    pub light: u32,
    pub wave: u32,
    pub max_waves: u32,
    pub pests_spawned_in_wave: u32,
    pub pests_per_wave: u32,

    pub board: BoardInfo,

    pub emplacements: Vec<EmplacementInfo>,
    pub invaders: Vec<InvaderInfo>,
    pub projectiles: Vec<ProjectileInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_playing_is_live() {
        assert!(!MatchState::Playing.is_terminal());
        assert!(MatchState::GameOver.is_terminal());
        assert!(MatchState::Victory.is_terminal());
        assert_eq!(MatchState::default(), MatchState::Playing);
    }

    #[test]
    fn test_trap_state_omitted_for_non_flytraps() {
        let info = EmplacementInfo {
            id: 3,
            row: 1,
            col: 2,
            kind: EmplacementKind::Mister,
            hp: 100,
            max_hp: 100,
            trap_state: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("trap_state").is_none());
        assert_eq!(json["kind"], "Mister");

        let parsed: EmplacementInfo = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, info);
    }

    #[test]
    fn test_only_boss_slug_is_boss() {
        let bosses: Vec<_> = InvaderKind::ALL.iter().filter(|k| k.is_boss()).collect();
        assert_eq!(bosses, vec![&InvaderKind::BossSlug]);
    }
}

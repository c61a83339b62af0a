use crate::state::PestState;
use crate::world::{EmplacementId, InvaderId, ProjectileId};
use pest_types::{BoardInfo, EmplacementInfo, InvaderInfo, PestObservation, ProjectileInfo};
use slotmap::{Key, KeyData};

pub fn emplacement_id_to_u64(id: EmplacementId) -> u64 {
    id.data().as_ffi()
}

pub fn u64_to_emplacement_id(ffi: u64) -> EmplacementId {
    EmplacementId::from(KeyData::from_ffi(ffi))
}

pub fn invader_id_to_u64(id: InvaderId) -> u64 {
    id.data().as_ffi()
}

pub fn projectile_id_to_u64(id: ProjectileId) -> u64 {
    id.data().as_ffi()
}

pub fn build_observation(state: &PestState) -> PestObservation {
    let store = &state.store;

    let emplacements = store
        .emplacements()
        .iter()
        .map(|(id, e)| EmplacementInfo {
            id: emplacement_id_to_u64(id),
            row: e.row,
            col: e.col,
            kind: e.kind(),
            hp: e.hp,
            max_hp: e.max_hp,
            trap_state: e.trap_state(),
        })
        .collect();

    let invaders = store
        .invaders()
        .iter()
        .map(|(id, inv)| InvaderInfo {
            id: invader_id_to_u64(id),
            row: inv.row,
            x: inv.x,
            kind: inv.kind,
            hp: inv.hp,
            max_hp: inv.max_hp,
            wet: inv.status.is_wet(),
            behavior: inv.behavior,
        })
        .collect();

    let projectiles = store
        .projectiles()
        .iter()
        .map(|(id, p)| ProjectileInfo {
            id: projectile_id_to_u64(id),
            row: p.row,
            x: p.x,
            kind: p.kind,
        })
        .collect();

    PestObservation {
        tick: state.tick,
        state: state.state,
        light: state.economy.light(),
        wave: state.waves.wave(),
        max_waves: state.config.max_waves,
        pests_spawned_in_wave: state.waves.pests_spawned_in_wave(),
        pests_per_wave: state.config.pests_per_wave(state.waves.wave()),
        board: BoardInfo {
            rows: state.grid.rows,
            cols: state.grid.cols,
            cell_width: state.grid.cell_width,
            board_width: state.grid.board_width(),
        },
        emplacements,
        invaders,
        projectiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PestConfig;
    use crate::systems;
    use pest_types::{EmplacementKind, MatchState, TrapState};

    #[test]
    fn test_observation_reflects_state() {
        let mut state = PestState::new(PestConfig::default(), 0);
        let id = systems::try_place(&mut state, 1, 2, EmplacementKind::Flytrap).unwrap();

        let obs = build_observation(&state);
        assert_eq!(obs.tick, 0);
        assert_eq!(obs.state, MatchState::Playing);
        assert_eq!(obs.light, 350);
        assert_eq!(obs.wave, 1);
        assert_eq!(obs.pests_per_wave, 12);
        assert_eq!(obs.board.board_width, 720.0);
        assert_eq!(obs.emplacements.len(), 1);

        let info = &obs.emplacements[0];
        assert_eq!(info.kind, EmplacementKind::Flytrap);
        assert_eq!(info.trap_state, Some(TrapState::Waiting));
        assert_eq!(u64_to_emplacement_id(info.id), id);
    }
}

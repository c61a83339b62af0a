use crate::error::PlacementError;
use crate::events::{IncomeSource, MatchEvent, Spawned};
use crate::grid::Grid;
use crate::state::PestState;
use crate::world::{
    Arena, Behavior, Emplacement, EmplacementId, Invader, InvaderId, Projectile, ProjectileId,
};
use pest_types::{EmplacementKind, InvaderBehavior, MatchState, ProjectileKind, TrapState};
use tracing::{debug, info, trace};

pub fn try_place(
    state: &mut PestState,
    row: u32,
    col: u32,
    kind: EmplacementKind,
) -> Result<EmplacementId, PlacementError> {
    if !state.grid.is_valid(row, col) {
        return Err(PlacementError::OutOfBounds);
    }
    if state.grid.is_occupied(&state.store, row, col) {
        return Err(PlacementError::CellOccupied);
    }

    let spec = state.config.emplacement(kind);
    if !state.economy.try_spend(spec.cost) {
        return Err(PlacementError::InsufficientResource);
    }

    let id = state
        .store
        .insert_emplacement(Emplacement::new(row, col, kind, spec.hp));
    Ok(id)
}

pub fn regen(state: &mut PestState, events: &mut Vec<MatchEvent>) {
    if state.tick % state.config.regen_interval != 0 {
        return;
    }
    let amount = state.config.regen_amount;
    state.economy.add(amount);
    events.push(MatchEvent::LightCredited {
        amount,
        source: IncomeSource::Regen,
    });
}

pub fn spawn_invaders(state: &mut PestState, events: &mut Vec<MatchEvent>) {
    let Some(plan) = state.waves.next_spawn(&state.config) else {
        return;
    };

    let wave = state.waves.wave();
    let hp = state.config.invader_hp(plan.kind, wave);
    let speed = state.config.invader(plan.kind).speed;
    let x = state.spawn_x();
    let id = state
        .store
        .insert_invader(Invader::new(plan.row, x, plan.kind, hp, speed));

    debug!(
        tick = state.tick,
        wave,
        row = plan.row,
        kind = ?plan.kind,
        "invader spawned"
    );
    events.push(MatchEvent::Spawned(Spawned::Invader {
        id,
        kind: plan.kind,
        row: plan.row,
        x,
    }));
}

pub fn emplacement_actions(
    state: &mut PestState,
    ids: &[EmplacementId],
    events: &mut Vec<MatchEvent>,
) {
    for &id in ids {
        let emplacement = &mut state.store.emplacements[id];
        if !emplacement.is_alive() {
            continue;
        }
        emplacement.action_timer += 1;
        let behavior = emplacement.behavior;

        match behavior {
            Behavior::Mister => try_fire(state, id, ProjectileKind::Water, events),
            Behavior::UvLamp { .. } => {
                lamp_income(state, id, events);
                try_fire(state, id, ProjectileKind::UvBeam, events);
            }
            Behavior::StickyTrap => {}
            Behavior::Flytrap { .. } => flytrap_act(state, id, events),
        }
    }
}

/// Anything alive in the lane between `from_x` and the right edge. Pests still
/// in the spawn margin past the edge are not targets yet.
fn has_target(
    invaders: &Arena<InvaderId, Invader>,
    row: u32,
    from_x: f32,
    board_width: f32,
) -> bool {
    invaders
        .values()
        .any(|inv| inv.is_alive() && inv.row == row && inv.x > from_x && inv.x <= board_width)
}

fn try_fire(
    state: &mut PestState,
    id: EmplacementId,
    kind: ProjectileKind,
    events: &mut Vec<MatchEvent>,
) {
    let emplacement = &state.store.emplacements[id];
    let cooldown = state.config.emplacement(emplacement.kind()).cooldown;
    if emplacement.action_timer < cooldown {
        return;
    }

    let row = emplacement.row;
    let x = state.grid.cell_center_x(emplacement.col);
    if !has_target(&state.store.invaders, row, x, state.grid.board_width()) {
        return;
    }

    let damage = state.config.projectile(kind).damage;
    let projectile_id = state.store.insert_projectile(Projectile {
        row,
        x,
        damage,
        kind,
        dead: false,
    });
    state.store.emplacements[id].action_timer = 0;
    events.push(MatchEvent::Spawned(Spawned::Projectile {
        id: projectile_id,
        kind,
        row,
        x,
        source: id,
    }));
}

fn lamp_income(state: &mut PestState, id: EmplacementId, events: &mut Vec<MatchEvent>) {
    let period = state.config.lamp_income_period;
    let mut paid = false;
    if let Behavior::UvLamp { income_timer } = &mut state.store.emplacements[id].behavior {
        *income_timer += 1;
        if *income_timer >= period {
            *income_timer = 0;
            paid = true;
        }
    }

    if paid {
        let amount = state.config.lamp_income;
        state.economy.add(amount);
        events.push(MatchEvent::LightCredited {
            amount,
            source: IncomeSource::LampIncome,
        });
    }
}

fn flytrap_act(state: &mut PestState, id: EmplacementId, events: &mut Vec<MatchEvent>) {
    let digest_ticks = state.config.flytrap_digest_ticks;
    let emplacement = &mut state.store.emplacements[id];
    let timer = emplacement.action_timer;
    if let Behavior::Flytrap { trap } = &mut emplacement.behavior {
        if *trap == TrapState::Fed && timer > digest_ticks {
            *trap = TrapState::Waiting;
        }
    }
    if emplacement.trap_state() != Some(TrapState::Waiting) {
        return;
    }

    let row = emplacement.row;
    let center = state.grid.cell_center_x(emplacement.col);
    let radius = state.config.flytrap_capture_radius;
    let prey = state
        .store
        .invaders
        .iter()
        .filter(|(_, inv)| inv.is_alive() && inv.row == row)
        .map(|(inv_id, inv)| (inv_id, (inv.x - center).abs()))
        .filter(|(_, dist)| *dist <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(inv_id, _)| inv_id);
    let Some(prey) = prey else {
        return;
    };

    let invader = &mut state.store.invaders[prey];
    let damage = if invader.kind.is_boss() {
        state.config.flytrap_boss_damage
    } else {
        state.config.flytrap_damage
    };
    invader.hp -= damage;

    let emplacement = &mut state.store.emplacements[id];
    emplacement.behavior = Behavior::Flytrap {
        trap: TrapState::Fed,
    };
    emplacement.action_timer = 0;

    debug!(tick = state.tick, row, damage, "flytrap fed");
    events.push(MatchEvent::FlytrapFed {
        flytrap: id,
        invader: prey,
        damage,
    });
}

/// Nearest live blocker in the lane within `range` of `x`.
fn find_blocker(
    emplacements: &Arena<EmplacementId, Emplacement>,
    grid: &Grid,
    row: u32,
    x: f32,
    range: f32,
) -> Option<EmplacementId> {
    emplacements
        .iter()
        .filter(|(_, e)| e.is_alive() && e.blocks() && e.row == row)
        .map(|(id, e)| (id, (x - grid.cell_center_x(e.col)).abs()))
        .filter(|(_, dist)| *dist <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

pub fn invader_actions(state: &mut PestState, ids: &[InvaderId], events: &mut Vec<MatchEvent>) {
    let config = &state.config;
    let store = &mut state.store;

    for &id in ids {
        let invader = &mut store.invaders[id];
        if !invader.is_alive() {
            continue;
        }
        invader.status.decay();
        let (row, x) = (invader.row, invader.x);

        match find_blocker(&store.emplacements, &state.grid, row, x, config.siege_range) {
            Some(target) => {
                let invader = &mut store.invaders[id];
                invader.behavior = InvaderBehavior::Besieging;
                invader.siege_timer += 1;
                if invader.siege_timer % config.siege_interval == 0 {
                    let damage = if invader.kind.is_boss() {
                        config.siege_damage * config.boss_siege_multiplier
                    } else {
                        config.siege_damage
                    };
                    store.emplacements[target].hp -= damage;
                    events.push(MatchEvent::SiegeStrike {
                        invader: id,
                        emplacement: target,
                        damage,
                    });
                }
            }
            None => {
                let invader = &mut store.invaders[id];
                invader.behavior = InvaderBehavior::Advancing;
                invader.siege_timer = 0;
                let factor = if invader.status.is_wet() {
                    config.wet_speed_factor
                } else {
                    1.0
                };
                invader.x -= invader.speed * factor;

                if invader.x < 0.0 {
                    invader.breached = true;
                    state.state = MatchState::GameOver;
                    info!(tick = state.tick, row, kind = ?invader.kind, "garden breached");
                    break;
                }
            }
        }
    }
}

pub fn projectile_actions(
    state: &mut PestState,
    ids: &[ProjectileId],
    events: &mut Vec<MatchEvent>,
) {
    let config = &state.config;
    let store = &mut state.store;
    let board_width = state.grid.board_width();

    for &id in ids {
        let projectile = &mut store.projectiles[id];
        if projectile.dead {
            continue;
        }
        projectile.x += config.projectile(projectile.kind).speed;
        let (row, x, kind, damage) = (
            projectile.row,
            projectile.x,
            projectile.kind,
            projectile.damage,
        );

        let target = store
            .invaders
            .iter()
            .find(|(_, inv)| {
                let ahead = inv.x - x;
                inv.is_alive() && inv.row == row && (0.0..=config.impact_tolerance).contains(&ahead)
            })
            .map(|(inv_id, _)| inv_id);

        match target {
            Some(target) => {
                let invader = &mut store.invaders[target];
                let crit = kind == ProjectileKind::UvBeam && invader.status.is_wet();
                let dealt = if crit {
                    damage * config.wet_crit_multiplier
                } else {
                    damage
                };
                invader.hp -= dealt;
                if kind == ProjectileKind::Water {
                    invader.status.soak(config.wet_duration);
                }
                store.projectiles[id].dead = true;
                trace!(tick = state.tick, row, ?kind, dealt, crit, "projectile impact");
                events.push(MatchEvent::ProjectileImpact {
                    projectile: id,
                    invader: target,
                    damage: dealt,
                    crit,
                });
            }
            None if x > board_width => store.projectiles[id].dead = true,
            None => {}
        }
    }
}

pub fn collect_garbage(state: &mut PestState, events: &mut Vec<MatchEvent>) {
    for removal in state.store.retain_alive() {
        if removal.is_boss_kill() {
            info!(tick = state.tick, "boss slug defeated");
        }
        events.push(MatchEvent::Removed(removal));
    }
}

pub fn check_wave_complete(state: &mut PestState, events: &mut Vec<MatchEvent>) {
    if state.state.is_terminal() {
        return;
    }
    if !state.waves.quota_met(&state.config) || !state.store.invaders.is_empty() {
        return;
    }

    let wave = state.waves.wave();
    if state.waves.is_final_wave(&state.config) {
        state.state = MatchState::Victory;
        info!(tick = state.tick, wave, "final wave cleared");
        return;
    }

    state.waves.advance_wave();
    let bonus = state.config.wave_clear_bonus;
    state.economy.add(bonus);
    info!(tick = state.tick, wave, light = state.economy.light(), "wave cleared");
    events.push(MatchEvent::LightCredited {
        amount: bonus,
        source: IncomeSource::WaveClear,
    });
    events.push(MatchEvent::WaveCleared { wave });
}

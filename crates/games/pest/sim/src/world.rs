use crate::events::{Removal, RemovalCause, RemovedEntity};
use crate::grid::Grid;
use pest_types::{EmplacementKind, InvaderBehavior, InvaderKind, ProjectileKind, TrapState};
use slotmap::{new_key_type, Key, SlotMap};
use std::ops::{Index, IndexMut};

new_key_type! { pub struct EmplacementId; }
new_key_type! { pub struct InvaderId; }
new_key_type! { pub struct ProjectileId; }

/// A slotmap that also remembers insertion order.
///
/// Slotmap keys carry a generation, so an id handed out once never matches a
/// later entity even if the slot is recycled.
#[derive(Clone, Debug)]
pub struct Arena<K: Key, V> {
    items: SlotMap<K, V>,
    order: Vec<K>,
}

impl<K: Key, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self {
            items: SlotMap::with_key(),
            order: Vec::new(),
        }
    }
}

impl<K: Key, V> Arena<K, V> {
    pub fn insert(&mut self, value: V) -> K {
        let id = self.items.insert(value);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: K) -> Option<&V> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: K) -> Option<&mut V> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: K) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids in insertion order, detached from the arena so callers may mutate
    /// while walking them.
    pub fn ids(&self) -> Vec<K> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.order.iter().map(move |&id| (id, &self.items[id]))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().map(move |&id| &self.items[id])
    }

    /// Remove every entry matching `pred`, returned in insertion order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&V) -> bool) -> Vec<(K, V)> {
        let items = &mut self.items;
        let mut removed = Vec::new();
        self.order.retain(|&id| {
            if pred(&items[id]) {
                if let Some(value) = items.remove(id) {
                    removed.push((id, value));
                }
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }
}

impl<K: Key, V> Index<K> for Arena<K, V> {
    type Output = V;

    fn index(&self, id: K) -> &V {
        &self.items[id]
    }
}

impl<K: Key, V> IndexMut<K> for Arena<K, V> {
    fn index_mut(&mut self, id: K) -> &mut V {
        &mut self.items[id]
    }
}

/// Kind-specific state. Only the kinds that need extra state carry it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Mister,
    UvLamp { income_timer: u32 },
    StickyTrap,
    Flytrap { trap: TrapState },
}

impl Behavior {
    pub fn for_kind(kind: EmplacementKind) -> Self {
        match kind {
            EmplacementKind::Mister => Behavior::Mister,
            EmplacementKind::UvLamp => Behavior::UvLamp { income_timer: 0 },
            EmplacementKind::StickyTrap => Behavior::StickyTrap,
            EmplacementKind::Flytrap => Behavior::Flytrap {
                trap: TrapState::Waiting,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Emplacement {
    pub row: u32,
    pub col: u32,
    pub hp: i32,
    pub max_hp: i32,
    /// Ticks since the last action.
    pub action_timer: u32,
    pub behavior: Behavior,
}

impl Emplacement {
    pub fn new(row: u32, col: u32, kind: EmplacementKind, hp: i32) -> Self {
        Self {
            row,
            col,
            hp,
            max_hp: hp,
            action_timer: 0,
            behavior: Behavior::for_kind(kind),
        }
    }

    pub fn kind(&self) -> EmplacementKind {
        match self.behavior {
            Behavior::Mister => EmplacementKind::Mister,
            Behavior::UvLamp { .. } => EmplacementKind::UvLamp,
            Behavior::StickyTrap => EmplacementKind::StickyTrap,
            Behavior::Flytrap { .. } => EmplacementKind::Flytrap,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// A waiting flytrap lets pests walk into its jaws.
    pub fn blocks(&self) -> bool {
        !matches!(
            self.behavior,
            Behavior::Flytrap {
                trap: TrapState::Waiting
            }
        )
    }

    pub fn trap_state(&self) -> Option<TrapState> {
        match self.behavior {
            Behavior::Flytrap { trap } => Some(trap),
            _ => None,
        }
    }
}

/// Soaked-by-water status. `wet` is derived from the remaining ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WetStatus {
    wet: bool,
    wet_ticks_remaining: u32,
}

impl WetStatus {
    pub fn is_wet(&self) -> bool {
        self.wet
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.wet_ticks_remaining
    }

    /// Refreshes the timer; repeated soaks never stack.
    pub fn soak(&mut self, duration: u32) {
        self.wet_ticks_remaining = duration;
        self.wet = duration > 0;
    }

    pub fn decay(&mut self) {
        self.wet_ticks_remaining = self.wet_ticks_remaining.saturating_sub(1);
        self.wet = self.wet_ticks_remaining > 0;
    }
}

#[derive(Clone, Debug)]
pub struct Invader {
    pub row: u32,
    pub x: f32,
    pub kind: InvaderKind,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,
    pub siege_timer: u32,
    pub behavior: InvaderBehavior,
    pub status: WetStatus,
    /// Crossed x = 0 this tick.
    pub breached: bool,
}

impl Invader {
    pub fn new(row: u32, x: f32, kind: InvaderKind, hp: i32, speed: f32) -> Self {
        Self {
            row,
            x,
            kind,
            hp,
            max_hp: hp,
            speed,
            siege_timer: 0,
            behavior: InvaderBehavior::Advancing,
            status: WetStatus::default(),
            breached: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0 && !self.breached
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub row: u32,
    pub x: f32,
    pub damage: i32,
    pub kind: ProjectileKind,
    pub dead: bool,
}

/// Ids alive at the start of a tick. Only these act during that tick.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub emplacements: Vec<EmplacementId>,
    pub invaders: Vec<InvaderId>,
    pub projectiles: Vec<ProjectileId>,
}

/// Owns every live entity plus the cell occupancy index.
#[derive(Clone, Debug)]
pub struct EntityStore {
    grid: Grid,
    cells: Vec<Option<EmplacementId>>,
    pub(crate) emplacements: Arena<EmplacementId, Emplacement>,
    pub(crate) invaders: Arena<InvaderId, Invader>,
    pub(crate) projectiles: Arena<ProjectileId, Projectile>,
}

impl EntityStore {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![None; grid.cell_count()],
            emplacements: Arena::default(),
            invaders: Arena::default(),
            projectiles: Arena::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn emplacements(&self) -> &Arena<EmplacementId, Emplacement> {
        &self.emplacements
    }

    pub fn invaders(&self) -> &Arena<InvaderId, Invader> {
        &self.invaders
    }

    pub fn projectiles(&self) -> &Arena<ProjectileId, Projectile> {
        &self.projectiles
    }

    pub fn emplacement_at(&self, row: u32, col: u32) -> Option<EmplacementId> {
        if !self.grid.is_valid(row, col) {
            return None;
        }
        self.cells[self.grid.idx(row, col)]
    }

    /// Caller has already checked bounds and occupancy.
    pub fn insert_emplacement(&mut self, emplacement: Emplacement) -> EmplacementId {
        let idx = self.grid.idx(emplacement.row, emplacement.col);
        debug_assert!(self.cells[idx].is_none(), "cell already occupied");
        let id = self.emplacements.insert(emplacement);
        self.cells[idx] = Some(id);
        id
    }

    pub fn insert_invader(&mut self, invader: Invader) -> InvaderId {
        self.invaders.insert(invader)
    }

    pub fn insert_projectile(&mut self, projectile: Projectile) -> ProjectileId {
        self.projectiles.insert(projectile)
    }

    pub fn roster(&self) -> Roster {
        Roster {
            emplacements: self.emplacements.ids(),
            invaders: self.invaders.ids(),
            projectiles: self.projectiles.ids(),
        }
    }

    /// Drop everything whose removal predicate holds and report what went.
    pub fn retain_alive(&mut self) -> Vec<Removal> {
        let mut removed = Vec::new();

        for (id, emplacement) in self.emplacements.remove_where(|e| !e.is_alive()) {
            let idx = self.grid.idx(emplacement.row, emplacement.col);
            if self.cells[idx] == Some(id) {
                self.cells[idx] = None;
            }
            removed.push(Removal {
                entity: RemovedEntity::Emplacement {
                    id,
                    kind: emplacement.kind(),
                    row: emplacement.row,
                    col: emplacement.col,
                },
                cause: RemovalCause::Sieged,
            });
        }

        for (id, invader) in self.invaders.remove_where(|i| !i.is_alive()) {
            let cause = if invader.breached {
                RemovalCause::Breached
            } else {
                RemovalCause::Killed
            };
            removed.push(Removal {
                entity: RemovedEntity::Invader {
                    id,
                    kind: invader.kind,
                    row: invader.row,
                    x: invader.x,
                },
                cause,
            });
        }

        for (id, projectile) in self.projectiles.remove_where(|p| p.dead) {
            removed.push(Removal {
                entity: RemovedEntity::Projectile {
                    id,
                    kind: projectile.kind,
                    row: projectile.row,
                    x: projectile.x,
                },
                cause: RemovalCause::Expired,
            });
        }

        removed
    }

    pub fn clear(&mut self) {
        self.emplacements.clear();
        self.invaders.clear();
        self.projectiles.clear();
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EntityStore {
        EntityStore::new(Grid::new(5, 9, 80.0))
    }

    #[test]
    fn test_arena_iterates_in_insertion_order_after_removal() {
        let mut arena: Arena<InvaderId, u32> = Arena::default();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);
        let removed = arena.remove_where(|v| *v == 2);
        assert_eq!(removed, vec![(b, 2)]);

        let d = arena.insert(4);
        assert_ne!(d, b);
        assert!(!arena.contains(b));
        assert_eq!(arena.ids(), vec![a, c, d]);
        assert_eq!(arena.values().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
    }

    #[test]
    fn test_emplacement_occupies_and_vacates_cell() {
        let mut store = store();
        let id = store.insert_emplacement(Emplacement::new(2, 3, EmplacementKind::Mister, 100));
        assert_eq!(store.emplacement_at(2, 3), Some(id));
        assert_eq!(store.emplacement_at(2, 4), None);
        assert_eq!(store.emplacement_at(9, 9), None);

        store.emplacements[id].hp = 0;
        let removed = store.retain_alive();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].cause, RemovalCause::Sieged);
        assert_eq!(store.emplacement_at(2, 3), None);
    }

    #[test]
    fn test_retain_alive_reports_causes() {
        let mut store = store();
        let killed = store.insert_invader(Invader::new(0, 100.0, InvaderKind::BossSlug, 10, 0.1));
        let breached = store.insert_invader(Invader::new(1, -0.1, InvaderKind::Aphid, 10, 0.5));
        let survivor = store.insert_invader(Invader::new(2, 300.0, InvaderKind::Snail, 10, 0.25));
        let shot = store.insert_projectile(Projectile {
            row: 0,
            x: 50.0,
            damage: 20,
            kind: ProjectileKind::Water,
            dead: true,
        });
        store.invaders[killed].hp = -5;
        store.invaders[breached].breached = true;

        let removed = store.retain_alive();
        let causes: Vec<_> = removed.iter().map(|r| r.cause).collect();
        assert_eq!(
            causes,
            vec![
                RemovalCause::Killed,
                RemovalCause::Breached,
                RemovalCause::Expired
            ]
        );
        assert!(removed[0].is_boss_kill());
        assert!(!removed[1].is_boss_kill());
        assert!(store.invaders.contains(survivor));
        assert!(!store.projectiles.contains(shot));
    }

    #[test]
    fn test_wet_status_refreshes_instead_of_stacking() {
        let mut status = WetStatus::default();
        assert!(!status.is_wet());
        status.soak(180);
        for _ in 0..100 {
            status.decay();
        }
        status.soak(180);
        assert_eq!(status.ticks_remaining(), 180);
        for _ in 0..179 {
            status.decay();
        }
        assert!(status.is_wet());
        status.decay();
        assert!(!status.is_wet());
        status.decay();
        assert_eq!(status.ticks_remaining(), 0);
    }

    #[test]
    fn test_only_waiting_flytrap_lets_pests_through() {
        let mut trap = Emplacement::new(0, 0, EmplacementKind::Flytrap, 200);
        assert!(!trap.blocks());
        assert_eq!(trap.trap_state(), Some(TrapState::Waiting));
        trap.behavior = Behavior::Flytrap {
            trap: TrapState::Fed,
        };
        assert!(trap.blocks());

        let wall = Emplacement::new(0, 1, EmplacementKind::StickyTrap, 800);
        assert!(wall.blocks());
        assert_eq!(wall.trap_state(), None);
        assert_eq!(wall.kind(), EmplacementKind::StickyTrap);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut store = store();
        store.insert_emplacement(Emplacement::new(0, 0, EmplacementKind::UvLamp, 100));
        store.insert_invader(Invader::new(0, 700.0, InvaderKind::Aphid, 60, 0.5));
        store.clear();
        assert!(store.emplacements.is_empty());
        assert!(store.invaders.is_empty());
        assert_eq!(store.emplacement_at(0, 0), None);
    }
}

use crate::config::PestConfig;
use crate::economy::Economy;
use crate::grid::Grid;
use crate::waves::WaveDirector;
use crate::world::EntityStore;
use pest_types::MatchState;
use sim_core::Tick;

#[derive(Clone, Debug)]
pub struct PestState {
    pub config: PestConfig,
    pub grid: Grid,
    pub tick: Tick,
    pub store: EntityStore,
    pub economy: Economy,
    pub waves: WaveDirector,
    pub state: MatchState,
}

impl PestState {
    pub fn new(config: PestConfig, seed: u64) -> Self {
        let grid = Grid::from_config(&config);
        Self {
            grid,
            tick: 0,
            store: EntityStore::new(grid),
            economy: Economy::new(config.starting_light),
            waves: WaveDirector::new(seed),
            state: MatchState::Playing,
            config,
        }
    }

    /// Invaders enter here, just past the right edge.
    pub fn spawn_x(&self) -> f32 {
        self.grid.board_width() + self.config.spawn_offset
    }
}

use crate::config::PestConfig;
use crate::world::EntityStore;

/// Lane/column addressing for the board. Pure geometry; occupancy lives in the
/// [`EntityStore`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: f32,
}

impl Grid {
    pub fn new(rows: u32, cols: u32, cell_width: f32) -> Self {
        Self {
            rows,
            cols,
            cell_width,
        }
    }

    pub fn from_config(config: &PestConfig) -> Self {
        Self::new(config.rows, config.cols, config.cell_width)
    }

    #[inline]
    pub fn is_valid(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline]
    pub fn idx(&self, row: u32, col: u32) -> usize {
        (row as usize) * (self.cols as usize) + (col as usize)
    }

    pub fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    pub fn is_occupied(&self, store: &EntityStore, row: u32, col: u32) -> bool {
        self.is_valid(row, col) && store.emplacement_at(row, col).is_some()
    }

    /// Right edge of the board; invaders march from here toward x = 0.
    pub fn board_width(&self) -> f32 {
        self.cols as f32 * self.cell_width
    }

    pub fn cell_center_x(&self, col: u32) -> f32 {
        col as f32 * self.cell_width + self.cell_width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let grid = Grid::from_config(&PestConfig::default());
        assert!(grid.is_valid(0, 0));
        assert!(grid.is_valid(4, 8));
        assert!(!grid.is_valid(5, 0));
        assert!(!grid.is_valid(0, 9));
        assert_eq!(grid.cell_count(), 45);
        assert_eq!(grid.idx(2, 3), 21);
    }

    #[test]
    fn test_board_geometry() {
        let grid = Grid::from_config(&PestConfig::default());
        assert_eq!(grid.board_width(), 720.0);
        assert_eq!(grid.cell_center_x(0), 40.0);
        assert_eq!(grid.cell_center_x(8), 680.0);
    }

    #[test]
    fn test_out_of_bounds_is_never_occupied() {
        let grid = Grid::new(2, 2, 10.0);
        let store = EntityStore::new(grid);
        assert!(!grid.is_occupied(&store, 0, 0));
        assert!(!grid.is_occupied(&store, 7, 7));
    }
}

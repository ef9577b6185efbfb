#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use autopick::*;
pub use error::*;
pub use generator::*;
pub use ledger::*;
pub use profile::*;
pub use round::*;
pub use session::*;
pub use storage::*;
pub use timer::*;
pub use types::*;

mod autopick;
mod error;
mod generator;
mod ledger;
mod profile;
mod round;
mod session;
mod storage;
mod timer;
mod types;

/// Gold added to the round reward for every safe cell revealed.
pub const REWARD_PER_SAFE_CELL: Gold = 10;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    /// Longest side allowed, keeps every flat index inside a `CellIndex`.
    pub const MAX_SIDE: Coord = 16;

    /// The 5x5 board with 5 mines every round is played on.
    pub const STANDARD: Self = Self::new_unchecked((5, 5), 5);

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps the board to a playable shape that always keeps one safe cell, and one mine when there is room.
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.clamp(1, Self::MAX_SIDE);
        let size_y = size_y.clamp(1, Self::MAX_SIDE);
        let mines = mines.max(1).min(mult(size_x, size_y) - 1);
        Self::new_unchecked((size_x, size_y), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Builds a layout from a row-major mask, `mine_mask[[y, x]]`.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Self {
            mine_mask,
            mine_count: CellCount::try_from(mine_count).unwrap_or(CellCount::MAX),
        }
    }

    pub fn from_mine_indices(config: GameConfig, mine_indices: &[CellIndex]) -> Result<Self> {
        let (width, height) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default((usize::from(height), usize::from(width)));

        for &index in mine_indices {
            if CellCount::from(index) >= config.total_cells() {
                return Err(GameError::InvalidCell);
            }
            mine_mask[index_to_coords(index, width).to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(mine_mask);
        if layout.mine_count >= config.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if CellCount::from(index) < self.total_cells() {
            Ok(index)
        } else {
            Err(GameError::InvalidCell)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (
            Coord::try_from(cols).unwrap_or(Coord::MAX),
            Coord::try_from(rows).unwrap_or(Coord::MAX),
        )
    }

    pub(crate) fn mine_mask_dim(&self) -> (usize, usize) {
        self.mine_mask.dim()
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        CellCount::try_from(self.mine_mask.len()).unwrap_or(CellCount::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, index: CellIndex) -> bool {
        self[index]
    }

    /// Every flat index on the board, in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = CellIndex> + use<> {
        (0..self.total_cells()).filter_map(|index| CellIndex::try_from(index).ok())
    }

    pub fn mine_indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.indices().filter(|&index| self[index])
    }
}

impl Index<CellIndex> for MineLayout {
    type Output = bool;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.mine_mask[index_to_coords(index, self.width()).to_nd_index()]
    }
}

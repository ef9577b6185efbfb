use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundState {
    Active,
    CashedOut,
    Cleared,
    Lost,
}

impl RoundState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        !self.is_active()
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::Active
    }
}

/// What a single reveal did to the round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    /// Safe cell, the round keeps going with `reward` accumulated so far.
    Safe { reward: Gold },
    /// Mine, the accumulated reward is forfeited.
    HitMine { lost: Gold },
    /// Last safe cell, the round was cashed out automatically.
    Cleared { banked: Gold },
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn ends_round(self) -> bool {
        matches!(self, Self::HitMine { .. } | Self::Cleared { .. })
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Safe,
    /// Only exposed once the round is lost.
    Mine,
    TriggeredMine,
}

/// One play from layout generation to resolution.
///
/// A finished round is kept around so the final board can still be drawn, it accepts no more moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    mine_layout: MineLayout,
    revealed: Array2<bool>,
    revealed_count: Saturating<CellCount>,
    reward: Gold,
    state: RoundState,
    triggered_mine: Option<CellIndex>,
}

impl Round {
    pub fn new(mine_layout: MineLayout) -> Self {
        let revealed = Array2::default(mine_layout.mine_mask_dim());
        Self {
            mine_layout,
            revealed,
            revealed_count: Saturating(0),
            reward: 0,
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn reward(&self) -> Gold {
        self.reward
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn is_revealed(&self, index: CellIndex) -> bool {
        self.mine_layout
            .validate_index(index)
            .is_ok_and(|index| self.revealed[self.nd_index(index)])
    }

    pub fn safe_cells_left(&self) -> CellCount {
        self.mine_layout.safe_cell_count() - self.revealed_count.0
    }

    /// Indices that are neither mined nor revealed yet, in board order.
    pub fn hidden_safe_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.mine_layout
            .indices()
            .filter(|&index| !self.mine_layout[index] && !self.revealed[self.nd_index(index)])
    }

    pub fn cell_at(&self, index: CellIndex) -> CellView {
        if self.mine_layout.validate_index(index).is_err() {
            return CellView::Hidden;
        }
        let has_mine = self.mine_layout[index];
        match self.state {
            RoundState::Lost if self.triggered_mine == Some(index) => CellView::TriggeredMine,
            RoundState::Lost if has_mine => CellView::Mine,
            _ if self.revealed[self.nd_index(index)] => CellView::Safe,
            _ => CellView::Hidden,
        }
    }

    pub fn reveal(&mut self, index: CellIndex) -> RevealOutcome {
        let Ok(index) = self.mine_layout.validate_index(index) else {
            log::debug!("ignoring reveal of out of range cell {}", index);
            return RevealOutcome::NoChange;
        };
        if !self.is_active() {
            return RevealOutcome::NoChange;
        }

        let nd_index = self.nd_index(index);
        if self.revealed[nd_index] {
            return RevealOutcome::NoChange;
        }
        self.revealed[nd_index] = true;

        if self.mine_layout[index] {
            let lost = self.reward;
            self.triggered_mine = Some(index);
            self.end_round(RoundState::Lost);
            log::trace!("cell {} is a mine", index);
            return RevealOutcome::HitMine { lost };
        }

        self.revealed_count += 1;
        self.reward = self.reward.saturating_add(REWARD_PER_SAFE_CELL);
        log::trace!("cell {} is safe, reward now {}", index, self.reward);

        if self.safe_cells_left() == 0 {
            let banked = self.end_round(RoundState::Cleared);
            RevealOutcome::Cleared { banked }
        } else {
            RevealOutcome::Safe {
                reward: self.reward,
            }
        }
    }

    /// Ends an active round voluntarily, returning the reward to bank.
    pub fn cash_out(&mut self) -> Option<Gold> {
        self.is_active()
            .then(|| self.end_round(RoundState::CashedOut))
    }

    /// Resolves the round and hands back whatever reward it carried, which is only worth banking on a win.
    fn end_round(&mut self, state: RoundState) -> Gold {
        if self.state.is_finished() {
            return 0;
        }
        self.state = state;
        core::mem::take(&mut self.reward)
    }

    fn nd_index(&self, index: CellIndex) -> [usize; 2] {
        index_to_coords(index, self.mine_layout.width()).to_nd_index()
    }
}

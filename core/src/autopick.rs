use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::*;

/// Most cells a single auto-pick will open.
pub const AUTO_PICK_LIMIT: usize = 15;

/// Pause the presentation should leave between two auto-pick reveals.
pub const AUTO_PICK_DELAY_MS: u32 = 200;

/// Queue of known-safe cells waiting to be revealed one per tick.
///
/// The session checks before each step that the round it was planned on is still the one running, so a round that
/// ends for any reason simply drains the queue.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoPick {
    pending: VecDeque<CellIndex>,
    round_id: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AutoPickStep {
    Revealed {
        index: CellIndex,
        outcome: RevealOutcome,
    },
    Done,
}

impl AutoPick {
    /// Picks up to `AUTO_PICK_LIMIT` hidden safe cells in an order drawn from `seed`.
    pub fn plan(round: &Round, seed: u64) -> Self {
        use rand::prelude::*;

        let mut candidates: Vec<CellIndex> = round.hidden_safe_cells().collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        candidates.shuffle(&mut rng);
        candidates.truncate(AUTO_PICK_LIMIT);

        log::debug!("auto-pick planned {} cells", candidates.len());
        Self {
            pending: candidates.into(),
            round_id: 0,
        }
    }

    pub(crate) fn for_round(mut self, round_id: u64) -> Self {
        self.round_id = round_id;
        self
    }

    pub(crate) fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn cancel(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("auto-pick cancelled with {} cells left", self.pending.len());
        }
        self.pending.clear();
    }

    pub(crate) fn next_index(&mut self) -> Option<CellIndex> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> Round {
        Round::new(MineLayout::from_mine_indices(GameConfig::STANDARD, &[3, 8, 13, 18, 23]).unwrap())
    }

    #[test]
    fn plan_only_contains_hidden_safe_cells() {
        let mut round = round();
        round.reveal(0);
        round.reveal(1);

        let mut pick = AutoPick::plan(&round, 9);

        assert_eq!(pick.pending(), AUTO_PICK_LIMIT);
        while let Some(index) = pick.next_index() {
            assert!(!round.mine_layout().contains_mine(index));
            assert!(!round.is_revealed(index));
        }
    }

    #[test]
    fn plan_has_no_duplicates() {
        let mut pick = AutoPick::plan(&round(), 1);
        let mut seen = [false; 25];
        while let Some(index) = pick.next_index() {
            assert!(!seen[usize::from(index)]);
            seen[usize::from(index)] = true;
        }
    }

    #[test]
    fn plan_is_capped_by_remaining_cells() {
        let mut round = round();
        let safe: Vec<_> = round.hidden_safe_cells().take(12).collect();
        for index in safe {
            round.reveal(index);
        }

        assert_eq!(AutoPick::plan(&round, 3).pending(), 8);
    }

    #[test]
    fn order_depends_on_seed() {
        let round = round();
        let orders: Vec<Vec<CellIndex>> = (0..10)
            .map(|seed| AutoPick::plan(&round, seed).pending.into_iter().collect())
            .collect();
        assert!(orders.iter().any(|order| order != &orders[0]));
    }

    #[test]
    fn cancel_empties_queue() {
        let mut pick = AutoPick::plan(&round(), 5);
        pick.cancel();
        assert!(pick.is_done());
        assert_eq!(pick.next_index(), None);
    }
}

use super::*;

/// Purely random placement: keeps drawing a cell index until enough distinct cells are mined.
///
/// Rejection sampling is fine for the small boards used here, a `GameConfig` always leaves at least one safe cell so
/// the loop terminates.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let (width, height) = config.size;
        let total_cells = config.total_cells();
        let mut mines = config.mines;

        if mines >= total_cells {
            log::warn!(
                "Requested {} mines but only {} cells, leaving one cell safe",
                mines,
                total_cells
            );
            mines = total_cells.saturating_sub(1);
        }

        let mut mine_mask: Array2<bool> = Array2::default((usize::from(height), usize::from(width)));
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;

        while mines_placed < mines {
            let place: CellCount = rng.random_range(0..total_cells);
            let Ok(index) = CellIndex::try_from(place) else {
                continue;
            };
            let cell = &mut mine_mask[index_to_coords(index, width).to_nd_index()];
            if !*cell {
                *cell = true;
                mines_placed += 1;
            }
        }

        log::trace!("generated layout with {} mines from seed {}", mines_placed, self.seed);
        MineLayout::from_mine_mask(mine_mask)
    }
}

use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// Hands out a layout prepared ahead of time, used for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedLayoutGenerator {
    layout: MineLayout,
}

impl FixedLayoutGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self { layout }
    }
}

impl LayoutGenerator for FixedLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        if self.layout.game_config() != config {
            log::warn!(
                "Fixed layout {:?} does not match requested {:?}, using it anyway",
                self.layout.game_config(),
                config
            );
        }
        self.layout
    }
}

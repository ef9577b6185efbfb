use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Active,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StartOutcome {
    NoChange,
    Started { attempts_left: Attempts },
}

impl StartOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Started { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CashoutOutcome {
    NoChange,
    Banked(Gold),
}

impl CashoutOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Banked(_))
    }
}

/// Single owner of the player's progression and the live round.
///
/// Every change to the profile is written through to `storage` before the operation returns.
#[derive(Debug)]
pub struct Session<S> {
    config: GameConfig,
    profile: PlayerProfile,
    round: Option<Round>,
    /// Bumped on every start, ties an `AutoPick` to the round it was planned on.
    round_id: u64,
    storage: S,
}

impl<S: ProfileStorage> Session<S> {
    pub fn load(storage: S) -> Self {
        Self::load_with_config(storage, GameConfig::STANDARD)
    }

    pub fn load_with_config(storage: S, config: GameConfig) -> Self {
        let profile = load_or_default(&storage);
        log::debug!("loaded profile: {:?}", profile);
        Self {
            config,
            profile,
            round: None,
            round_id: 0,
            storage,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn total_gold(&self) -> Gold {
        self.profile.total_gold
    }

    pub fn attempts(&self) -> Attempts {
        self.profile.attempts
    }

    pub fn has_auto_pick(&self) -> bool {
        self.profile.has_auto_pick()
    }

    pub fn reward_claimed(&self) -> bool {
        self.profile.reward_claimed
    }

    /// The live round, or the last resolved one until the next start.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn phase(&self) -> Phase {
        match &self.round {
            Some(round) if round.is_active() => Phase::Active,
            _ => Phase::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase(), Phase::Active)
    }

    pub fn round_reward(&self) -> Gold {
        self.round.as_ref().map_or(0, Round::reward)
    }

    pub fn cell_at(&self, index: CellIndex) -> CellView {
        self.round
            .as_ref()
            .map_or(CellView::Hidden, |round| round.cell_at(index))
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Option<Countdown> {
        Countdown::until_replenish(self.profile.attempts, now)
    }

    pub fn start(&mut self, generator: impl LayoutGenerator) -> StartOutcome {
        if self.is_active() {
            log::debug!("start ignored, a round is already running");
            return StartOutcome::NoChange;
        }
        if self.profile.attempts == 0 {
            log::debug!("start ignored, no attempts left");
            return StartOutcome::NoChange;
        }

        self.profile.attempts -= 1;
        self.persist();

        self.round = Some(Round::new(generator.generate(self.config)));
        self.round_id = self.round_id.wrapping_add(1);
        log::info!("round started, {} attempts left", self.profile.attempts);
        StartOutcome::Started {
            attempts_left: self.profile.attempts,
        }
    }

    pub fn reveal(&mut self, index: CellIndex) -> RevealOutcome {
        let Some(round) = self.round.as_mut() else {
            return RevealOutcome::NoChange;
        };

        let outcome = round.reveal(index);
        match outcome {
            RevealOutcome::HitMine { lost } => {
                log::info!("hit mine at {}, lost {}", index, lost);
            }
            RevealOutcome::Cleared { banked } => {
                log::info!("board cleared, banking {}", banked);
                self.credit(banked);
            }
            RevealOutcome::Safe { .. } | RevealOutcome::NoChange => {}
        }
        outcome
    }

    pub fn cashout(&mut self) -> CashoutOutcome {
        let Some(banked) = self.round.as_mut().and_then(Round::cash_out) else {
            return CashoutOutcome::NoChange;
        };
        log::info!("cashed out {}", banked);
        self.credit(banked);
        CashoutOutcome::Banked(banked)
    }

    pub fn purchase(&mut self, id: UpgradeId) -> Result<PurchaseOutcome> {
        match self.profile.purchase(id) {
            Ok(outcome) => {
                log::info!("bought {:?} for {}", id, outcome.spent);
                self.persist();
                Ok(outcome)
            }
            Err(err) => {
                log::debug!("purchase of {:?} refused: {}", id, err);
                Err(err)
            }
        }
    }

    pub fn purchase_by_cost(&mut self, cost: Gold) -> Result<PurchaseOutcome> {
        let upgrade = Upgrade::from_cost(cost)?;
        self.purchase(upgrade.id)
    }

    pub fn credit(&mut self, amount: Gold) -> Gold {
        let balance = self.profile.credit(amount);
        self.persist();
        balance
    }

    pub fn claim_external_reward(&mut self) -> ClaimOutcome {
        let outcome = self.profile.claim_external_reward();
        if outcome.has_update() {
            log::info!("external reward claimed");
            self.persist();
        }
        outcome
    }

    /// Plans an auto-pick, `None` unless a round is running and the upgrade is owned.
    pub fn begin_auto_pick(&self, seed: u64) -> Option<AutoPick> {
        if !self.has_auto_pick() {
            log::debug!("auto-pick ignored, upgrade not owned");
            return None;
        }
        self.round
            .as_ref()
            .filter(|round| round.is_active())
            .map(|round| AutoPick::plan(round, seed).for_round(self.round_id))
    }

    /// Reveals the next queued cell, stopping as soon as the round it was planned on is no longer running.
    pub fn auto_pick_step(&mut self, pick: &mut AutoPick) -> AutoPickStep {
        if !self.is_active() || pick.round_id() != self.round_id {
            pick.cancel();
            return AutoPickStep::Done;
        }
        match pick.next_index() {
            Some(index) => AutoPickStep::Revealed {
                index,
                outcome: self.reveal(index),
            },
            None => AutoPickStep::Done,
        }
    }

    /// Runs a whole auto-pick without pacing, returning how many cells it opened.
    pub fn auto_resolve(&mut self, seed: u64) -> usize {
        let Some(mut pick) = self.begin_auto_pick(seed) else {
            return 0;
        };
        let mut opened = 0;
        while let AutoPickStep::Revealed { outcome, .. } = self.auto_pick_step(&mut pick) {
            if outcome.has_update() {
                opened += 1;
            }
        }
        opened
    }

    fn persist(&mut self) {
        if let Err(err) = self.storage.save(&self.profile.to_saved()) {
            log::error!("Could not save profile: {}", err);
        }
    }
}

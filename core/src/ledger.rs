use serde::{Deserialize, Serialize};

use crate::*;

/// Gold granted once for the external subscription reward.
pub const EXTERNAL_REWARD: Gold = 5_000;

/// Attempts added by one `ExtraAttempts` purchase.
pub const EXTRA_ATTEMPTS: Attempts = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeId {
    ExtraAttempts,
    AutoPick,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UpgradeEffect {
    GrantAttempts(Attempts),
    Unlock(Capabilities),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub cost: Gold,
    pub effect: UpgradeEffect,
}

impl Upgrade {
    pub const CATALOG: &'static [Upgrade] = &[
        Upgrade {
            id: UpgradeId::ExtraAttempts,
            cost: 3_000,
            effect: UpgradeEffect::GrantAttempts(EXTRA_ATTEMPTS),
        },
        Upgrade {
            id: UpgradeId::AutoPick,
            cost: 7_000,
            effect: UpgradeEffect::Unlock(Capabilities::AUTO_PICK),
        },
    ];

    pub fn get(id: UpgradeId) -> &'static Upgrade {
        match id {
            UpgradeId::ExtraAttempts => &Self::CATALOG[0],
            UpgradeId::AutoPick => &Self::CATALOG[1],
        }
    }

    /// The shop buttons identify an upgrade by its price.
    pub fn from_cost(cost: Gold) -> Result<&'static Upgrade> {
        Self::CATALOG
            .iter()
            .find(|upgrade| upgrade.cost == cost)
            .ok_or(GameError::UnknownUpgrade)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub id: UpgradeId,
    pub spent: Gold,
    pub balance: Gold,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    AlreadyClaimed,
    Claimed(Gold),
}

impl ClaimOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Claimed(_))
    }
}

impl PlayerProfile {
    /// Debits the upgrade cost and applies its effect, nothing changes on failure.
    pub fn purchase(&mut self, id: UpgradeId) -> Result<PurchaseOutcome> {
        let upgrade = Upgrade::get(id);

        if let UpgradeEffect::Unlock(capability) = upgrade.effect {
            if self.upgrades.contains(capability) {
                return Err(GameError::AlreadyOwned);
            }
        }

        if self.total_gold < upgrade.cost {
            return Err(GameError::LowBalance {
                cost: upgrade.cost,
                balance: self.total_gold,
            });
        }

        self.total_gold -= upgrade.cost;
        match upgrade.effect {
            UpgradeEffect::GrantAttempts(extra) => {
                self.attempts = self.attempts.saturating_add(extra);
            }
            UpgradeEffect::Unlock(capability) => {
                self.upgrades.insert(capability);
            }
        }

        Ok(PurchaseOutcome {
            id,
            spent: upgrade.cost,
            balance: self.total_gold,
        })
    }

    pub fn credit(&mut self, amount: Gold) -> Gold {
        self.total_gold = self.total_gold.saturating_add(amount);
        self.total_gold
    }

    pub fn claim_external_reward(&mut self) -> ClaimOutcome {
        if self.reward_claimed {
            return ClaimOutcome::AlreadyClaimed;
        }
        self.reward_claimed = true;
        self.credit(EXTERNAL_REWARD);
        ClaimOutcome::Claimed(EXTERNAL_REWARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_gold(total_gold: Gold) -> PlayerProfile {
        PlayerProfile {
            total_gold,
            ..Default::default()
        }
    }

    #[test]
    fn catalog_lookup_by_cost() {
        assert_eq!(Upgrade::from_cost(3_000).unwrap().id, UpgradeId::ExtraAttempts);
        assert_eq!(Upgrade::from_cost(7_000).unwrap().id, UpgradeId::AutoPick);
        assert_eq!(Upgrade::from_cost(1), Err(GameError::UnknownUpgrade));
        assert_eq!(Upgrade::get(UpgradeId::AutoPick).cost, 7_000);
    }

    #[test]
    fn auto_pick_with_exact_balance() {
        let mut profile = profile_with_gold(7_000);

        let outcome = profile.purchase(UpgradeId::AutoPick).unwrap();

        assert_eq!(outcome.balance, 0);
        assert_eq!(profile.total_gold, 0);
        assert!(profile.has_auto_pick());
    }

    #[test]
    fn auto_pick_one_short_fails() {
        let mut profile = profile_with_gold(6_999);
        let before = profile;

        let err = profile.purchase(UpgradeId::AutoPick).unwrap_err();

        assert_eq!(
            err,
            GameError::LowBalance {
                cost: 7_000,
                balance: 6_999
            }
        );
        assert_eq!(profile, before);
    }

    #[test]
    fn extra_attempts_stack() {
        let mut profile = PlayerProfile::default();

        profile.purchase(UpgradeId::ExtraAttempts).unwrap();
        profile.purchase(UpgradeId::ExtraAttempts).unwrap();

        assert_eq!(profile.attempts, 20);
        assert_eq!(profile.total_gold, 4_000);
    }

    #[test]
    fn auto_pick_cannot_be_bought_twice() {
        let mut profile = profile_with_gold(20_000);
        profile.purchase(UpgradeId::AutoPick).unwrap();

        assert_eq!(profile.purchase(UpgradeId::AutoPick), Err(GameError::AlreadyOwned));
        assert_eq!(profile.total_gold, 13_000);
    }

    #[test]
    fn external_reward_only_once() {
        let mut profile = PlayerProfile::default();

        assert_eq!(profile.claim_external_reward(), ClaimOutcome::Claimed(5_000));
        assert_eq!(profile.claim_external_reward(), ClaimOutcome::AlreadyClaimed);
        assert_eq!(profile.total_gold, 15_000);
    }

    #[test]
    fn credit_saturates() {
        let mut profile = profile_with_gold(Gold::MAX - 1);
        assert_eq!(profile.credit(10), Gold::MAX);
    }
}

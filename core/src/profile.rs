use bitflags::bitflags;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::*;

bitflags! {
    /// Permanent capabilities unlocked through the upgrade shop.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        const AUTO_PICK = 1;
    }
}

/// Player progression that survives reloads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub total_gold: Gold,
    pub attempts: Attempts,
    pub upgrades: Capabilities,
    pub reward_claimed: bool,
}

impl PlayerProfile {
    pub const STARTING_GOLD: Gold = 10_000;
    pub const STARTING_ATTEMPTS: Attempts = 10;

    pub fn has_auto_pick(&self) -> bool {
        self.upgrades.contains(Capabilities::AUTO_PICK)
    }

    pub fn to_saved(&self) -> SavedProfile {
        SavedProfile {
            total_gold: self.total_gold,
            attempts: self.attempts,
            has_auto_pick: self.has_auto_pick(),
            reward_claimed: self.reward_claimed,
        }
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            total_gold: Self::STARTING_GOLD,
            attempts: Self::STARTING_ATTEMPTS,
            upgrades: Capabilities::empty(),
            reward_claimed: false,
        }
    }
}

impl From<SavedProfile> for PlayerProfile {
    fn from(saved: SavedProfile) -> Self {
        let mut upgrades = Capabilities::empty();
        upgrades.set(Capabilities::AUTO_PICK, saved.has_auto_pick);
        Self {
            total_gold: saved.total_gold,
            attempts: saved.attempts,
            upgrades,
            reward_claimed: saved.reward_claimed,
        }
    }
}

/// Flat record written to storage.
///
/// Fields are read one by one: a missing, `null` or mistyped field falls back to its fresh-profile value without
/// touching the others.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredFields")]
pub struct SavedProfile {
    pub total_gold: Gold,
    pub attempts: Attempts,
    pub has_auto_pick: bool,
    pub reward_claimed: bool,
}

impl SavedProfile {
    pub const STORAGE_KEY: &'static str = "mines_game_state";
}

impl Default for SavedProfile {
    fn default() -> Self {
        PlayerProfile::default().to_saved()
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredFields {
    total_gold: Option<Value>,
    attempts: Option<Value>,
    has_auto_pick: Option<Value>,
    reward_claimed: Option<Value>,
}

fn field_or<T: DeserializeOwned>(name: &str, value: Option<Value>, default: T) -> T {
    match value.map(T::deserialize) {
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            log::warn!("ignoring stored {}: {}", name, err);
            default
        }
        None => default,
    }
}

impl From<StoredFields> for SavedProfile {
    fn from(fields: StoredFields) -> Self {
        let defaults = Self::default();
        Self {
            total_gold: field_or("totalGold", fields.total_gold, defaults.total_gold),
            attempts: field_or("attempts", fields.attempts, defaults.attempts),
            has_auto_pick: field_or("hasAutoPick", fields.has_auto_pick, defaults.has_auto_pick),
            reward_claimed: field_or("rewardClaimed", fields.reward_claimed, defaults.reward_claimed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_profile_defaults() {
        let profile = PlayerProfile::default();
        assert_eq!(profile.total_gold, 10_000);
        assert_eq!(profile.attempts, 10);
        assert!(!profile.has_auto_pick());
        assert!(!profile.reward_claimed);
    }

    #[test]
    fn saved_record_uses_camel_case_keys() {
        let saved = SavedProfile {
            total_gold: 250,
            attempts: 3,
            has_auto_pick: true,
            reward_claimed: false,
        };
        let json = serde_json::to_string(&saved).unwrap();
        assert_eq!(
            json,
            r#"{"totalGold":250,"attempts":3,"hasAutoPick":true,"rewardClaimed":false}"#
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let saved: SavedProfile = serde_json::from_str(r#"{"attempts":0}"#).unwrap();
        assert_eq!(saved.total_gold, 10_000);
        assert_eq!(saved.attempts, 0);
        assert!(!saved.has_auto_pick);

        let saved: SavedProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(PlayerProfile::from(saved), PlayerProfile::default());
    }

    #[test]
    fn null_or_mistyped_field_only_resets_itself() {
        let saved: SavedProfile =
            serde_json::from_str(r#"{"totalGold":500,"attempts":"three","hasAutoPick":true,"rewardClaimed":null}"#)
                .unwrap();
        assert_eq!(
            saved,
            SavedProfile {
                total_gold: 500,
                attempts: 10,
                has_auto_pick: true,
                reward_claimed: false,
            }
        );
    }

    #[test]
    fn zero_gold_is_not_reset() {
        let saved: SavedProfile = serde_json::from_str(r#"{"totalGold":0}"#).unwrap();
        assert_eq!(PlayerProfile::from(saved).total_gold, 0);
    }

    #[test]
    fn profile_survives_saved_conversion() {
        let profile = PlayerProfile {
            total_gold: 1234,
            attempts: 7,
            upgrades: Capabilities::AUTO_PICK,
            reward_claimed: true,
        };
        assert_eq!(PlayerProfile::from(profile.to_saved()), profile);
    }
}

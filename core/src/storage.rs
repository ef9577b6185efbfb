use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::*;

/// Durable home of the player's progression.
///
/// Writes must be visible to the very next `load`, no buffering.
pub trait ProfileStorage {
    /// `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> core::result::Result<Option<SavedProfile>, StorageError>;

    fn save(&mut self, profile: &SavedProfile) -> core::result::Result<(), StorageError>;
}

/// Reads the stored profile, falling back to a fresh one when it is missing or unreadable.
pub fn load_or_default<S: ProfileStorage + ?Sized>(storage: &S) -> PlayerProfile {
    match storage.load() {
        Ok(Some(saved)) => saved.into(),
        Ok(None) => {
            log::debug!("no saved profile, starting fresh");
            PlayerProfile::default()
        }
        Err(err) => {
            log::warn!("could not load profile, starting fresh: {}", err);
            PlayerProfile::default()
        }
    }
}

/// JSON key-value store kept in memory, the same wire format as browser storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_raw(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }
}

impl ProfileStorage for MemoryStorage {
    fn load(&self) -> core::result::Result<Option<SavedProfile>, StorageError> {
        self.get_raw(SavedProfile::STORAGE_KEY)
            .map(|raw| serde_json::from_str(raw).map_err(|_| StorageError::Decode))
            .transpose()
    }

    fn save(&mut self, profile: &SavedProfile) -> core::result::Result<(), StorageError> {
        let raw = serde_json::to_string(profile).map_err(|_| StorageError::Encode)?;
        self.set_raw(SavedProfile::STORAGE_KEY, raw);
        Ok(())
    }
}

impl<S: ProfileStorage + ?Sized> ProfileStorage for &mut S {
    fn load(&self) -> core::result::Result<Option<SavedProfile>, StorageError> {
        (**self).load()
    }

    fn save(&mut self, profile: &SavedProfile) -> core::result::Result<(), StorageError> {
        (**self).save(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_storage_loads_defaults() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load(), Ok(None));
        assert_eq!(load_or_default(&storage), PlayerProfile::default());
    }

    #[test]
    fn save_then_load_is_identical() {
        let mut storage = MemoryStorage::new();
        let profile = PlayerProfile {
            total_gold: 0,
            attempts: 4,
            upgrades: Capabilities::AUTO_PICK,
            reward_claimed: true,
        };

        storage.save(&profile.to_saved()).unwrap();

        assert_eq!(load_or_default(&storage), profile);
    }

    #[test]
    fn malformed_record_falls_back_to_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set_raw(SavedProfile::STORAGE_KEY, "{not json");

        assert_eq!(storage.load(), Err(StorageError::Decode));
        assert_eq!(load_or_default(&storage), PlayerProfile::default());
    }

    #[test]
    fn partial_record_keeps_present_fields() {
        let mut storage = MemoryStorage::new();
        storage.set_raw(SavedProfile::STORAGE_KEY, r#"{"totalGold":55}"#);

        let profile = load_or_default(&storage);

        assert_eq!(profile.total_gold, 55);
        assert_eq!(profile.attempts, PlayerProfile::STARTING_ATTEMPTS);
    }

    #[test]
    fn null_field_keeps_the_rest_of_the_record() {
        let mut storage = MemoryStorage::new();
        storage.set_raw(
            SavedProfile::STORAGE_KEY,
            r#"{"totalGold":500,"attempts":3,"hasAutoPick":true,"rewardClaimed":null}"#,
        );

        assert_eq!(
            load_or_default(&storage),
            PlayerProfile {
                total_gold: 500,
                attempts: 3,
                upgrades: Capabilities::AUTO_PICK,
                reward_claimed: false,
            }
        );
    }
}

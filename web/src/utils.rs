use chrono::prelude::*;
use gloo::storage::{LocalStorage, Storage, errors::StorageError as GlooStorageError};
use mines_core::{ProfileStorage, SavedProfile, StorageError};

/// Profile storage backed by the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BrowserStorage;

impl ProfileStorage for BrowserStorage {
    fn load(&self) -> Result<Option<SavedProfile>, StorageError> {
        match LocalStorage::get(SavedProfile::STORAGE_KEY) {
            Ok(saved) => Ok(Some(saved)),
            Err(GlooStorageError::KeyNotFound(_)) => Ok(None),
            Err(GlooStorageError::SerdeError(err)) => {
                log::warn!("stored profile is malformed: {}", err);
                Err(StorageError::Decode)
            }
            Err(err) => {
                log::error!("local storage unavailable: {:?}", err);
                Err(StorageError::Unavailable)
            }
        }
    }

    fn save(&mut self, profile: &SavedProfile) -> Result<(), StorageError> {
        LocalStorage::set(SavedProfile::STORAGE_KEY, profile).map_err(|err| match err {
            GlooStorageError::SerdeError(_) => StorageError::Encode,
            _ => StorageError::Unavailable,
        })
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Yields seeds from a fixed starting point when one was forced, random ones otherwise.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SeedSource {
    forced: Option<u64>,
}

impl SeedSource {
    pub(crate) fn new(forced: Option<u64>) -> Self {
        Self { forced }
    }

    pub(crate) fn next_seed(&mut self) -> u64 {
        match self.forced.as_mut() {
            Some(seed) => {
                let current = *seed;
                *seed = seed.wrapping_add(1);
                current
            }
            None => js_random_seed(),
        }
    }
}

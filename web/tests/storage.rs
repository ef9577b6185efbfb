#![cfg(target_arch = "wasm32")]

use gloo::storage::{LocalStorage, Storage};
use mines_core::{
    Capabilities, MemoryStorage, PlayerProfile, ProfileStorage, SavedProfile, Session, StorageError,
};
use mines_web::BrowserStorage;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn missing_record_loads_as_none() {
    LocalStorage::delete(SavedProfile::STORAGE_KEY);
    assert_eq!(BrowserStorage.load(), Ok(None));
}

#[wasm_bindgen_test]
fn profile_round_trips_through_local_storage() {
    LocalStorage::delete(SavedProfile::STORAGE_KEY);
    let profile = PlayerProfile {
        total_gold: 420,
        attempts: 0,
        upgrades: Capabilities::AUTO_PICK,
        reward_claimed: true,
    };

    BrowserStorage.save(&profile.to_saved()).unwrap();

    assert_eq!(Session::load(BrowserStorage).profile(), &profile);
}

#[wasm_bindgen_test]
fn record_matches_memory_storage_format() {
    let saved = PlayerProfile::default().to_saved();
    let mut memory = MemoryStorage::new();
    memory.save(&saved).unwrap();
    BrowserStorage.save(&saved).unwrap();

    let raw: String = LocalStorage::raw()
        .get_item(SavedProfile::STORAGE_KEY)
        .unwrap()
        .unwrap();
    assert_eq!(memory.get_raw(SavedProfile::STORAGE_KEY), Some(raw.as_str()));
}

#[wasm_bindgen_test]
fn malformed_record_is_a_decode_error() {
    LocalStorage::raw()
        .set_item(SavedProfile::STORAGE_KEY, "{oops")
        .unwrap();

    assert_eq!(BrowserStorage.load(), Err(StorageError::Decode));
    assert_eq!(Session::load(BrowserStorage).profile(), &PlayerProfile::default());
    LocalStorage::delete(SavedProfile::STORAGE_KEY);
}

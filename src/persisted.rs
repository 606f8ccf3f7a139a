use calm_puzzle_core::settings::{decode_flag, encode_flag, MUSIC_ON_KEY, SFX_ON_KEY};
use calm_puzzle_core::Settings;
use web_sys::Storage;

fn storage() -> Option<Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

fn load_flag(storage: Option<&Storage>, key: &str, default: bool) -> bool {
    let raw = storage.and_then(|storage| storage.get_item(key).ok().flatten());
    decode_flag(raw.as_deref(), default)
}

fn save_flag(key: &str, on: bool) {
    let Some(storage) = storage() else {
        return;
    };
    if storage.set_item(key, encode_flag(on)).is_err() {
        gloo::console::log!("settings: storage set failed", key);
    }
}

/// Missing or unreadable storage yields the defaults.
pub(crate) fn load_settings() -> Settings {
    let defaults = Settings::default();
    let storage = storage();
    Settings {
        music_on: load_flag(storage.as_ref(), MUSIC_ON_KEY, defaults.music_on),
        sfx_on: load_flag(storage.as_ref(), SFX_ON_KEY, defaults.sfx_on),
    }
}

pub(crate) fn save_music_on(on: bool) {
    save_flag(MUSIC_ON_KEY, on);
}

pub(crate) fn save_sfx_on(on: bool) {
    save_flag(SFX_ON_KEY, on);
}

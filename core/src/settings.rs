pub const MUSIC_ON_KEY: &str = "calm-puzzle.musicOn";
pub const SFX_ON_KEY: &str = "calm-puzzle.sfxOn";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub music_on: bool,
    pub sfx_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_on: true,
            sfx_on: true,
        }
    }
}

pub fn encode_flag(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}

/// A missing value falls back to `default`; anything other than `"1"` is off.
pub fn decode_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        None => default,
        Some(value) => value == "1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_use_one_and_zero() {
        assert_eq!(encode_flag(true), "1");
        assert_eq!(encode_flag(false), "0");
        assert!(decode_flag(Some("1"), false));
        assert!(!decode_flag(Some("0"), true));
        assert!(!decode_flag(Some("yes"), true));
        assert!(decode_flag(None, true));
    }

    #[test]
    fn defaults_are_on() {
        assert_eq!(
            Settings::default(),
            Settings {
                music_on: true,
                sfx_on: true
            }
        );
    }
}

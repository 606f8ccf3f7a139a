use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const IMAGES_MANIFEST_URL: &str = "/content/images.json";
pub const AUDIO_MANIFEST_URL: &str = "/content/audio.json";
pub const PHRASES_URL: &str = "/content/phrases.txt";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Image urls keyed by resolution folder, e.g. `1920x1080`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageManifest {
    folders: BTreeMap<String, Vec<String>>,
}

impl ImageManifest {
    pub fn from_json(raw: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn folder(&self, name: &str) -> &[String] {
        self.folders.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, name: impl Into<String>, urls: Vec<String>) {
        self.folders.insert(name.into(), urls);
    }

    pub fn is_empty(&self) -> bool {
        self.folders.values().all(Vec::is_empty)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfxManifest {
    #[serde(default)]
    pub snap: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioManifest {
    #[serde(default)]
    pub bgm: Vec<String>,
    #[serde(default)]
    pub sfx: SfxManifest,
}

impl AudioManifest {
    pub fn from_json(raw: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn random_track<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.bgm.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.bgm.len());
        self.bgm.get(index).map(String::as_str)
    }
}

/// Manifest urls may be relative; everything is served from the site root.
pub fn normalize_path(url: &str) -> String {
    if url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{url}")
    }
}

/// Random entry of `urls`, different from `current` whenever there is a
/// choice. Urls are compared in their normalized form, so `current` may be
/// either the raw manifest entry or the path that was actually loaded.
pub fn pick_next_image<'a, R: Rng + ?Sized>(
    urls: &'a [String],
    current: Option<&str>,
    rng: &mut R,
) -> Option<&'a str> {
    let current = current.map(normalize_path);
    let candidates: Vec<&'a str> = urls
        .iter()
        .map(String::as_str)
        .filter(|url| {
            urls.len() == 1 || current.as_deref() != Some(normalize_path(url).as_str())
        })
        .collect();
    if candidates.is_empty() {
        return urls.first().map(String::as_str);
    }
    let index = rng.random_range(0..candidates.len());
    candidates.get(index).copied()
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn parses_folder_map() {
        let raw = r#"{"1920x1080":["a.jpg","/b.jpg"],"1440x1920":[]}"#;
        let manifest = ImageManifest::from_json(raw).unwrap();
        assert_eq!(manifest.folder("1920x1080"), ["a.jpg", "/b.jpg"]);
        assert!(manifest.folder("1440x1920").is_empty());
        assert!(manifest.folder("missing").is_empty());
        assert!(!manifest.is_empty());
    }

    #[test]
    fn audio_fields_are_optional() {
        let manifest = AudioManifest::from_json(r#"{"bgm":["x.mp3"]}"#).unwrap();
        assert_eq!(manifest.bgm, ["x.mp3"]);
        assert_eq!(manifest.sfx.snap, None);
        let full =
            AudioManifest::from_json(r#"{"bgm":[],"sfx":{"snap":"snap.wav"}}"#).unwrap();
        assert_eq!(full.sfx.snap.as_deref(), Some("snap.wav"));
        assert!(full.random_track(&mut SmallRng::seed_from_u64(0)).is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ImageManifest::from_json("[1,2").is_err());
    }

    #[test]
    fn normalizes_leading_slash() {
        assert_eq!(normalize_path("img/a.jpg"), "/img/a.jpg");
        assert_eq!(normalize_path("/img/a.jpg"), "/img/a.jpg");
    }

    #[test]
    fn next_image_avoids_current() {
        let urls: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let next = pick_next_image(&urls, Some("b"), &mut rng);
            assert!(matches!(next, Some("a") | Some("c")));
        }
        let single = vec!["only".to_string()];
        assert_eq!(pick_next_image(&single, Some("only"), &mut rng), Some("only"));
        assert_eq!(pick_next_image(&[], None, &mut rng), None);
    }

    #[test]
    fn next_image_matches_loaded_path_against_relative_entries() {
        let urls = vec!["img/a.jpg".to_string(), "img/b.jpg".to_string()];
        let loaded = normalize_path("img/a.jpg");
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            assert_eq!(pick_next_image(&urls, Some(&loaded), &mut rng), Some("img/b.jpg"));
        }
        let mixed = vec!["/img/a.jpg".to_string(), "img/b.jpg".to_string()];
        for _ in 0..50 {
            assert_eq!(pick_next_image(&mixed, Some("img/b.jpg"), &mut rng), Some("/img/a.jpg"));
        }
    }
}

use crate::grid::{LANDSCAPE_IMAGE_FOLDER, PORTRAIT_IMAGE_FOLDER};
use crate::layout::Orientation;
use crate::manifest::{normalize_path, ImageManifest};

/// Images fetched before anything else so the first puzzle can start early.
pub const PRIORITY_IMAGE_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloadPhase {
    Priority,
    CurrentImages,
    OtherImages,
    Audio,
}

impl PreloadPhase {
    pub fn label(self) -> &'static str {
        match self {
            PreloadPhase::Priority => "priority images",
            PreloadPhase::CurrentImages => "current images",
            PreloadPhase::OtherImages => "other images",
            PreloadPhase::Audio => "audio",
        }
    }
}

/// Ordered fetch plan. `priority` runs alone first, the other three lists
/// then run side by side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreloadPlan {
    pub priority: Vec<String>,
    pub current: Vec<String>,
    pub other: Vec<String>,
    pub audio: Vec<String>,
}

impl PreloadPlan {
    pub fn smart(orientation: Orientation, images: &ImageManifest, audio: &[String]) -> Self {
        let (current_folder, other_folder) = match orientation {
            Orientation::Landscape => (LANDSCAPE_IMAGE_FOLDER, PORTRAIT_IMAGE_FOLDER),
            Orientation::Portrait => (PORTRAIT_IMAGE_FOLDER, LANDSCAPE_IMAGE_FOLDER),
        };
        let current = normalize_all(images.folder(current_folder));
        let split = current.len().min(PRIORITY_IMAGE_COUNT);
        let (priority, rest) = current.split_at(split);
        Self {
            priority: priority.to_vec(),
            current: rest.to_vec(),
            other: normalize_all(images.folder(other_folder)),
            audio: normalize_all(audio),
        }
    }

    pub fn total(&self) -> usize {
        self.priority.len() + self.current.len() + self.other.len() + self.audio.len()
    }
}

fn normalize_all(urls: &[String]) -> Vec<String> {
    urls.iter().map(|url| normalize_path(url)).collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreloadProgress {
    pub loaded: usize,
    pub total: usize,
    pub current: String,
}

impl PreloadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            loaded: 0,
            total,
            current: String::new(),
        }
    }

    /// Counts one finished resource. Failed loads count too.
    pub fn advance(&mut self, phase: PreloadPhase, url: &str) {
        self.loaded = (self.loaded + 1).min(self.total);
        self.current = format!("{}: {url}", phase.label());
    }

    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        self.loaded as f32 / self.total as f32 * 100.0
    }

    pub fn is_done(&self) -> bool {
        self.loaded >= self.total
    }

    pub fn tip(&self) -> &'static str {
        let percentage = self.percentage();
        if percentage < 30.0 {
            "Loading images..."
        } else if percentage < 70.0 {
            "Loading audio..."
        } else if percentage < 100.0 {
            "Almost there..."
        } else {
            "Ready!"
        }
    }
}

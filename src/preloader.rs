use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use calm_puzzle_core::manifest::normalize_path;
use calm_puzzle_core::{PreloadPhase, PreloadPlan, PreloadProgress};
use futures_util::future::{join3, join_all};
use web_sys::HtmlImageElement;

use crate::fetch::{fetch_bytes, load_image};

pub(crate) type ProgressHook = Rc<dyn Fn(PreloadProgress)>;

/// Session cache of decoded images and raw audio bytes. Created once by the
/// app and shared with the game screen and the audio manager.
#[derive(Default)]
pub(crate) struct ResourcePreloader {
    images: RefCell<HashMap<String, HtmlImageElement>>,
    audio: RefCell<HashMap<String, Rc<Vec<u8>>>>,
}

impl ResourcePreloader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A fully decoded image for `url`, if the preload got it.
    pub(crate) fn preloaded_image(&self, url: &str) -> Option<HtmlImageElement> {
        self.images
            .borrow()
            .get(&normalize_path(url))
            .filter(|image| image.complete() && image.natural_width() > 0)
            .cloned()
    }

    pub(crate) fn preloaded_audio(&self, url: &str) -> Option<Rc<Vec<u8>>> {
        self.audio.borrow().get(&normalize_path(url)).cloned()
    }

    pub(crate) fn cache_stats(&self) -> (usize, usize) {
        (self.images.borrow().len(), self.audio.borrow().len())
    }

    async fn preload_image(&self, url: &str) {
        if self.images.borrow().contains_key(url) {
            return;
        }
        match load_image(url).await {
            Ok(image) => {
                self.images.borrow_mut().insert(url.to_string(), image);
            }
            Err(err) => gloo::console::warn!("preload: image skipped", url, err.to_string()),
        }
    }

    async fn preload_audio(&self, url: &str) {
        if self.audio.borrow().contains_key(url) {
            return;
        }
        match fetch_bytes(url).await {
            Ok(bytes) => {
                self.audio.borrow_mut().insert(url.to_string(), Rc::new(bytes));
            }
            Err(err) => gloo::console::warn!("preload: audio skipped", url, err.to_string()),
        }
    }

    async fn preload_images(
        &self,
        urls: &[String],
        phase: PreloadPhase,
        tick: &dyn Fn(PreloadPhase, &str),
    ) {
        join_all(urls.iter().map(|url| async move {
            self.preload_image(url).await;
            tick(phase, url);
        }))
        .await;
    }

    async fn preload_tracks(&self, urls: &[String], tick: &dyn Fn(PreloadPhase, &str)) {
        join_all(urls.iter().map(|url| async move {
            self.preload_audio(url).await;
            tick(PreloadPhase::Audio, url);
        }))
        .await;
    }

    /// Runs `plan`: priority images first, then the rest side by side.
    /// Failures are logged and counted as done.
    pub(crate) async fn smart_preload(&self, plan: &PreloadPlan, on_progress: ProgressHook) {
        let progress = RefCell::new(PreloadProgress::new(plan.total()));
        let tick = |phase: PreloadPhase, url: &str| {
            let snapshot = {
                let mut progress = progress.borrow_mut();
                progress.advance(phase, url);
                progress.clone()
            };
            on_progress(snapshot);
        };

        gloo::console::log!("preload: priority images", plan.priority.len());
        self.preload_images(&plan.priority, PreloadPhase::Priority, &tick).await;

        gloo::console::log!(
            "preload: remaining",
            plan.current.len() + plan.other.len(),
            "images,",
            plan.audio.len(),
            "tracks"
        );
        join3(
            self.preload_images(&plan.current, PreloadPhase::CurrentImages, &tick),
            self.preload_images(&plan.other, PreloadPhase::OtherImages, &tick),
            self.preload_tracks(&plan.audio, &tick),
        )
        .await;

        let (images, tracks) = self.cache_stats();
        gloo::console::log!("preload: done", images, "images", tracks, "tracks");
    }
}

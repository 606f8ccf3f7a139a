use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use calm_puzzle_core::manifest::{normalize_path, AUDIO_MANIFEST_URL};
use calm_puzzle_core::{AudioManifest, Settings};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, GainNode};

use crate::error::WebError;
use crate::fetch::{fetch_bytes, fetch_text};
use crate::preloader::ResourcePreloader;

const CROSSFADE_SECS: f64 = 0.35;
const SFX_GAIN: f32 = 0.9;

struct AudioGraph {
    ctx: AudioContext,
    music: GainNode,
    sfx: GainNode,
    channels: [GainNode; 2],
}

impl AudioGraph {
    fn new(music_on: bool) -> Result<Self, WebError> {
        let ctx = AudioContext::new()?;
        let master = ctx.create_gain()?;
        master.connect_with_audio_node(&ctx.destination())?;
        let music = ctx.create_gain()?;
        music.connect_with_audio_node(&master)?;
        music.gain().set_value(if music_on { 1.0 } else { 0.0 });
        let sfx = ctx.create_gain()?;
        sfx.connect_with_audio_node(&master)?;
        sfx.gain().set_value(SFX_GAIN);
        let a = ctx.create_gain()?;
        let b = ctx.create_gain()?;
        a.connect_with_audio_node(&music)?;
        b.connect_with_audio_node(&music)?;
        a.gain().set_value(1.0);
        b.gain().set_value(0.0);
        Ok(Self {
            ctx,
            music,
            sfx,
            channels: [a, b],
        })
    }

    async fn resume(&self) {
        if let Ok(promise) = self.ctx.resume() {
            let _ = JsFuture::from(promise).await;
        }
    }
}

/// Background music on two crossfaded channels plus a one-shot snap effect.
/// The context is created on the first user gesture.
pub(crate) struct AudioManager {
    preloader: Rc<ResourcePreloader>,
    graph: RefCell<Option<Rc<AudioGraph>>>,
    sources: RefCell<[Option<AudioBufferSourceNode>; 2]>,
    active: Cell<usize>,
    manifest: RefCell<Option<AudioManifest>>,
    buffers: RefCell<HashMap<String, AudioBuffer>>,
    snap: RefCell<Option<AudioBuffer>>,
    music_on: Cell<bool>,
    sfx_on: Cell<bool>,
    rng: RefCell<SmallRng>,
}

impl AudioManager {
    pub(crate) fn new(preloader: Rc<ResourcePreloader>, settings: Settings) -> Self {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        Self {
            preloader,
            graph: RefCell::new(None),
            sources: RefCell::new([None, None]),
            active: Cell::new(0),
            manifest: RefCell::new(None),
            buffers: RefCell::new(HashMap::new()),
            snap: RefCell::new(None),
            music_on: Cell::new(settings.music_on),
            sfx_on: Cell::new(settings.sfx_on),
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub(crate) fn set_manifest(&self, manifest: AudioManifest) {
        *self.manifest.borrow_mut() = Some(manifest);
    }

    fn graph(&self) -> Option<Rc<AudioGraph>> {
        self.graph.borrow().clone()
    }

    /// Creates the context on first use, resumes it otherwise.
    pub(crate) async fn ensure_started(&self) -> Result<(), WebError> {
        if let Some(graph) = self.graph() {
            graph.resume().await;
            return Ok(());
        }
        let graph = Rc::new(AudioGraph::new(self.music_on.get())?);
        *self.graph.borrow_mut() = Some(Rc::clone(&graph));
        graph.resume().await;
        self.load_manifest().await?;
        let snap_url = self
            .manifest
            .borrow()
            .as_ref()
            .and_then(|manifest| manifest.sfx.snap.clone());
        if let Some(url) = snap_url {
            match self.load_buffer(&graph, &url).await {
                Ok(buffer) => *self.snap.borrow_mut() = Some(buffer),
                Err(err) => gloo::console::warn!("audio: snap effect unavailable", err.to_string()),
            }
        }
        Ok(())
    }

    async fn load_manifest(&self) -> Result<(), WebError> {
        if self.manifest.borrow().is_some() {
            return Ok(());
        }
        let raw = fetch_text(AUDIO_MANIFEST_URL).await?;
        *self.manifest.borrow_mut() = Some(AudioManifest::from_json(&raw)?);
        Ok(())
    }

    async fn load_buffer(&self, graph: &AudioGraph, url: &str) -> Result<AudioBuffer, WebError> {
        let url = normalize_path(url);
        if let Some(buffer) = self.buffers.borrow().get(&url) {
            return Ok(buffer.clone());
        }
        let bytes = match self.preloader.preloaded_audio(&url) {
            Some(bytes) => bytes,
            None => Rc::new(fetch_bytes(&url).await?),
        };
        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let decoded = JsFuture::from(graph.ctx.decode_audio_data(&array.buffer())?).await?;
        let buffer: AudioBuffer = decoded.dyn_into()?;
        self.buffers.borrow_mut().insert(url, buffer.clone());
        Ok(buffer)
    }

    pub(crate) fn set_music_on(&self, on: bool) {
        self.music_on.set(on);
        if let Some(graph) = self.graph() {
            graph.music.gain().set_value(if on { 1.0 } else { 0.0 });
        }
    }

    pub(crate) fn set_sfx_on(&self, on: bool) {
        self.sfx_on.set(on);
    }

    pub(crate) async fn play_random(&self) -> Result<(), WebError> {
        if !self.music_on.get() {
            return Ok(());
        }
        self.ensure_started().await?;
        let track = self.manifest.borrow().as_ref().and_then(|manifest| {
            manifest
                .random_track(&mut *self.rng.borrow_mut())
                .map(str::to_string)
        });
        match track {
            Some(url) => self.play_url(&url).await,
            None => Ok(()),
        }
    }

    /// Crossfades from the audible channel to `url`, looping.
    pub(crate) async fn play_url(&self, url: &str) -> Result<(), WebError> {
        if !self.music_on.get() {
            return Ok(());
        }
        self.ensure_started().await?;
        let Some(graph) = self.graph() else {
            return Ok(());
        };
        let buffer = self.load_buffer(&graph, url).await?;
        let current = self.active.get();
        let next = 1 - current;

        let source = graph.ctx.create_buffer_source()?;
        source.set_buffer(Some(&buffer));
        source.set_loop(true);
        source.connect_with_audio_node(&graph.channels[next])?;

        let now = graph.ctx.current_time();
        let incoming = graph.channels[next].gain();
        incoming.cancel_scheduled_values(now)?;
        incoming.set_value_at_time(0.0, now)?;
        incoming.linear_ramp_to_value_at_time(1.0, now + CROSSFADE_SECS)?;
        let outgoing = graph.channels[current].gain();
        outgoing.cancel_scheduled_values(now)?;
        outgoing.set_value_at_time(outgoing.value(), now)?;
        outgoing.linear_ramp_to_value_at_time(0.0, now + CROSSFADE_SECS)?;

        {
            let mut sources = self.sources.borrow_mut();
            if let Some(previous) = sources[next].take() {
                let _ = previous.stop();
            }
            source.start()?;
            sources[next] = Some(source);
        }
        self.active.set(next);
        gloo::console::log!("audio: now playing", url);
        Ok(())
    }

    pub(crate) fn stop_all(&self) {
        for source in self.sources.borrow_mut().iter_mut() {
            if let Some(source) = source.take() {
                let _ = source.stop();
            }
        }
    }

    /// Fire and forget. Silently does nothing before the context exists.
    pub(crate) fn play_sfx_snap(&self) {
        if !self.sfx_on.get() {
            return;
        }
        let Some(graph) = self.graph() else {
            return;
        };
        let Some(buffer) = self.snap.borrow().clone() else {
            return;
        };
        if graph.ctx.state() == AudioContextState::Suspended {
            let _ = graph.ctx.resume();
        }
        let played = graph.ctx.create_buffer_source().and_then(|source| {
            source.set_buffer(Some(&buffer));
            source.connect_with_audio_node(&graph.sfx)?;
            source.start()
        });
        if let Err(err) = played {
            gloo::console::warn!("audio: snap effect failed", err);
        }
    }
}

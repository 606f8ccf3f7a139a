use std::cell::RefCell;
use std::rc::Rc;

use calm_puzzle_core::manifest::{normalize_path, PHRASES_URL};
use calm_puzzle_core::{
    grid_label, pick_next_image, puzzle_config_for, EngineHooks, ImageManifest, PhrasePicker,
    Settings, FALLBACK_PHRASE,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::app::SettingsToggles;
use crate::audio::AudioManager;
use crate::engine_host::PuzzleHost;
use crate::fetch::{fetch_text, load_image};
use crate::orientation::{current_config, OrientationWatcher};
use crate::preloader::ResourcePreloader;

/// One "show this image" request. The nonce makes a repeat of the same url
/// a new request, so a folder with a single image still restarts.
#[derive(Clone, PartialEq, Eq)]
struct ImageRequest {
    url: String,
    nonce: u64,
}

fn next_request(
    images: &ImageManifest,
    folder: &str,
    current: Option<&str>,
    rng: &mut SmallRng,
    nonce: &mut u64,
) -> Option<ImageRequest> {
    let url = pick_next_image(images.folder(folder), current, rng)?;
    *nonce += 1;
    Some(ImageRequest {
        url: normalize_path(url),
        nonce: *nonce,
    })
}

async fn next_phrase(
    phrases: &RefCell<Option<PhrasePicker>>,
    rng: &RefCell<SmallRng>,
) -> String {
    if phrases.borrow().is_none() {
        let picker = match fetch_text(PHRASES_URL).await {
            Ok(text) => PhrasePicker::parse(&text),
            Err(err) => {
                gloo::console::warn!("phrases: unavailable", err.to_string());
                PhrasePicker::default()
            }
        };
        gloo::console::log!("phrases: loaded", picker.len());
        *phrases.borrow_mut() = Some(picker);
    }
    phrases
        .borrow_mut()
        .as_mut()
        .and_then(|picker| picker.pick(&mut *rng.borrow_mut()))
        .unwrap_or_else(|| FALLBACK_PHRASE.to_string())
}

#[derive(Properties)]
pub(crate) struct GameViewProps {
    pub(crate) audio: Rc<AudioManager>,
    pub(crate) preloader: Rc<ResourcePreloader>,
    pub(crate) images: Rc<ImageManifest>,
    pub(crate) settings: Settings,
    pub(crate) on_back: Callback<()>,
    pub(crate) on_toggle_music: Callback<()>,
    pub(crate) on_toggle_sfx: Callback<()>,
}

impl PartialEq for GameViewProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.audio, &other.audio)
            && Rc::ptr_eq(&self.preloader, &other.preloader)
            && Rc::ptr_eq(&self.images, &other.images)
            && self.settings == other.settings
            && self.on_back == other.on_back
            && self.on_toggle_music == other.on_toggle_music
            && self.on_toggle_sfx == other.on_toggle_sfx
    }
}

#[function_component(GameView)]
pub(crate) fn game_view(props: &GameViewProps) -> Html {
    let config = use_state(current_config);
    let request = use_state(|| None::<ImageRequest>);
    let changing = use_state(|| true);
    let completion = use_state(|| None::<String>);
    let canvas_ref = use_node_ref();
    let host = use_mut_ref(|| None::<Rc<PuzzleHost>>);
    let phrases = use_mut_ref(|| None::<PhrasePicker>);
    let rng = use_mut_ref(|| {
        SmallRng::seed_from_u64((js_sys::Math::random() * u32::MAX as f64) as u64)
    });
    let nonce = use_mut_ref(|| 0_u64);
    let load_token = use_mut_ref(|| 0_u64);
    let started_at = use_mut_ref(js_sys::Date::now);
    let last_url = use_mut_ref(|| None::<String>);

    // Pick an image whenever there is no pending request for the folder.
    {
        let images = props.images.clone();
        let request = request.clone();
        let changing = changing.clone();
        let rng = rng.clone();
        let nonce = nonce.clone();
        let last_url = last_url.clone();
        let folder = config.image_folder;
        let idle = request.is_none();
        let available = images.folder(folder).len();
        use_effect_with((folder, idle, available), move |(folder, idle, _)| {
            if *idle {
                let current = last_url.borrow().clone();
                let next = next_request(
                    &images,
                    folder,
                    current.as_deref(),
                    &mut rng.borrow_mut(),
                    &mut nonce.borrow_mut(),
                );
                match next {
                    Some(next) => request.set(Some(next)),
                    None => {
                        gloo::console::warn!("puzzle: no images for", *folder);
                        changing.set(false);
                    }
                }
            }
            || ()
        });
    }

    // Load the requested image and remount the engine on it.
    {
        let audio = props.audio.clone();
        let preloader = props.preloader.clone();
        let canvas_ref = canvas_ref.clone();
        let host = host.clone();
        let changing = changing.clone();
        let completion = completion.clone();
        let phrases = phrases.clone();
        let rng = rng.clone();
        let load_token = load_token.clone();
        let started_at = started_at.clone();
        let last_url = last_url.clone();
        use_effect_with((*request).clone(), move |request| {
            if let Some(request) = request.clone() {
                let token = {
                    let mut token = load_token.borrow_mut();
                    *token += 1;
                    *token
                };
                spawn_local(async move {
                    let loaded = match preloader.preloaded_image(&request.url) {
                        Some(image) => Ok(image),
                        None => load_image(&request.url).await,
                    };
                    if *load_token.borrow() != token {
                        return;
                    }
                    let image = match loaded {
                        Ok(image) => image,
                        Err(err) => {
                            gloo::console::warn!(
                                "puzzle: image failed",
                                request.url,
                                err.to_string()
                            );
                            changing.set(false);
                            return;
                        }
                    };
                    let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                        changing.set(false);
                        return;
                    };
                    if let Some(previous) = host.borrow_mut().take() {
                        previous.unmount();
                    }

                    let on_snap = {
                        let audio = audio.clone();
                        Rc::new(move || audio.play_sfx_snap()) as Rc<dyn Fn()>
                    };
                    // Runs while the engine is borrowed, so the UI work is
                    // pushed onto a task.
                    let on_complete = {
                        let completion = completion.clone();
                        let phrases = phrases.clone();
                        let rng = rng.clone();
                        let started_at = started_at.clone();
                        Rc::new(move || {
                            let completion = completion.clone();
                            let phrases = phrases.clone();
                            let rng = rng.clone();
                            let elapsed = (js_sys::Date::now() - *started_at.borrow()) / 1000.0;
                            spawn_local(async move {
                                let phrase = next_phrase(&phrases, &rng).await;
                                gloo::console::log!(
                                    "puzzle: solved in",
                                    format!("{elapsed:.1}s")
                                );
                                completion.set(Some(phrase));
                            });
                        }) as Rc<dyn Fn()>
                    };
                    let on_orientation_change = Rc::new(|rows: u32, cols: u32| {
                        gloo::console::log!(
                            "puzzle: grid follows orientation",
                            format!("{rows}x{cols}")
                        );
                    }) as Rc<dyn Fn(u32, u32)>;
                    let hooks = EngineHooks {
                        on_snap,
                        on_complete,
                        on_orientation_change,
                    };

                    let config = current_config();
                    match PuzzleHost::mount(canvas, image, config, hooks) {
                        Ok(mounted) => {
                            *host.borrow_mut() = Some(mounted);
                            *started_at.borrow_mut() = js_sys::Date::now();
                            *last_url.borrow_mut() = Some(request.url.clone());
                        }
                        Err(err) => gloo::console::warn!("puzzle: mount failed", err.to_string()),
                    }
                    changing.set(false);
                });
            }
            || ()
        });
    }

    // Follow landscape/portrait flips with a new grid and a new image.
    {
        let host = host.clone();
        let config = config.clone();
        let request = request.clone();
        let changing = changing.clone();
        use_effect_with((), move |_| {
            let watcher = OrientationWatcher::new(move |orientation| {
                let next = puzzle_config_for(orientation);
                gloo::console::log!("orientation:", orientation.label());
                let current = host.borrow().clone();
                if let Some(current) = current {
                    current.update_grid_config(orientation, next.rows, next.cols);
                }
                config.set(next);
                changing.set(true);
                request.set(None);
            });
            move || drop(watcher)
        });
    }

    {
        let host = host.clone();
        let load_token = load_token.clone();
        use_effect_with((), move |_| {
            move || {
                *load_token.borrow_mut() += 1;
                if let Some(current) = host.borrow_mut().take() {
                    current.unmount();
                }
            }
        });
    }

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let on_next_image = {
        let images = props.images.clone();
        let request = request.clone();
        let changing = changing.clone();
        let completion = completion.clone();
        let rng = rng.clone();
        let nonce = nonce.clone();
        let folder = config.image_folder;
        Callback::from(move |_: MouseEvent| {
            completion.set(None);
            if *changing {
                return;
            }
            let current = (*request).as_ref().map(|request| request.url.clone());
            let next = next_request(
                &images,
                folder,
                current.as_deref(),
                &mut rng.borrow_mut(),
                &mut nonce.borrow_mut(),
            );
            if let Some(next) = next {
                changing.set(true);
                request.set(Some(next));
            }
        })
    };

    let on_next_track = {
        let audio = props.audio.clone();
        Callback::from(move |_: MouseEvent| {
            let audio = audio.clone();
            spawn_local(async move {
                if let Err(err) = audio.play_random().await {
                    gloo::console::warn!("audio: next track failed", err.to_string());
                }
            });
        })
    };

    let on_continue = {
        let completion = completion.clone();
        Callback::from(move |_: MouseEvent| completion.set(None))
    };

    let modal = match &*completion {
        Some(phrase) => html! {
            <div class="modal-backdrop">
                <div class="modal" role="dialog">
                    <div class="modal-title">{ "Complete" }</div>
                    <p class="phrase">{ phrase.clone() }</p>
                    <button onclick={on_continue}>{ "Continue" }</button>
                </div>
            </div>
        },
        None => html! {},
    };

    html! {
        <div class="game">
            <div class="toolbar">
                <button onclick={on_back}>{ "Back" }</button>
                <SettingsToggles
                    settings={props.settings}
                    on_toggle_music={props.on_toggle_music.clone()}
                    on_toggle_sfx={props.on_toggle_sfx.clone()}
                />
                <button onclick={on_next_image} disabled={*changing}>
                    { if *changing { "Loading..." } else { "Next image" } }
                </button>
                <button onclick={on_next_track} disabled={!props.settings.music_on}>
                    { "Next track" }
                </button>
                <span class="badge">{ grid_label(config.grid()) }</span>
            </div>
            <div class="canvas-wrap">
                <canvas ref={canvas_ref} />
            </div>
            { modal }
        </div>
    }
}

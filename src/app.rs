use std::rc::Rc;

use calm_puzzle_core::manifest::{AUDIO_MANIFEST_URL, IMAGES_MANIFEST_URL};
use calm_puzzle_core::{AudioManifest, ImageManifest, PreloadPlan, PreloadProgress, Settings};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::audio::AudioManager;
use crate::error::WebError;
use crate::fetch::fetch_text;
use crate::game_view::GameView;
use crate::orientation::current_orientation;
use crate::persisted::{load_settings, save_music_on, save_sfx_on};
use crate::preloader::ResourcePreloader;

const READY_DELAY_MS: u32 = 500;
const FAILED_DELAY_MS: u32 = 1000;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Loading,
    Home,
    Game,
}

async fn fetch_manifests() -> Result<(ImageManifest, AudioManifest), WebError> {
    let images = ImageManifest::from_json(&fetch_text(IMAGES_MANIFEST_URL).await?)?;
    let audio = AudioManifest::from_json(&fetch_text(AUDIO_MANIFEST_URL).await?)?;
    Ok((images, audio))
}

#[derive(Properties, PartialEq)]
struct ToggleProps {
    pressed: bool,
    label: AttrValue,
    on_toggle: Callback<()>,
}

#[function_component(ToggleButton)]
fn toggle_button(props: &ToggleProps) -> Html {
    let on_toggle = props.on_toggle.clone();
    let onclick = Callback::from(move |_: MouseEvent| on_toggle.emit(()));
    let state = if props.pressed { "on" } else { "off" };
    html! {
        <button aria-pressed={props.pressed.to_string()} {onclick}>
            { format!("{} {state}", props.label) }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsToggleProps {
    pub(crate) settings: Settings,
    pub(crate) on_toggle_music: Callback<()>,
    pub(crate) on_toggle_sfx: Callback<()>,
}

#[function_component(SettingsToggles)]
pub(crate) fn settings_toggles(props: &SettingsToggleProps) -> Html {
    html! {
        <div class="row">
            <ToggleButton
                pressed={props.settings.music_on}
                label="Music"
                on_toggle={props.on_toggle_music.clone()}
            />
            <ToggleButton
                pressed={props.settings.sfx_on}
                label="Sound"
                on_toggle={props.on_toggle_sfx.clone()}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct LoadingProps {
    progress: PreloadProgress,
}

#[function_component(LoadingScreen)]
fn loading_screen(props: &LoadingProps) -> Html {
    let percentage = props.progress.percentage();
    let class = classes!("loading-screen", props.progress.is_done().then_some("done"));
    html! {
        <div {class}>
            <h1>{ "Calm Puzzle" }</h1>
            <div class="progress-bar">
                <div class="progress-fill" style={format!("width: {percentage}%")} />
            </div>
            <div class="progress-text">
                <span>{ format!("{}%", percentage.round()) }</span>
                <span>{ format!("{} / {}", props.progress.loaded, props.progress.total) }</span>
            </div>
            <div class="loading-tip">{ props.progress.tip() }</div>
        </div>
    }
}

#[derive(Properties)]
struct HomeProps {
    audio: Rc<AudioManager>,
    settings: Settings,
    on_start: Callback<()>,
    on_toggle_music: Callback<()>,
    on_toggle_sfx: Callback<()>,
}

impl PartialEq for HomeProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.audio, &other.audio)
            && self.settings == other.settings
            && self.on_start == other.on_start
            && self.on_toggle_music == other.on_toggle_music
            && self.on_toggle_sfx == other.on_toggle_sfx
    }
}

#[function_component(HomeScreen)]
fn home_screen(props: &HomeProps) -> Html {
    let starting = use_state(|| false);
    let onclick = {
        let starting = starting.clone();
        let audio = props.audio.clone();
        let music_on = props.settings.music_on;
        let on_start = props.on_start.clone();
        Callback::from(move |_: MouseEvent| {
            starting.set(true);
            let audio = audio.clone();
            let on_start = on_start.clone();
            // Audio has to be unlocked from inside a user gesture.
            spawn_local(async move {
                if let Err(err) = audio.ensure_started().await {
                    gloo::console::warn!("audio: start failed", err.to_string());
                }
                if music_on {
                    if let Err(err) = audio.play_random().await {
                        gloo::console::warn!("audio: play failed", err.to_string());
                    }
                } else {
                    audio.set_music_on(false);
                    audio.stop_all();
                }
                on_start.emit(());
            });
        })
    };
    html! {
        <div class="card">
            <div class="title">{ "Calm Puzzle" }</div>
            <div class="subtitle">{ "Relax, no pressure, just the moment." }</div>
            <div class="row">
                <button {onclick} disabled={*starting}>
                    { if *starting { "Starting..." } else { "Start" } }
                </button>
            </div>
            <SettingsToggles
                settings={props.settings}
                on_toggle_music={props.on_toggle_music.clone()}
                on_toggle_sfx={props.on_toggle_sfx.clone()}
            />
            <p class="badge">{ "The first tap unlocks audio playback on iOS and Safari." }</p>
        </div>
    }
}

#[function_component(App)]
pub(crate) fn app() -> Html {
    let preloader = use_memo((), |_| ResourcePreloader::new());
    let settings = use_state(load_settings);
    let audio = {
        let preloader = preloader.clone();
        let initial = *settings;
        use_memo((), move |_| AudioManager::new(preloader, initial))
    };
    let screen = use_state(|| Screen::Loading);
    let progress = use_state(PreloadProgress::default);
    let images = use_state(|| Rc::new(ImageManifest::default()));

    {
        let preloader = preloader.clone();
        let audio = audio.clone();
        let screen = screen.clone();
        let progress = progress.clone();
        let images = images.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let (image_manifest, audio_manifest) = match fetch_manifests().await {
                    Ok(manifests) => manifests,
                    Err(err) => {
                        gloo::console::warn!("preload: manifests unavailable", err.to_string());
                        TimeoutFuture::new(FAILED_DELAY_MS).await;
                        screen.set(Screen::Home);
                        return;
                    }
                };
                if image_manifest.is_empty() {
                    gloo::console::warn!("preload: image manifest has no folders");
                }
                let plan =
                    PreloadPlan::smart(current_orientation(), &image_manifest, &audio_manifest.bgm);
                audio.set_manifest(audio_manifest);
                images.set(Rc::new(image_manifest));
                let on_progress = progress.clone();
                preloader
                    .smart_preload(&plan, Rc::new(move |next| on_progress.set(next)))
                    .await;
                TimeoutFuture::new(READY_DELAY_MS).await;
                screen.set(Screen::Home);
            });
            || ()
        });
    }

    {
        let audio = audio.clone();
        let in_game = *screen == Screen::Game;
        let music_on = settings.music_on;
        use_effect_with((in_game, music_on), move |(in_game, music_on)| {
            if *in_game && *music_on {
                spawn_local(async move {
                    if let Err(err) = audio.ensure_started().await {
                        gloo::console::warn!("audio: start failed", err.to_string());
                    }
                });
            }
            || ()
        });
    }

    let on_toggle_music = {
        let settings = settings.clone();
        let audio = audio.clone();
        Callback::from(move |_: ()| {
            let next = !settings.music_on;
            save_music_on(next);
            settings.set(Settings {
                music_on: next,
                ..*settings
            });
            audio.set_music_on(next);
            if next {
                let audio = audio.clone();
                spawn_local(async move {
                    if let Err(err) = audio.play_random().await {
                        gloo::console::warn!("audio: play failed", err.to_string());
                    }
                });
            } else {
                audio.stop_all();
            }
        })
    };

    let on_toggle_sfx = {
        let settings = settings.clone();
        let audio = audio.clone();
        Callback::from(move |_: ()| {
            let next = !settings.sfx_on;
            save_sfx_on(next);
            settings.set(Settings {
                sfx_on: next,
                ..*settings
            });
            audio.set_sfx_on(next);
        })
    };

    let content = match *screen {
        Screen::Loading => html! { <LoadingScreen progress={(*progress).clone()} /> },
        Screen::Home => {
            let screen = screen.clone();
            html! {
                <HomeScreen
                    audio={audio.clone()}
                    settings={*settings}
                    on_start={Callback::from(move |_: ()| screen.set(Screen::Game))}
                    on_toggle_music={on_toggle_music}
                    on_toggle_sfx={on_toggle_sfx}
                />
            }
        }
        Screen::Game => {
            let screen = screen.clone();
            html! {
                <GameView
                    audio={audio.clone()}
                    preloader={preloader.clone()}
                    images={(*images).clone()}
                    settings={*settings}
                    on_back={Callback::from(move |_: ()| screen.set(Screen::Home))}
                    on_toggle_music={on_toggle_music}
                    on_toggle_sfx={on_toggle_sfx}
                />
            }
        }
    };

    html! { <div class="container">{ content }</div> }
}

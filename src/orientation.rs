use std::cell::Cell;

use calm_puzzle_core::{puzzle_config_for_viewport, Orientation, PuzzleConfig};
use gloo::events::EventListener;

pub(crate) fn viewport_size() -> (f32, f32) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0) as f32
    };
    (read(window.inner_width()), read(window.inner_height()))
}

pub(crate) fn current_orientation() -> Orientation {
    let (width, height) = viewport_size();
    Orientation::from_viewport(width, height)
}

/// Grid and image folder for the viewport as it is now.
pub(crate) fn current_config() -> PuzzleConfig {
    let (width, height) = viewport_size();
    puzzle_config_for_viewport(width, height)
}

/// Calls back only when the viewport crosses between landscape and portrait.
/// Dropping the watcher detaches it.
pub(crate) struct OrientationWatcher {
    _listener: EventListener,
}

impl OrientationWatcher {
    pub(crate) fn new(on_change: impl Fn(Orientation) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let last = Cell::new(current_orientation());
        let listener = EventListener::new(&window, "resize", move |_event| {
            let next = current_orientation();
            if last.replace(next) != next {
                on_change(next);
            }
        });
        Some(Self {
            _listener: listener,
        })
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use calm_puzzle_core::{
    grid_label, EngineHooks, EngineOptions, Orientation, PuzzleConfig, PuzzleEngine,
    ReleaseOutcome,
};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, HtmlImageElement, PointerEvent, TouchEvent};

use crate::canvas_surface::{CanvasSurface, PuzzleImage};
use crate::error::WebError;
use crate::input::{first_touch_point, pointer_point, InputSource, PointerKind};
use crate::orientation::current_orientation;

const ACTIVE: EventListenerOptions = EventListenerOptions {
    phase: EventListenerPhase::Bubble,
    passive: false,
};

fn random_seed() -> u64 {
    let high = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let low = js_sys::Date::now() as u64;
    (high << 32) ^ low
}

/// Browser glue around one engine: canvas surface, input adapters and the
/// frame loop. The engine is only borrowed inside a single handler or frame.
pub(crate) struct PuzzleHost {
    canvas: HtmlCanvasElement,
    engine: RefCell<PuzzleEngine<CanvasSurface>>,
    listeners: RefCell<Vec<EventListener>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl PuzzleHost {
    pub(crate) fn mount(
        canvas: HtmlCanvasElement,
        image: HtmlImageElement,
        config: PuzzleConfig,
        hooks: EngineHooks,
    ) -> Result<Rc<Self>, WebError> {
        let surface = CanvasSurface::new(canvas.clone())?;
        let options = EngineOptions {
            rows: config.rows,
            cols: config.cols,
            seed: random_seed(),
            hooks,
            ..EngineOptions::default()
        };
        let mut engine = PuzzleEngine::new(surface, PuzzleImage::new(image), options)?;
        let orientation = current_orientation();
        engine.mount(orientation)?;
        gloo::console::log!(
            "puzzle: mounted",
            grid_label(engine.grid()),
            orientation.label(),
            engine.tiles().len(),
            "tiles"
        );
        let host = Rc::new(Self {
            canvas,
            engine: RefCell::new(engine),
            listeners: RefCell::new(Vec::new()),
            frame: RefCell::new(None),
        });
        host.install_listeners();
        host.schedule_frame();
        Ok(host)
    }

    /// Detaches listeners and stops the frame loop. Safe to call twice.
    pub(crate) fn unmount(&self) {
        self.listeners.borrow_mut().clear();
        self.frame.borrow_mut().take();
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => {
                if engine.is_mounted() {
                    gloo::console::log!("puzzle: unmounted");
                }
                engine.unmount();
            }
            Err(_) => gloo::console::warn!("puzzle: unmount while engine busy"),
        }
    }

    pub(crate) fn update_grid_config(&self, orientation: Orientation, rows: u32, cols: u32) {
        let mut engine = self.engine.borrow_mut();
        engine.resize(orientation);
        match engine.update_grid_config(rows, cols) {
            Ok(true) => gloo::console::log!(
                "puzzle: grid rebuilt",
                format!("{rows}x{cols}"),
                "generation",
                engine.generation() as f64
            ),
            Ok(false) => {}
            Err(err) => gloo::console::warn!("puzzle: grid update rejected", err.to_string()),
        }
    }

    fn schedule_frame(self: &Rc<Self>) {
        let host = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            host.frame.borrow_mut().take();
            let drawn = host.engine.borrow_mut().render_frame();
            if drawn {
                host.schedule_frame();
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn press(&self, source: InputSource, x: f32, y: f32) -> bool {
        let mut engine = self.engine.borrow_mut();
        if !engine.press_at(x, y) {
            return false;
        }
        if let Some(tile) = engine.tiles().last() {
            gloo::console::log!(
                "puzzle: grab",
                source.label(),
                format!("[{},{}]", tile.row, tile.col)
            );
        }
        true
    }

    fn drag_to(&self, x: f32, y: f32) {
        self.engine.borrow_mut().move_to(x, y);
    }

    fn is_dragging(&self) -> bool {
        self.engine.borrow().drag_session().is_some()
    }

    fn release(&self, source: InputSource) {
        let (outcome, threshold) = {
            let mut engine = self.engine.borrow_mut();
            let outcome = engine.release();
            (outcome, engine.snap_threshold())
        };
        log_release(source, outcome, threshold);
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        let window = match web_sys::window() {
            Some(window) => window,
            None => {
                gloo::console::warn!("puzzle: no window, input disabled");
                return;
            }
        };

        let host = Rc::clone(self);
        listeners.push(EventListener::new(&window, "resize", move |_event| {
            host.engine.borrow_mut().resize(current_orientation());
        }));

        let host = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &self.canvas,
            "pointerdown",
            ACTIVE,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let Some((source, x, y)) = pointer_point(event, &host.canvas) else {
                    return;
                };
                if host.press(source, x, y) {
                    if let Err(err) = host.canvas.set_pointer_capture(event.pointer_id()) {
                        gloo::console::warn!("puzzle: pointer capture failed", err);
                    }
                }
            },
        ));

        let host = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &window,
            "pointermove",
            ACTIVE,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if let Some((_, x, y)) = pointer_point(event, &host.canvas) {
                    host.drag_to(x, y);
                }
            },
        ));

        for name in ["pointerup", "pointercancel"] {
            let host = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &window,
                name,
                ACTIVE,
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    let kind = PointerKind::from_pointer_type(&event.pointer_type());
                    host.release(InputSource::Pointer(kind));
                },
            ));
        }

        let host = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &self.canvas,
            "touchstart",
            ACTIVE,
            move |event: &Event| {
                event.prevent_default();
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                if let Some((source, x, y)) = first_touch_point(event, &host.canvas) {
                    host.press(source, x, y);
                }
            },
        ));

        let host = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &window,
            "touchmove",
            ACTIVE,
            move |event: &Event| {
                if !host.is_dragging() {
                    return;
                }
                event.prevent_default();
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                if let Some((_, x, y)) = first_touch_point(event, &host.canvas) {
                    host.drag_to(x, y);
                }
            },
        ));

        for name in ["touchend", "touchcancel"] {
            let host = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &window,
                name,
                ACTIVE,
                move |event: &Event| {
                    if !host.is_dragging() {
                        return;
                    }
                    event.prevent_default();
                    host.release(InputSource::LegacyTouch);
                },
            ));
        }

        *self.listeners.borrow_mut() = listeners;
    }
}

fn log_release(source: InputSource, outcome: ReleaseOutcome, threshold: f32) {
    match outcome {
        ReleaseOutcome::Ignored => {}
        ReleaseOutcome::Dropped { row, col, distance } => gloo::console::log!(
            "puzzle: drop",
            source.label(),
            format!("[{row},{col}] {}px of {threshold}px, too far", distance.round())
        ),
        ReleaseOutcome::Snapped {
            row,
            col,
            distance,
            completed,
        } => {
            gloo::console::log!(
                "puzzle: snap",
                source.label(),
                format!("[{row},{col}] {}px of {threshold}px", distance.round())
            );
            if completed {
                gloo::console::log!("puzzle: complete, grid hidden");
            }
        }
    }
}

mod app;
mod audio;
mod canvas_surface;
mod engine_host;
mod error;
mod fetch;
mod game_view;
mod input;
mod orientation;
mod persisted;
mod preloader;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<app::App>::new().render();
}

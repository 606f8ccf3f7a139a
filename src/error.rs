use calm_puzzle_core::{EngineError, ManifestError};
use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub(crate) enum WebError {
    #[error("request for {url} failed with status {status}")]
    Http { url: String, status: u16 },
    #[error("javascript error: {0}")]
    Js(String),
    #[error("image failed to load: {0}")]
    ImageLoad(String),
    #[error(transparent)]
    Net(#[from] gloo::net::Error),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|message| message.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        WebError::Js(message)
    }
}

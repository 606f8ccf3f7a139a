use gloo::net::http::Request;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlImageElement};

use crate::error::WebError;

async fn get(url: &str) -> Result<gloo::net::http::Response, WebError> {
    let response = Request::get(url).send().await?;
    if !response.ok() {
        return Err(WebError::Http {
            url: url.to_string(),
            status: response.status(),
        });
    }
    Ok(response)
}

pub(crate) async fn fetch_text(url: &str) -> Result<String, WebError> {
    Ok(get(url).await?.text().await?)
}

pub(crate) async fn fetch_bytes(url: &str) -> Result<Vec<u8>, WebError> {
    Ok(get(url).await?.binary().await?)
}

fn image_to_promise(image: &HtmlImageElement) -> js_sys::Promise {
    js_sys::Promise::new(&mut |resolve, reject| {
        let on_load = wasm_bindgen::closure::Closure::once(move |_event: Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let on_error = wasm_bindgen::closure::Closure::once(move |_event: Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("image load failed"));
        });
        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_load.forget();
        on_error.forget();
    })
}

/// Loads and decodes an image. `url` should already be site-root relative.
pub(crate) async fn load_image(url: &str) -> Result<HtmlImageElement, WebError> {
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));
    let loaded = image_to_promise(&image);
    image.set_src(url);
    wasm_bindgen_futures::JsFuture::from(loaded)
        .await
        .map_err(|_| WebError::ImageLoad(url.to_string()))?;
    image.set_onload(None);
    image.set_onerror(None);
    Ok(image)
}

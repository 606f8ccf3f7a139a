use web_sys::{DomRect, HtmlCanvasElement, PointerEvent, TouchEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointerKind {
    Mouse,
    Touch,
    Pen,
    Unknown,
}

impl PointerKind {
    pub(crate) fn from_pointer_type(value: &str) -> Self {
        match value {
            "mouse" => PointerKind::Mouse,
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Unknown,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            PointerKind::Mouse => "mouse",
            PointerKind::Touch => "touch",
            PointerKind::Pen => "pen",
            PointerKind::Unknown => "pointer",
        }
    }
}

/// Which adapter delivered an event. Both feed the same engine calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputSource {
    Pointer(PointerKind),
    LegacyTouch,
}

impl InputSource {
    pub(crate) fn label(self) -> &'static str {
        match self {
            InputSource::Pointer(kind) => kind.label(),
            InputSource::LegacyTouch => "touch-event",
        }
    }
}

pub(crate) trait HasClientRect {
    fn client_rect(&self) -> DomRect;
}

impl HasClientRect for HtmlCanvasElement {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

/// Client coordinates to element-local CSS pixels. `None` while the element
/// has no on-screen size.
pub(crate) fn client_to_local(
    client_x: f32,
    client_y: f32,
    element: &impl HasClientRect,
) -> Option<(f32, f32)> {
    let rect = element.client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some((client_x - rect.left() as f32, client_y - rect.top() as f32))
}

pub(crate) fn pointer_point(
    event: &PointerEvent,
    element: &impl HasClientRect,
) -> Option<(InputSource, f32, f32)> {
    let kind = PointerKind::from_pointer_type(&event.pointer_type());
    let (x, y) = client_to_local(event.client_x() as f32, event.client_y() as f32, element)?;
    Some((InputSource::Pointer(kind), x, y))
}

/// First active touch, if any. `touchend` has none left and yields `None`.
pub(crate) fn first_touch_point(
    event: &TouchEvent,
    element: &impl HasClientRect,
) -> Option<(InputSource, f32, f32)> {
    let touch = event.touches().get(0)?;
    let (x, y) = client_to_local(touch.client_x() as f32, touch.client_y() as f32, element)?;
    Some((InputSource::LegacyTouch, x, y))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    struct FixedRect(DomRect);

    impl HasClientRect for FixedRect {
        fn client_rect(&self) -> DomRect {
            self.0.clone()
        }
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> FixedRect {
        FixedRect(DomRect::new_with_x_and_y_and_width_and_height(x, y, w, h).unwrap())
    }

    #[wasm_bindgen_test]
    fn pointer_type_maps_to_kind() {
        assert_eq!(PointerKind::from_pointer_type("mouse"), PointerKind::Mouse);
        assert_eq!(PointerKind::from_pointer_type("touch"), PointerKind::Touch);
        assert_eq!(PointerKind::from_pointer_type("pen"), PointerKind::Pen);
        assert_eq!(PointerKind::from_pointer_type(""), PointerKind::Unknown);
        assert_eq!(InputSource::LegacyTouch.label(), "touch-event");
    }

    #[wasm_bindgen_test]
    fn client_coords_are_offset_by_rect() {
        let element = rect(20.0, 40.0, 300.0, 200.0);
        assert_eq!(client_to_local(25.0, 50.0, &element), Some((5.0, 10.0)));
        assert_eq!(client_to_local(0.0, 0.0, &element), Some((-20.0, -40.0)));
    }

    #[wasm_bindgen_test]
    fn zero_sized_rect_is_ignored() {
        let element = rect(0.0, 0.0, 0.0, 120.0);
        assert_eq!(client_to_local(10.0, 10.0, &element), None);
    }
}

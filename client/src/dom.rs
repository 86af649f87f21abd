use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent, Window};

use polymesh_shared::Point;

use crate::geometry::normalize_point;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Value of an optional `<input>`; absent, wrong type and empty all read as `None`.
pub fn input_value(document: &Document, id: &str) -> Option<String> {
    let input: HtmlInputElement = document.get_element_by_id(id)?.dyn_into().ok()?;
    let value = input.value();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn alert(window: &Window, message: &str) {
    if window.alert_with_message(message).is_err() {
        web_sys::console::warn_1(&format!("alert unavailable: {message}").into());
    }
}

/// Canvas-relative pixel position of a mouse event. No scaling is applied.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    let x = event.client_x() as f64 - rect.left();
    let y = event.client_y() as f64 - rect.top();
    normalize_point(Point::new(x, y))
}

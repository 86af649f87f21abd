use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AbortController, CanvasRenderingContext2d, Event, HtmlButtonElement, HtmlCanvasElement,
    MouseEvent, Window,
};

use crate::actions::{begin_submission, clear, complete_submission, handle_click};
use crate::dom::{alert, event_to_point, get_element};
use crate::error::SubmitError;
use crate::net::{csrf_token, post_mesh};
use crate::render::CanvasSurface;
use crate::state::{Click, Completion, EditorState};

struct Page {
    surface: CanvasSurface,
    editor: EditorState,
    in_flight: Option<AbortController>,
}

impl Page {
    fn abort_in_flight(&mut self) {
        if let Some(controller) = self.in_flight.take() {
            controller.abort();
        }
    }
}

fn query_flag(search: &str, key: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(name, value)| name == key && (value == "1" || value == "true"))
}

fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    query_flag(&search, "debug")
}

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if document_ready_state(&document).as_deref() != Some("loading") {
        return start_app();
    }

    let started = Rc::new(Cell::new(false));
    let onready_started = started.clone();
    let onready = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onready_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", onready.as_ref().unchecked_ref())?;
    onready.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let debug = debug_enabled(&window);

    let canvas: HtmlCanvasElement = get_element(&document, "myCanvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let finish_button: HtmlButtonElement = get_element(&document, "finishBtn")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clearBtn")?;

    let page = Rc::new(RefCell::new(Page {
        surface: CanvasSurface {
            canvas: canvas.clone(),
            ctx,
        },
        editor: EditorState::new(),
        in_flight: None,
    }));

    if debug {
        web_sys::console::log_1(
            &format!(
                "PolyMesh editor ready canvas={}x{}",
                canvas.width(),
                canvas.height()
            )
            .into(),
        );
    }

    {
        let page = page.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let mut guard = page.borrow_mut();
            let page = &mut *guard;
            let Some(point) = event_to_point(&page.surface.canvas, &event) else {
                return;
            };
            let click = handle_click(&mut page.editor, &page.surface, point);
            if debug {
                let verb = match click {
                    Click::Added => "added",
                    Click::Closed => "closed at",
                };
                web_sys::console::log_1(
                    &format!(
                        "Point {verb} ({:.1}, {:.1}) total={}",
                        point.x,
                        point.y,
                        page.editor.points().len()
                    )
                    .into(),
                );
            }
        });
        canvas.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let page = page.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut page = page.borrow_mut();
            page.abort_in_flight();
            let page = &mut *page;
            clear(&mut page.editor, &page.surface);
            if debug {
                web_sys::console::log_1(&"Canvas cleared".into());
            }
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let page = page.clone();
        let window = window.clone();
        let document = document.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let (submission, controller) = {
                let mut page = page.borrow_mut();
                let submission = match begin_submission(&mut page.editor) {
                    Ok(submission) => submission,
                    Err(err) => {
                        drop(page);
                        alert(&window, &err.user_message());
                        return;
                    }
                };
                page.abort_in_flight();
                let controller = AbortController::new().ok();
                page.in_flight = controller.clone();
                (submission, controller)
            };
            let csrf = csrf_token(&document);
            if debug {
                web_sys::console::log_1(
                    &format!(
                        "Submitting polygon points={} generation={} csrf={}",
                        submission.request.points.len(),
                        submission.generation,
                        csrf.is_some()
                    )
                    .into(),
                );
            }

            let page = page.clone();
            let window = window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let signal = controller.as_ref().map(AbortController::signal);
                let outcome =
                    post_mesh(&window, &submission.request, csrf.as_deref(), signal.as_ref())
                        .await;

                let result = {
                    let mut guard = page.borrow_mut();
                    let page = &mut *guard;
                    let result =
                        complete_submission(&mut page.editor, &page.surface, &submission, outcome);
                    if submission.generation == page.editor.generation {
                        page.in_flight = None;
                    }
                    result
                };

                match result {
                    Ok(Completion::Rendered { edges }) => {
                        if debug {
                            web_sys::console::log_1(&format!("Mesh rendered edges={edges}").into());
                        }
                    }
                    Ok(Completion::Discarded) => {
                        if debug {
                            web_sys::console::log_1(
                                &format!(
                                    "Discarded stale mesh response generation={}",
                                    submission.generation
                                )
                                .into(),
                            );
                        }
                    }
                    Err(err) => {
                        if let SubmitError::TransportFailure(_) = &err {
                            web_sys::console::error_1(&format!("Fetch error: {err}").into());
                        }
                        alert(&window, &err.user_message());
                    }
                }
            });
        });
        finish_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::query_flag;

    #[test]
    fn debug_flag_needs_exact_key() {
        assert!(query_flag("?debug=1", "debug"));
        assert!(query_flag("?a=b&debug=true", "debug"));
        assert!(!query_flag("?nodebug=1", "debug"));
        assert!(!query_flag("?debug=0", "debug"));
        assert!(!query_flag("", "debug"));
    }
}

//! Small helpers over `web-sys`

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, Node, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn body() -> Result<HtmlElement, JsValue> {
    document()?
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))
}

/// All elements matching `selector`, in document order
pub fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Event listener that is removed again when dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
            .ok();
    }
}

/// Run `f` once after `delay_ms`
pub fn set_timeout(delay_ms: i32, f: impl FnOnce() + 'static) -> Result<i32, JsValue> {
    let closure = Closure::once(f);
    let id = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        delay_ms,
    )?;
    closure.forget();
    Ok(id)
}

/// Start a CSS exit animation, then detach the element once it finishes
pub fn remove_after(element: &Element, animation: &str, delay_ms: i32) -> Result<(), JsValue> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        html.style().set_property("animation", animation)?;
    }
    let element = element.clone();
    set_timeout(delay_ms, move || element.remove())?;
    Ok(())
}

/// Whether the document body still contains `element`
pub fn is_attached(element: &Element) -> bool {
    let node: &Node = element;
    body().is_ok_and(|body| body.contains(Some(node)))
}

//! Reveal-on-scroll for cards and fade-in sections

use medscene_core::page::{REVEAL_CLASS, REVEAL_ROOT_MARGIN, REVEAL_SELECTOR, REVEAL_THRESHOLD};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom;

pub struct Reveal {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Reveal {
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        entry.target().class_list().add_1(REVEAL_CLASS).ok();
                    }
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        options.set_root_margin(REVEAL_ROOT_MARGIN);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        let targets = dom::query_all(document, REVEAL_SELECTOR)?;
        for target in &targets {
            observer.observe(target);
        }
        tracing::debug!(targets = targets.len(), "Reveal observer attached");

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

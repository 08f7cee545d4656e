//! Count-up statistics that start once scrolled into view

use medscene_core::page::{CounterAnimation, COUNTER_INTERVAL_MS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry};

use crate::dom;

pub struct Counters {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Counters {
    /// Observe `.stat-number` elements; `None` without a `.stats-section`
    pub fn attach(document: &Document) -> Result<Option<Self>, JsValue> {
        if document.query_selector(".stats-section")?.is_none() {
            return Ok(None);
        }

        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let counter = entry.target();
                    observer.unobserve(&counter);
                    start(counter);
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
        for counter in dom::query_all(document, ".stat-number")? {
            observer.observe(&counter);
        }

        Ok(Some(Self {
            observer,
            _callback: callback,
        }))
    }
}

impl Drop for Counters {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn start(counter: Element) {
    let text = counter.text_content().unwrap_or_default();
    match CounterAnimation::from_text(&text) {
        Some(animation) => step(counter, animation),
        None => tracing::debug!("Skipping counter without a numeric target: {}", text),
    }
}

fn step(counter: Element, mut animation: CounterAnimation) {
    let Some(value) = animation.next() else {
        return;
    };
    counter.set_text_content(Some(&value.to_string()));
    if animation.is_finished() {
        return;
    }
    if let Err(e) = dom::set_timeout(COUNTER_INTERVAL_MS, move || step(counter, animation)) {
        tracing::warn!("Failed to schedule counter step: {:?}", e);
    }
}

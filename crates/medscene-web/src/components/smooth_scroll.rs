//! Smooth scrolling for in-page anchors

use medscene_core::page::{scroll_target, scroll_top_for};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::dom::{self, Listener};

pub struct SmoothScroll {
    _listeners: Vec<Listener>,
}

impl SmoothScroll {
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let window = dom::window()?;
        let mut listeners = Vec::new();

        for anchor in dom::query_all(document, "a[href^=\"#\"]")? {
            let document = document.clone();
            let window = window.clone();
            let link = anchor.clone();
            listeners.push(Listener::new(&anchor, "click", move |e| {
                let Some(href) = link.get_attribute("href") else {
                    return;
                };
                let Some(id) = scroll_target(&href) else {
                    return;
                };
                e.prevent_default();

                let Some(target) = document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                else {
                    return;
                };
                let options = ScrollToOptions::new();
                options.set_top(scroll_top_for(target.offset_top() as f64));
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            })?);
        }

        tracing::debug!(anchors = listeners.len(), "Smooth scroll attached");
        Ok(Self {
            _listeners: listeners,
        })
    }
}

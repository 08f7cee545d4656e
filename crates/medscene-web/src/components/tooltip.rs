//! Hover tooltips for `[data-tooltip]` elements

use std::cell::RefCell;
use std::rc::Rc;

use medscene_core::page::{tooltip_anchor, TOOLTIP_EXIT_MS};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::dom::{self, Listener};

/// A tooltip on screen; [`dispose`](Self::dispose) fades it out
pub struct TooltipHandle {
    tooltip: Element,
}

impl TooltipHandle {
    pub fn show(anchor: &Element, text: &str) -> Result<Self, JsValue> {
        let document = dom::document()?;
        let tooltip = document.create_element("div")?;
        tooltip.set_class_name("tooltip");
        tooltip.set_text_content(Some(text));

        let rect = anchor.get_bounding_client_rect();
        let (left, top) = tooltip_anchor(rect.left(), rect.top(), rect.width());
        tooltip.set_attribute(
            "style",
            &format!(
                "position: fixed; background: rgba(15, 23, 42, 0.95); color: white; \
                 padding: 0.5rem 1rem; border-radius: 6px; font-size: 0.875rem; \
                 z-index: 9998; white-space: nowrap; pointer-events: none; \
                 transform: translate(-50%, -100%); margin-top: -8px; \
                 left: {left}px; top: {top}px; animation: tooltipFadeIn 0.2s ease;"
            ),
        )?;
        dom::body()?.append_child(&tooltip)?;

        Ok(Self { tooltip })
    }

    pub fn dispose(self) {
        let tooltip = self.tooltip;
        if !dom::is_attached(&tooltip) {
            return;
        }
        if let Err(e) = dom::remove_after(&tooltip, "tooltipFadeOut 0.2s ease", TOOLTIP_EXIT_MS) {
            tracing::warn!("Failed to remove tooltip: {:?}", e);
        }
    }
}

pub struct Tooltips {
    _listeners: Vec<Listener>,
}

impl Tooltips {
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let mut listeners = Vec::new();

        for element in dom::query_all(document, "[data-tooltip]")? {
            let active: Rc<RefCell<Option<TooltipHandle>>> = Rc::default();

            listeners.push({
                let active = active.clone();
                let anchor = element.clone();
                Listener::new(&element, "mouseenter", move |_| {
                    let text = anchor.get_attribute("data-tooltip").unwrap_or_default();
                    if let Some(previous) = active.borrow_mut().take() {
                        previous.dispose();
                    }
                    match TooltipHandle::show(&anchor, &text) {
                        Ok(handle) => *active.borrow_mut() = Some(handle),
                        Err(e) => tracing::warn!("Failed to show tooltip: {:?}", e),
                    }
                })?
            });

            listeners.push(Listener::new(&element, "mouseleave", move |_| {
                if let Some(handle) = active.borrow_mut().take() {
                    handle.dispose();
                }
            })?);
        }

        Ok(Self {
            _listeners: listeners,
        })
    }
}

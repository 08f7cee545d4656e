//! Toast alerts in the top-right corner

use std::cell::RefCell;
use std::rc::Rc;

use medscene_core::page::{AlertKind, ALERT_AUTO_DISMISS_MS, ALERT_EXIT_MS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom::{self, Listener};

fn alert_style(kind: AlertKind) -> String {
    format!(
        "position: fixed; top: 20px; right: 20px; padding: 1rem 1.5rem; \
         background: {}; color: white; border-radius: 8px; \
         box-shadow: 0 4px 12px rgba(0,0,0,0.15); z-index: 9999; display: flex; \
         align-items: center; justify-content: space-between; gap: 1rem; \
         animation: slideIn 0.3s ease; max-width: 400px;",
        kind.background()
    )
}

/// Show a dismissible alert that removes itself after a few seconds
pub fn show_alert(message: &str, kind: AlertKind) -> Result<(), JsValue> {
    let document = dom::document()?;
    let alert = document.create_element("div")?;
    alert.set_class_name(kind.class_name());
    alert.set_attribute("style", &alert_style(kind))?;

    let text = document.create_element("span")?;
    text.set_text_content(Some(message));
    let close = document.create_element("button")?;
    close.set_class_name("alert-close");
    close.set_text_content(Some("\u{00d7}"));
    alert.append_child(&text)?;
    alert.append_child(&close)?;
    dom::body()?.append_child(&alert)?;

    // The close listener lives until the alert leaves the page
    let slot: Rc<RefCell<Option<Listener>>> = Rc::default();
    let listener = {
        let alert = alert.clone();
        let slot = slot.clone();
        Listener::new(&close, "click", move |_| dismiss(&alert, &slot))?
    };
    *slot.borrow_mut() = Some(listener);

    dom::set_timeout(ALERT_AUTO_DISMISS_MS, move || {
        if dom::is_attached(&alert) {
            dismiss(&alert, &slot);
        }
    })?;

    tracing::debug!(kind = ?kind, "Alert shown");
    Ok(())
}

fn dismiss(alert: &Element, slot: &Rc<RefCell<Option<Listener>>>) {
    let alert = alert.clone();
    let slot = slot.clone();
    let exit = {
        let alert = alert.clone();
        move || {
            alert.remove();
            slot.borrow_mut().take();
        }
    };
    if let Some(html) = alert.dyn_ref::<web_sys::HtmlElement>() {
        html.style().set_property("animation", "slideOut 0.3s ease").ok();
    }
    if let Err(e) = dom::set_timeout(ALERT_EXIT_MS, exit) {
        tracing::warn!("Failed to schedule alert removal: {:?}", e);
    }
}

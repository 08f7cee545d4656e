//! Contact form validation and simulated submission

use medscene_core::page::{AlertKind, ContactSubmission, FORM_SUCCESS_MESSAGE, SUBMIT_DELAY_MS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use super::alert::show_alert;
use crate::dom::{self, Listener};

const SENDING_LABEL: &str = "<i class=\"fas fa-spinner fa-spin\"></i> Sending...";

pub struct ContactForm {
    _listener: Listener,
}

impl ContactForm {
    /// Bind `#contactForm`; `None` if the page has no form
    pub fn attach(document: &Document) -> Result<Option<Self>, JsValue> {
        let Some(form) = document
            .get_element_by_id("contactForm")
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
        else {
            return Ok(None);
        };

        let target = form.clone();
        let listener = Listener::new(&target, "submit", move |e| {
            e.prevent_default();
            if let Err(err) = submit(&form) {
                tracing::warn!("Contact form submission failed: {:?}", err);
            }
        })?;

        Ok(Some(Self {
            _listener: listener,
        }))
    }
}

fn submit(form: &HtmlFormElement) -> Result<(), JsValue> {
    let submission = ContactSubmission {
        name: field_value(form, "name"),
        email: field_value(form, "email"),
        message: field_value(form, "message"),
    };

    if let Err(err) = submission.validate() {
        return show_alert(&err.to_string(), AlertKind::Error);
    }

    let button = form
        .query_selector("button[type=\"submit\"]")?
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
    let original_label = button.as_ref().map(|b| b.inner_html());
    if let Some(button) = &button {
        button.set_inner_html(SENDING_LABEL);
        button.set_disabled(true);
    }

    let form = form.clone();
    dom::set_timeout(SUBMIT_DELAY_MS, move || {
        if let Err(e) = show_alert(FORM_SUCCESS_MESSAGE, AlertKind::Success) {
            tracing::warn!("Failed to show alert: {:?}", e);
        }
        form.reset();
        if let (Some(button), Some(label)) = (button, original_label) {
            button.set_inner_html(&label);
            button.set_disabled(false);
        }
    })?;
    Ok(())
}

fn field_value(form: &HtmlFormElement, name: &str) -> String {
    let Ok(Some(field)) = form.query_selector(&format!("[name=\"{name}\"]")) else {
        return String::new();
    };
    input_value(&field)
}

fn input_value(field: &Element) -> String {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

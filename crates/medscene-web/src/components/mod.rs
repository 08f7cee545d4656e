//! Page behaviors around the 3D scene
//!
//! Each component binds its DOM listeners in `attach` and keeps them alive
//! for as long as its handle exists. [`PageComponents`] owns all of them.

pub mod alert;
pub mod contact_form;
pub mod counters;
pub mod menu;
pub mod modal;
pub mod reveal;
pub mod smooth_scroll;
pub mod tooltip;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use contact_form::ContactForm;
use counters::Counters;
use menu::MenuHandle;
use modal::Gallery;
use reveal::Reveal;
use smooth_scroll::SmoothScroll;
use tooltip::Tooltips;

const ANIMATION_CSS: &str = r#"
@keyframes slideIn { from { transform: translateX(100%); opacity: 0; } to { transform: translateX(0); opacity: 1; } }
@keyframes slideOut { from { transform: translateX(0); opacity: 1; } to { transform: translateX(100%); opacity: 0; } }
@keyframes tooltipFadeIn { from { opacity: 0; transform: translate(-50%, -90%); } to { opacity: 1; transform: translate(-50%, -100%); } }
@keyframes tooltipFadeOut { from { opacity: 1; transform: translate(-50%, -100%); } to { opacity: 0; transform: translate(-50%, -90%); } }
.fade-in { opacity: 0; transform: translateY(30px); transition: opacity 0.6s ease, transform 0.6s ease; }
.fade-in.animated { opacity: 1; transform: translateY(0); }
.card { opacity: 0; transform: translateY(30px) scale(0.95); transition: opacity 0.6s ease, transform 0.6s ease, box-shadow 0.3s ease; }
.card.animated { opacity: 1; transform: translateY(0) scale(1); }
"#;

/// Shared keyframes, removed again with the handle
pub struct AnimationStyles {
    style: Element,
}

impl AnimationStyles {
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let style = document.create_element("style")?;
        style.set_text_content(Some(ANIMATION_CSS));
        if let Some(head) = document.head() {
            head.append_child(&style)?;
        }
        Ok(Self { style })
    }
}

impl Drop for AnimationStyles {
    fn drop(&mut self) {
        self.style.remove();
    }
}

#[derive(Default)]
pub struct PageComponents {
    pub styles: Option<AnimationStyles>,
    pub menu: Option<MenuHandle>,
    pub smooth_scroll: Option<SmoothScroll>,
    pub contact_form: Option<ContactForm>,
    pub gallery: Option<Gallery>,
    pub reveal: Option<Reveal>,
    pub counters: Option<Counters>,
    pub tooltips: Option<Tooltips>,
}

impl PageComponents {
    /// Attach every component the page has markup for
    ///
    /// A component that fails to bind is logged and skipped; the rest still
    /// attach.
    pub fn attach(document: &Document) -> Self {
        Self {
            styles: bind("animation styles", AnimationStyles::attach(document).map(Some)),
            menu: bind("menu", MenuHandle::attach(document)),
            smooth_scroll: bind("smooth scroll", SmoothScroll::attach(document).map(Some)),
            contact_form: bind("contact form", ContactForm::attach(document)),
            gallery: bind("gallery", Gallery::attach(document).map(Some)),
            reveal: bind("reveal", Reveal::attach(document).map(Some)),
            counters: bind("counters", Counters::attach(document)),
            tooltips: bind("tooltips", Tooltips::attach(document).map(Some)),
        }
    }
}

fn bind<T>(name: &str, result: Result<Option<T>, JsValue>) -> Option<T> {
    match result {
        Ok(component) => component,
        Err(e) => {
            tracing::warn!("Failed to attach {}: {:?}", name, e);
            None
        }
    }
}

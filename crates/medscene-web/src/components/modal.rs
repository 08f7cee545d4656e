//! Image modal for gallery items

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use medscene_core::page::{ModalContent, MODAL_EXIT_MS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use crate::dom::{self, Listener};

const MODAL_CSS: &str = r#"
.modal { position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0, 0, 0, 0.95); display: flex; align-items: center; justify-content: center; z-index: 9999; animation: modalFadeIn 0.3s ease; padding: 2rem; }
@keyframes modalFadeIn { from { opacity: 0; } to { opacity: 1; } }
@keyframes modalFadeOut { from { opacity: 1; } to { opacity: 0; } }
.modal-content { position: relative; max-width: 90%; max-height: 90%; background: white; border-radius: 12px; overflow: hidden; animation: modalSlideIn 0.3s ease; }
@keyframes modalSlideIn { from { transform: translateY(50px) scale(0.9); opacity: 0; } to { transform: translateY(0) scale(1); opacity: 1; } }
.modal-content img { width: 100%; height: auto; max-height: 70vh; object-fit: contain; }
.modal-content h3 { padding: 1.5rem; margin: 0; color: #2A377D; }
.modal-content p { padding: 0 1.5rem 1.5rem; margin: 0; color: #64748B; }
.close-modal { position: absolute; top: 15px; right: 15px; color: white; background: rgba(194, 32, 40, 0.8); width: 40px; height: 40px; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-size: 1.5rem; cursor: pointer; z-index: 10; transition: background 0.3s ease; }
.close-modal:hover { background: #C22028; }
"#;

struct ModalInner {
    modal: Element,
    style: Element,
    listeners: RefCell<Vec<Listener>>,
    closing: Cell<bool>,
}

impl ModalInner {
    fn close(self: &Rc<Self>) {
        if self.closing.replace(true) {
            return;
        }
        if let Some(html) = self.modal.dyn_ref::<HtmlElement>() {
            html.style().set_property("animation", "modalFadeOut 0.3s ease").ok();
        }
        let inner = self.clone();
        let scheduled = dom::set_timeout(MODAL_EXIT_MS, move || {
            inner.modal.remove();
            inner.style.remove();
            inner.listeners.borrow_mut().clear();
        });
        if let Err(e) = scheduled {
            tracing::warn!("Failed to schedule modal removal: {:?}", e);
        }
    }
}

/// An open modal; closes on its button, a backdrop click, Escape or [`dispose`](Self::dispose)
pub struct ModalHandle {
    inner: Rc<ModalInner>,
}

impl ModalHandle {
    pub fn show(content: &ModalContent) -> Result<Self, JsValue> {
        let document = dom::document()?;

        let modal = document.create_element("div")?;
        modal.set_class_name("modal");
        let body = document.create_element("div")?;
        body.set_class_name("modal-content");

        let close = document.create_element("span")?;
        close.set_class_name("close-modal");
        close.set_text_content(Some("\u{00d7}"));
        body.append_child(&close)?;

        let image = document.create_element("img")?;
        image.set_attribute("src", &content.image_src)?;
        image.set_attribute("alt", content.alt_text())?;
        body.append_child(&image)?;

        if let Some(title) = &content.title {
            let heading = document.create_element("h3")?;
            heading.set_text_content(Some(title));
            body.append_child(&heading)?;
        }
        if let Some(description) = &content.description {
            let paragraph = document.create_element("p")?;
            paragraph.set_text_content(Some(description));
            body.append_child(&paragraph)?;
        }
        modal.append_child(&body)?;

        let style = document.create_element("style")?;
        style.set_text_content(Some(MODAL_CSS));

        dom::body()?.append_child(&modal)?;
        if let Some(head) = document.head() {
            head.append_child(&style)?;
        }

        let inner = Rc::new(ModalInner {
            modal: modal.clone(),
            style,
            listeners: RefCell::new(Vec::new()),
            closing: Cell::new(false),
        });
        let weak = Rc::downgrade(&inner);

        let listeners = vec![
            Listener::new(&close, "click", closer(&weak, |_| true))?,
            {
                let backdrop = modal.clone();
                Listener::new(
                    &modal,
                    "click",
                    closer(&weak, move |e| {
                        e.target()
                            .and_then(|t| t.dyn_into::<Element>().ok())
                            .is_some_and(|t| t == backdrop)
                    }),
                )?
            },
            Listener::new(
                &document,
                "keydown",
                closer(&weak, |e| {
                    e.dyn_ref::<KeyboardEvent>().is_some_and(|k| k.key() == "Escape")
                }),
            )?,
        ];
        *inner.listeners.borrow_mut() = listeners;

        Ok(Self { inner })
    }

    pub fn dispose(&self) {
        self.inner.close();
    }
}

fn closer(
    modal: &Weak<ModalInner>,
    should_close: impl Fn(&web_sys::Event) -> bool + 'static,
) -> impl FnMut(web_sys::Event) + 'static {
    let modal = modal.clone();
    move |e| {
        if should_close(&e) {
            if let Some(modal) = modal.upgrade() {
                modal.close();
            }
        }
    }
}

/// Opens the modal for `.gallery-item` clicks
pub struct Gallery {
    _listeners: Vec<Listener>,
    _current: Rc<RefCell<Option<ModalHandle>>>,
}

impl Gallery {
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let current: Rc<RefCell<Option<ModalHandle>>> = Rc::default();
        let mut listeners = Vec::new();

        for item in dom::query_all(document, ".gallery-item")? {
            let current = current.clone();
            let source = item.clone();
            listeners.push(Listener::new(&item, "click", move |_| {
                let Some(content) = gallery_content(&source) else {
                    return;
                };
                if let Some(previous) = current.borrow_mut().take() {
                    previous.dispose();
                }
                match ModalHandle::show(&content) {
                    Ok(handle) => *current.borrow_mut() = Some(handle),
                    Err(e) => tracing::warn!("Failed to open modal: {:?}", e),
                }
            })?);
        }

        Ok(Self {
            _listeners: listeners,
            _current: current,
        })
    }
}

fn gallery_content(item: &Element) -> Option<ModalContent> {
    let child_text = |selector: &str| {
        item.query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.text_content())
    };
    let image_src = item
        .query_selector("img")
        .ok()
        .flatten()
        .and_then(|img| img.get_attribute("src"));

    ModalContent::resolve(
        item.get_attribute("data-image"),
        image_src,
        item.get_attribute("data-title"),
        child_text(".gallery-title"),
        item.get_attribute("data-description"),
        child_text(".gallery-description"),
    )
}

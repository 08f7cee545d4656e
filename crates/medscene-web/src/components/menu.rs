//! Mobile navigation menu

use std::cell::RefCell;
use std::rc::Rc;

use medscene_core::page::{MenuEvent, MenuState};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, KeyboardEvent, Node};

use crate::dom::{self, Listener};

const OPEN_CLASS: &str = "active";

pub struct MenuHandle {
    _listeners: Vec<Listener>,
}

impl MenuHandle {
    /// Bind `#menuToggle` and `#mainNav`; `None` if the page has no menu
    pub fn attach(document: &Document) -> Result<Option<Self>, JsValue> {
        let (Some(toggle), Some(nav)) = (
            document.get_element_by_id("menuToggle"),
            document.get_element_by_id("mainNav"),
        ) else {
            return Ok(None);
        };

        let window = dom::window()?;
        let state = Rc::new(RefCell::new(MenuState::default()));
        let apply = {
            let state = state.clone();
            let toggle = toggle.clone();
            let nav = nav.clone();
            Rc::new(move |event: MenuEvent| {
                let changed = state.borrow_mut().handle(event);
                if changed {
                    render(&toggle, &nav, &state.borrow());
                }
            })
        };

        let mut listeners = Vec::new();

        listeners.push({
            let apply = apply.clone();
            Listener::new(&toggle, "click", move |e| {
                // Keep the document handler from treating this as an outside click
                e.stop_propagation();
                apply(MenuEvent::ToggleClicked);
            })?
        });

        listeners.push({
            let apply = apply.clone();
            let toggle = toggle.clone();
            let nav = nav.clone();
            Listener::new(document, "click", move |e| {
                let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
                let inside = nav.contains(target.as_ref()) || toggle.contains(target.as_ref());
                if !inside {
                    apply(MenuEvent::OutsideClick);
                }
            })?
        });

        listeners.push({
            let apply = apply.clone();
            Listener::new(document, "keydown", move |e| {
                if e.dyn_ref::<KeyboardEvent>().is_some_and(|k| k.key() == "Escape") {
                    apply(MenuEvent::EscapePressed);
                }
            })?
        });

        for link in dom::query_all(document, ".nav-link")? {
            let apply = apply.clone();
            let window = window.clone();
            listeners.push(Listener::new(&link, "click", move |_| {
                apply(MenuEvent::NavLinkClicked {
                    viewport_width: viewport_width(&window),
                });
            })?);
        }

        listeners.push({
            let apply = apply.clone();
            let target = window.clone();
            Listener::new(&target, "resize", move |_| {
                apply(MenuEvent::Resized {
                    viewport_width: viewport_width(&window),
                });
            })?
        });

        Ok(Some(Self {
            _listeners: listeners,
        }))
    }
}

fn render(toggle: &Element, nav: &Element, state: &MenuState) {
    nav.class_list()
        .toggle_with_force(OPEN_CLASS, state.is_open())
        .ok();
    toggle.set_inner_html(&format!("<i class=\"{}\"></i>", state.icon_class()));
}

fn viewport_width(window: &web_sys::Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or_default()
}

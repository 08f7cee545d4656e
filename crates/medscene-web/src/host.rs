//! Render host backed by the browser DOM

use medscene_core::RenderHost;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

pub struct BrowserHost {
    window: Window,
    document: Document,
}

impl BrowserHost {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn container(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    #[cfg(feature = "webgpu")]
    fn has_backend(&self) -> bool {
        let navigator = self.window.navigator();
        js_sys::Reflect::get(&navigator, &"gpu".into())
            .map(|gpu| !gpu.is_undefined() && !gpu.is_null())
            .unwrap_or(false)
    }

    #[cfg(not(feature = "webgpu"))]
    fn has_backend(&self) -> bool {
        use web_sys::HtmlCanvasElement;

        let Ok(probe) = self.document.create_element("canvas") else {
            return false;
        };
        probe
            .dyn_into::<HtmlCanvasElement>()
            .ok()
            .and_then(|canvas| canvas.get_context("webgl2").ok().flatten())
            .is_some()
    }
}

impl RenderHost for BrowserHost {
    fn container_size(&self, id: &str) -> Option<(u32, u32)> {
        let container = self.container(id)?;
        Some((
            container.client_width().max(0) as u32,
            container.client_height().max(0) as u32,
        ))
    }

    fn supports_rendering(&self) -> bool {
        self.has_backend()
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.window.device_pixel_ratio() as f32
    }
}

/// Append the render surface to the container and return its CSS selector
pub fn attach_surface(document: &Document, container_id: &str) -> Option<String> {
    let container = document.get_element_by_id(container_id)?;
    let surface_id = format!("{container_id}-surface");

    if document.get_element_by_id(&surface_id).is_none() {
        let canvas = document.create_element("canvas").ok()?;
        canvas.set_id(&surface_id);
        container.append_child(&canvas).ok()?;
    }

    Some(format!("#{surface_id}"))
}

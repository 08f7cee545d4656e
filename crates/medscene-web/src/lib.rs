//! Medscene Web - Browser entry point
//!
//! Binds the page components, then starts the 3D scene in the
//! `#medicalCanvas` container when the page has one.

mod components;
mod dom;
mod host;

use std::cell::RefCell;
use std::sync::OnceLock;

use medscene_bevy::{run_app, ShutdownHandle, WindowTarget};
use medscene_core::{SceneConfig, SceneRuntime};
use wasm_bindgen::prelude::*;
use web_sys::Document;

use components::PageComponents;
use host::{attach_surface, BrowserHost};

/// Optional inline TOML, e.g. `<script type="application/toml" id="medsceneConfig">`
const CONFIG_ELEMENT_ID: &str = "medsceneConfig";

thread_local! {
    static PAGE: RefCell<Option<PageComponents>> = const { RefCell::new(None) };
}

static SHUTDOWN: OnceLock<ShutdownHandle> = OnceLock::new();

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    let document = dom::document().ok();
    let config = document.as_ref().map(read_config).unwrap_or_default();

    // Keep wgpu noise out of the console unless asked for
    let level = if config.logging.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );

    let Some(document) = document else {
        tracing::error!("No document available");
        return;
    };

    PAGE.with(|page| *page.borrow_mut() = Some(PageComponents::attach(&document)));
    start_scene(&document, config);
}

/// Stop the render loop; page components keep working
#[wasm_bindgen]
pub fn shutdown_scene() {
    if let Some(handle) = SHUTDOWN.get() {
        handle.request();
    }
}

/// Detach every page component listener
#[wasm_bindgen]
pub fn detach_page() {
    PAGE.with(|page| page.borrow_mut().take());
}

fn start_scene(document: &Document, config: SceneConfig) {
    let window = match dom::window() {
        Ok(window) => window,
        Err(e) => {
            tracing::error!(error = ?e, "No browser window for the 3D scene");
            return;
        }
    };

    // A page without the container is reported by `initialize`

    let host = BrowserHost::new(window, document.clone());
    let container_id = config.container.id.clone();
    let Some(runtime) = SceneRuntime::initialize(&host, config) else {
        return;
    };
    let Some(canvas) = attach_surface(document, &container_id) else {
        tracing::error!("Failed to attach render surface to #{}", container_id);
        return;
    };

    let shutdown = SHUTDOWN.get_or_init(ShutdownHandle::default).clone();
    run_app(
        runtime,
        WindowTarget {
            title: "Medscene".to_string(),
            canvas: Some(canvas),
        },
        shutdown,
    );
}

fn read_config(document: &Document) -> SceneConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return SceneConfig::default();
    };

    match SceneConfig::from_toml(&text) {
        Ok(config) => config,
        Err(e) => {
            // Logging isn't installed yet
            web_sys::console::warn_1(&format!("Invalid scene config, using defaults: {e}").into());
            SceneConfig::default()
        }
    }
}

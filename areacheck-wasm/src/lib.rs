//! Browser front end for the areacheck evaluator.
//!
//! On load this mounts an [`areacheck_core::Controller`] over the page's
//! form, canvas and results table, and talks to the evaluator with `fetch`.

mod app;
mod canvas;
mod dom;
mod fetch;

use areacheck_core::{render, ClientConfig, RegionParameter, Viewport};
use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;

/// Global the page may set before the module loads to override [`ClientConfig`].
const CONFIG_GLOBAL: &str = "__AREACHECK_CONFIG";

/// Initializes console logging and the panic hook.
#[wasm_bindgen]
pub fn init_logs() {
    match log::set_logger(&DEFAULT_LOGGER) {
        Ok(_) => info!("Initialized console.logger"),
        Err(e) => error!("failed to set console.logger: {}", e),
    };
    console_error_panic_hook::set_once();
}

/// Updates the log level filter.
///
/// `level` is one of "error", "warn", "info", "debug" or "trace"; empty or
/// null means "info".
#[wasm_bindgen]
pub fn update_log_level(level: JsValue) -> Result<(), JsValue> {
    let level: Option<String> = serde_wasm_bindgen::from_value(level)?;
    let level = areacheck_core::parse_log_level(level.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// The drawing commands for region parameter `r` on a canvas of the given
/// logical size, as an array of `DrawCommand` objects.
#[wasm_bindgen]
pub fn render_drawing(r: f64, width: f64, height: f64, pixel_density: f64) -> Result<JsValue, JsValue> {
    let r = RegionParameter::new(r).ok_or_else(|| JsValue::from_str(&format!("R out of range: {}", r)))?;
    let commands = render(r, &Viewport::new(width, height, pixel_density));
    Ok(serde_wasm_bindgen::to_value(&commands)?)
}

fn read_config(window: &web_sys::Window) -> Result<ClientConfig, JsValue> {
    let value = js_sys::Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))?;
    if value.is_undefined() || value.is_null() {
        return Ok(ClientConfig::default());
    }
    let config: ClientConfig = serde_wasm_bindgen::from_value(value)?;
    config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_logs();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let config = read_config(&window)?;

    if document.ready_state() == "loading" {
        let mut config = Some(config);
        app::listen(&document, "DOMContentLoaded", move |_| {
            if let Some(config) = config.take() {
                if let Err(e) = app::mount(config) {
                    error!("mount failed: {:?}", e);
                }
            }
        })
    } else {
        app::mount(config)
    }
}

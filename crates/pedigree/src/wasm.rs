//! WebAssembly bindings for Pedigree
//!
//! This module exposes an interactive [`PedigreeView`] to the browser. The
//! view draws into a [`RecordingSurface`]; the host replays the recorded
//! commands on its own canvas after every call that may have redrawn.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::core::{PedigreeConfig, RecordingSurface};
#[cfg(target_arch = "wasm32")]
use crate::plugins::pedigree::{InteractionEffect, PedigreeEngine, PedigreeParser};

#[cfg(target_arch = "wasm32")]
use console_error_panic_hook;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging for WASM (logs to browser console)
    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

#[cfg(target_arch = "wasm32")]
fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// An interactive pedigree bound to a recording surface
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct PedigreeView {
    engine: PedigreeEngine<RecordingSurface>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl PedigreeView {
    /// Build a view from dataset JSON and optional config JSON
    ///
    /// A config passed here replaces one embedded in the dataset.
    #[wasm_bindgen(constructor)]
    pub fn new(dataset: &str, config: Option<String>) -> Result<PedigreeView, JsValue> {
        let mut document = PedigreeParser::new().parse(dataset).map_err(js_error)?;
        if let Some(config) = config {
            document.config = PedigreeConfig::from_json(&config).map_err(js_error)?;
        }

        let engine = PedigreeEngine::builder()
            .persons(document.persons)
            .config(document.config)
            .surface(RecordingSurface::new())
            .build()
            .map_err(js_error)?;
        Ok(Self { engine })
    }

    /// Returns the cursor to show
    pub fn pointer_down(&mut self, x: f64, y: f64) -> String {
        self.engine.pointer_down(x, y);
        self.engine.cursor().to_string()
    }

    /// Returns the cursor to show
    pub fn pointer_move(&mut self, x: f64, y: f64) -> String {
        self.engine.pointer_move(x, y);
        self.engine.cursor().to_string()
    }

    /// Returns true when a drag was committed
    pub fn pointer_up(&mut self, _x: f64, _y: f64) -> bool {
        finished_drag(&self.engine.pointer_up())
    }

    /// Returns true when a drag was committed
    pub fn pointer_leave(&mut self, _x: f64, _y: f64) -> bool {
        finished_drag(&self.engine.pointer_leave())
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn cursor(&self) -> String {
        self.engine.cursor().to_string()
    }

    /// Draw commands of the latest render as a JSON array
    pub fn commands(&self) -> Result<String, JsValue> {
        self.engine.surface().to_json().map_err(js_error)
    }

    /// The working dataset as JSON
    pub fn persons(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.persons()).map_err(js_error)
    }

    pub fn legend(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.legend()).map_err(js_error)
    }
}

#[cfg(target_arch = "wasm32")]
fn finished_drag(effects: &[InteractionEffect]) -> bool {
    effects
        .iter()
        .any(|effect| matches!(effect, InteractionEffect::DragFinished { .. }))
}

/// Render a JSON dataset straight to an SVG document
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_svg(input: &str) -> Result<String, JsValue> {
    crate::render_svg(input).map_err(js_error)
}

//! Browser bindings (wasm32)
//!
//! The page owns the canvas, pointer events and drawing; this side owns the
//! simulation. Every frame the page calls `frame(dt)` and draws the returned
//! JSON snapshot.

use std::sync::Once;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::driver::FixedStepDriver;
use crate::error::SessionError;
use crate::highscores::HighScores;
use crate::persistence::LocalStore;
use crate::settings::SimConfig;
use crate::sim::Session;

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
    });
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn find_canvas(canvas_id: &str) -> Result<HtmlCanvasElement, SessionError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(canvas_id))
        .ok_or_else(|| SessionError::SurfaceUnavailable(format!("no element #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| SessionError::SurfaceUnavailable(format!("#{canvas_id} is not a canvas")))
}

/// Session handle exported to the page
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
    driver: FixedStepDriver,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl WasmSession {
    /// Bind to the canvas with the given id; fails if it doesn't exist
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WasmSession, JsValue> {
        init_logging();

        let canvas = find_canvas(canvas_id).map_err(js_err)?;
        let config = SimConfig::load(&LocalStore);
        let session = Session::new(config, Box::new(LocalStore)).map_err(js_err)?;
        let driver = FixedStepDriver::for_session(&session);

        log::info!(
            "WAFE arena ready on #{} ({}x{})",
            canvas_id,
            canvas.width(),
            canvas.height()
        );
        Ok(Self {
            session,
            driver,
            canvas,
        })
    }

    pub fn start(&mut self, name: &str) -> Result<(), JsValue> {
        self.session.start(name).map_err(js_err)?;
        self.driver.reset();
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session.restart().map_err(js_err)?;
        self.driver.reset();
        Ok(())
    }

    /// Pointer position in canvas pixels; mapped to world coordinates
    #[wasm_bindgen(js_name = setPointer)]
    pub fn set_pointer(&mut self, px: f32, py: f32) {
        let (w, h) = (self.canvas.width() as f32, self.canvas.height() as f32);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let world = self.session.config.world();
        self.session
            .set_player_target(px / w * world.x, py / h * world.y);
    }

    /// Pointer position already in world coordinates
    #[wasm_bindgen(js_name = setPlayerTarget)]
    pub fn set_player_target(&mut self, x: f32, y: f32) {
        self.session.set_player_target(x, y);
    }

    /// Advance by one frame's delta (seconds) and return the snapshot JSON
    pub fn frame(&mut self, dt: f32) -> Result<String, JsValue> {
        self.driver.frame(&mut self.session, dt);
        self.snapshot()
    }

    /// Advance exactly one tick and return the snapshot JSON
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let snap = self.session.tick();
        serde_json::to_string(&snap).map_err(js_err)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(js_err)
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    #[wasm_bindgen(js_name = setAutopilot)]
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.driver.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    #[wasm_bindgen(js_name = highScoresJson)]
    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        let scores: HighScores = self.session.high_scores();
        serde_json::to_string(&scores).map_err(js_err)
    }
}

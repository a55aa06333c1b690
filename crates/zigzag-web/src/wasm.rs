#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the CipherLabRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use std::io;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use zigzag_runtime::{PreferenceError, PreferenceStore};

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// `matchMedia("(prefers-color-scheme: dark)").matches`, false when unavailable.
fn prefers_dark_mode() -> bool {
    let global = js_sys::global();
    let Ok(match_media) = Reflect::get(&global, &"matchMedia".into()) else {
        return false;
    };
    let Ok(match_media) = match_media.dyn_into::<Function>() else {
        return false;
    };
    let Ok(query) = match_media.call1(&global, &"(prefers-color-scheme: dark)".into()) else {
        return false;
    };
    Reflect::get(&query, &"matches".into())
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

/// 64 random bits from `Math.random`, which is enough for column choice.
fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let lo = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (hi << 32) | lo
}

fn js_failure(context: &str, value: &JsValue) -> PreferenceError {
    PreferenceError::Io(io::Error::other(format!("{context}: {value:?}")))
}

/// `window.localStorage`. Access itself can throw (e.g. storage disabled).
struct LocalStorage;

impl LocalStorage {
    fn call(&self, method: &str, args: &Array) -> Result<JsValue, PreferenceError> {
        let global = js_sys::global();
        let storage = Reflect::get(&global, &"localStorage".into())
            .map_err(|e| js_failure("localStorage unavailable", &e))?;
        if storage.is_undefined() || storage.is_null() {
            return Err(PreferenceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "localStorage unavailable",
            )));
        }
        let function = Reflect::get(&storage, &method.into())
            .map_err(|e| js_failure(method, &e))?
            .dyn_into::<Function>()
            .map_err(|e| js_failure(method, &e))?;
        Reflect::apply(&function, &storage, args).map_err(|e| js_failure(method, &e))
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let value = self.call("getItem", &Array::of1(&key.into()))?;
        Ok(value.as_string())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.call("setItem", &Array::of2(&key.into(), &value.into()))?;
        Ok(())
    }
}

fn messages_to_js(messages: Vec<String>) -> Array {
    messages.into_iter().map(JsValue::from).collect()
}

/// Called automatically when the wasm module is instantiated.
#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// The cipher lab, driven by a JavaScript host.
///
/// Views come back as SVG markup; the host inserts them and calls
/// `advanceTime` from its animation loop while a playback runs.
#[wasm_bindgen]
pub struct CipherLabRunner {
    inner: RunnerCore,
}

#[wasm_bindgen]
impl CipherLabRunner {
    /// Create a runner. `config_json` optionally overrides [`LabConfig`]
    /// fields; an invalid document throws.
    ///
    /// [`LabConfig`]: zigzag_runtime::LabConfig
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<CipherLabRunner, JsValue> {
        let store = Box::new(LocalStorage);
        let ambient_dark = prefers_dark_mode();
        let seed = random_seed();
        let inner = match config_json {
            Some(json) => RunnerCore::from_config_json(&json, seed, store, ambient_dark)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => RunnerCore::new(seed, store, ambient_dark),
        };
        Ok(Self { inner })
    }

    /// Advance the host clock. Returns the number of playback steps fired.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) -> u32 {
        u32::try_from(self.inner.advance_time_ms(dt_ms)).unwrap_or(u32::MAX)
    }

    /// Fired playback steps as a JSON array, drained.
    #[wasm_bindgen(js_name = takeEvents)]
    pub fn take_events(&mut self) -> String {
        self.inner.take_events_json()
    }

    // ── Key ──────────────────────────────────────────────────────────────

    pub fn key(&self) -> String {
        self.inner.key()
    }

    #[wasm_bindgen(js_name = applyKey)]
    pub fn apply_key(&mut self, raw: &str) -> String {
        self.inner.apply_key(raw)
    }

    #[wasm_bindgen(js_name = shuffleKey)]
    pub fn shuffle_key(&mut self, raw: &str) -> String {
        self.inner.shuffle_key(raw)
    }

    #[wasm_bindgen(js_name = resetKey)]
    pub fn reset_key(&mut self) -> String {
        self.inner.reset_key()
    }

    #[wasm_bindgen(js_name = keyStats)]
    pub fn key_stats(&self, raw: &str) -> String {
        self.inner.key_stats_json(raw)
    }

    // ── Encode ───────────────────────────────────────────────────────────

    #[wasm_bindgen(js_name = setPlaintext)]
    pub fn set_plaintext(&mut self, text: &str) {
        self.inner.set_plaintext(text);
    }

    #[wasm_bindgen(js_name = setRealtime)]
    pub fn set_realtime(&mut self, on: bool) {
        self.inner.set_realtime(on);
    }

    #[wasm_bindgen(js_name = redrawEncode)]
    pub fn redraw_encode(&mut self) {
        self.inner.redraw_encode();
    }

    #[wasm_bindgen(js_name = encryptText)]
    pub fn encrypt_text(&mut self) -> String {
        self.inner.encrypt_text()
    }

    /// Text to hand to `navigator.clipboard.writeText`, or `undefined`.
    #[wasm_bindgen(js_name = copyText)]
    pub fn copy_text(&mut self) -> Option<String> {
        self.inner.copy_text()
    }

    #[wasm_bindgen(js_name = copyFailed)]
    pub fn copy_failed(&mut self, reason: &str) {
        self.inner.copy_failed(reason);
    }

    #[wasm_bindgen(js_name = exportSvg)]
    pub fn export_svg(&mut self) -> Option<String> {
        self.inner.export_svg()
    }

    #[wasm_bindgen(js_name = exportStatus)]
    pub fn export_status(&self) -> Option<String> {
        self.inner.export_status()
    }

    #[wasm_bindgen(js_name = clearEncode)]
    pub fn clear_encode(&mut self) {
        self.inner.clear_encode();
    }

    #[wasm_bindgen(js_name = setEncodeGuidesVisible)]
    pub fn set_encode_guides_visible(&mut self, visible: bool) {
        self.inner.set_encode_guides_visible(visible);
    }

    // ── Decode ───────────────────────────────────────────────────────────

    /// Live-plot coordinates. Returns the error messages (empty on success).
    #[wasm_bindgen(js_name = setPointsInput)]
    pub fn set_points_input(&mut self, raw: &str) -> Array {
        messages_to_js(self.inner.set_points_input(raw))
    }

    /// Decode at once. Throws an array of error messages on bad input.
    #[wasm_bindgen(js_name = decodeNow)]
    pub fn decode_now(&mut self, raw: &str) -> Result<String, JsValue> {
        self.inner
            .decode_now(raw)
            .map_err(|messages| messages_to_js(messages).into())
    }

    #[wasm_bindgen(js_name = syncFromEncode)]
    pub fn sync_from_encode(&mut self) -> Option<String> {
        self.inner.sync_from_encode()
    }

    #[wasm_bindgen(js_name = pointsInput)]
    pub fn points_input(&self) -> String {
        self.inner.points_input()
    }

    #[wasm_bindgen(js_name = decodedText)]
    pub fn decoded_text(&self) -> String {
        self.inner.decoded_text()
    }

    #[wasm_bindgen(js_name = decodeError)]
    pub fn decode_error(&self) -> Option<String> {
        self.inner.decode_error()
    }

    #[wasm_bindgen(js_name = clearDecode)]
    pub fn clear_decode(&mut self) {
        self.inner.clear_decode();
    }

    #[wasm_bindgen(js_name = setDecodeGuidesVisible)]
    pub fn set_decode_guides_visible(&mut self, visible: bool) {
        self.inner.set_decode_guides_visible(visible);
    }

    // ── Playback ─────────────────────────────────────────────────────────

    #[wasm_bindgen(js_name = playEncode)]
    pub fn play_encode(&mut self) -> bool {
        self.inner.play_encode()
    }

    #[wasm_bindgen(js_name = stopEncode)]
    pub fn stop_encode(&mut self) {
        self.inner.stop_encode();
    }

    /// Throws an array of error messages on bad input.
    #[wasm_bindgen(js_name = playDecode)]
    pub fn play_decode(&mut self, raw: &str) -> Result<bool, JsValue> {
        self.inner
            .play_decode(raw)
            .map_err(|messages| messages_to_js(messages).into())
    }

    #[wasm_bindgen(js_name = stopDecode)]
    pub fn stop_decode(&mut self) {
        self.inner.stop_decode();
    }

    #[wasm_bindgen(js_name = encodeRunning)]
    pub fn encode_running(&self) -> bool {
        self.inner.encode_running()
    }

    #[wasm_bindgen(js_name = decodeRunning)]
    pub fn decode_running(&self) -> bool {
        self.inner.decode_running()
    }

    // ── Views ────────────────────────────────────────────────────────────

    #[wasm_bindgen(js_name = encodeSvg)]
    pub fn encode_svg(&self) -> String {
        self.inner.encode_svg()
    }

    #[wasm_bindgen(js_name = decodeSvg)]
    pub fn decode_svg(&self) -> String {
        self.inner.decode_svg()
    }

    #[wasm_bindgen(js_name = keyPreviewSvg)]
    pub fn key_preview_svg(&self) -> String {
        self.inner.key_preview_svg()
    }

    // ── Theme ────────────────────────────────────────────────────────────

    /// `"light"` or `"dark"`.
    pub fn theme(&self) -> String {
        self.inner.theme().as_str().to_owned()
    }

    /// Flip and persist the theme; returns the new one.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> String {
        self.inner.toggle_theme().as_str().to_owned()
    }
}

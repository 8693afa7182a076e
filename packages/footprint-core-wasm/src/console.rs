// Browser console sink for the `console_log!` macro.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    // Use `js_namespace` to bind `console.log(..)` instead of just `log(..)`
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

// Native builds (unit tests) have no JS host to forward to.
#[cfg(not(target_arch = "wasm32"))]
pub fn log(_s: &str) {}

/// Warnings go through `console.warn` so they stand out in devtools.
pub fn warn(s: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(s));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = s;
}

// Note: The console_log macro is defined in lib.rs to avoid duplication

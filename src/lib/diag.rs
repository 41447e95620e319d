//! Console diagnostics for conditions that are worth recording but do not
//! warrant a user-visible error, such as an unrecognized sign-in challenge.

#[cfg(target_arch = "wasm32")]
pub(crate) fn warn(message: &str) {
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn warn(message: &str) {
    eprintln!("{message}");
}

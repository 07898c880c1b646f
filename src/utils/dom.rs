//! DOM and Web API utility functions.

use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the mount point for the app by element id.
pub fn mount_root(id: &str) -> Option<HtmlElement> {
    window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Reload the page, ignoring failures.
pub fn reload() {
    if let Some(window) = window() {
        let _ = window.location().reload();
    }
}

//! Lesson Canvas Layout WASM Module
//!
//! Grid layout and placement engine for the lesson tile canvas: coordinate
//! mapping, overlap-free placement, handle resizing, canvas height, the page
//! index, pointer interactions and the debounced auto-save guard.

pub mod error;
pub mod models;
pub mod layout;
pub mod page_index;
pub mod interaction;
pub mod autosave;
pub mod api;

// Re-export commonly used types
pub use error::LayoutError;
pub use models::*;
pub use layout::ResizeHandle;
pub use interaction::{Interaction, InteractionUpdate};
pub use autosave::{AutoSave, SaveTicket};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();

    log::info!("Lesson canvas layout WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        api::helpers::log_warn(&format!("Logger already initialized: {}", e));
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}

//! Lesson Canvas WASM API
//!
//! This module provides the JavaScript-facing API for the lesson canvas editor.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, logging and editor access
//! - `types`: Request and result shapes exchanged with the host
//! - `geometry`: Stateless layout functions over caller-supplied tiles
//! - `editor`: Operations on the WASM-owned editor state

pub mod helpers;
pub mod types;
pub mod geometry;
pub mod editor;

pub use geometry::*;
pub use editor::*;

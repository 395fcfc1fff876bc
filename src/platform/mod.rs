//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard input (held movement keys, one-shot commands)
//! - DOM screens, HUD and overlays (web only)
//!
//! Storage lives in `persistence`.

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use input::{HeldKeys, KeyAction, key_action};

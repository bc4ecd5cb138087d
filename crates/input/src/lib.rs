//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`] and reports left clicks. Cursor
//! repeat comes from the terminal's own key repeat; every press is one action.

pub mod map;

pub use match3_types as types;

pub use map::{handle_key_event, mouse_click, should_quit};

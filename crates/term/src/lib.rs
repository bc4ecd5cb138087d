//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! and layout libraries and renders into a plain framebuffer that is flushed
//! to the terminal as a diff.
//!
//! - [`fb`]: styled cell framebuffer
//! - [`game_view`]: board, cursor/selection and side panel
//! - [`playback`]: timed replay of a turn (swap, remove, fall)
//! - [`renderer`]: crossterm output

pub mod fb;
pub mod game_view;
pub mod playback;
pub mod renderer;

pub use match3_core as core;
pub use match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use playback::{Playback, PlaybackFrame};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

//! Terminal input module.
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameCommand`] and tracks the held soft drop key,
//! including on terminals that never report key releases.

pub mod handler;
pub mod map;

pub use term_tetris_types as types;

pub use handler::{InputHandler, DEFAULT_SOFT_DROP_RELEASE_MS};
pub use map::{is_soft_drop_key, map_key, should_quit};

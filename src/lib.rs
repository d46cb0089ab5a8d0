//! Terminal Tetris (workspace facade crate).
//!
//! Re-exports the member crates as `term_tetris::{core, input, term, types}`
//! and hosts the application configuration used by the binary.

pub mod config;

pub use term_tetris_core as core;
pub use term_tetris_input as input;
pub use term_tetris_term as term;
pub use term_tetris_types as types;

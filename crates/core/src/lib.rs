//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has no dependencies on terminal rendering or keyboard input, making it:
//!
//! - **Deterministic**: Same seed and the same time stamps produce identical games
//! - **Testable**: Time enters through explicit `Instant`s, so tests never sleep
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: 10x22 board with inset-aware collision checks and line clearing
//! - [`clock`]: fixed-rate cycle accumulator driving gravity
//! - [`game_state`]: the session state machine, commands, events and save/load
//! - [`pieces`]: tetromino masks, insets and spawn positions
//! - [`rng`]: seedable uniform piece generator
//! - [`save`]: line-oriented save file codec
//! - [`scoring`]: line clear points, speed and level progression
//! - [`snapshot`]: copyable view for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every piece kind is equally likely, repeats allowed
//! - **Inset wall kicks**: a rotation is pushed back inside the walls before it is validated
//! - **Instant lock**: a piece locks on the first gravity step it cannot fall
//! - **Scoring**: clearing `n` lines at once awards `50 << n`
//! - **Speed**: gravity rises by 0.035 cycles per second with every locked piece
//! - **Ghost Piece**: [`GameState::ghost_row`] shows where the current piece will land
//!
//! # Example
//!
//! ```
//! use term_tetris_core::GameState;
//! use term_tetris_types::GameCommand;
//!
//! let mut game = GameState::new(12345);
//! assert!(game.is_new_game());
//!
//! game.apply_command(GameCommand::StartOrRestart);
//! assert!(game.is_playing());
//!
//! game.apply_command(GameCommand::MoveRight);
//! game.apply_command(GameCommand::RotateCw);
//!
//! // One gravity step
//! game.update_game();
//! assert!(game.active().is_some());
//! ```
//!
//! # Timing
//!
//! The host calls [`GameState::frame`] every 20ms. Each frame advances the
//! clock, runs at most one gravity step while playing and counts down the
//! post-lock drop cooldown.

pub mod board;
pub mod clock;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod save;
pub mod scoring;
pub mod snapshot;

pub use term_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clock::Clock;
pub use game_state::{GameState, Tetromino, DEFAULT_SAVE_PATH};
pub use pieces::{get_shape, insets, Insets};
pub use rng::SimpleRng;
pub use save::{SaveData, SaveError, SavedCell};
pub use scoring::{level_for_speed, line_clear_score, next_speed};
pub use snapshot::{ActiveSnapshot, GameSnapshot};

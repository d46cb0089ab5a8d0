//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, input mapping).
//!
//! # Board Dimensions
//!
//! The well is 10 columns by 22 rows:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 22 rows (indexed 0-21), of which rows 0-1 are hidden
//!   spawn rows above the 20 visible rows
//!
//! # Game Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 20 | Host frame interval (50 FPS) |
//! | `BASE_SPEED` | 1.0 | Gravity in cycles per second at game start |
//! | `MIN_SPEED` | 1e-6 | Slowest gravity accepted from a save file |
//! | `SPEED_INCREMENT` | 0.035 | Speed added for every locked piece |
//! | `SOFT_DROP_SPEED` | 25.0 | Gravity while soft drop is held |
//! | `DROP_COOLDOWN_FRAMES` | 25 | Frames after a lock before soft drop is accepted |
//!
//! # Examples
//!
//! ```
//! use term_tetris_types::{PieceKind, Rotation, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! // Catalog index round trip (used by the save format)
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_index(piece.index()), Some(PieceKind::T));
//!
//! // Rotate
//! let rotation = Rotation::North;
//! assert_eq!(rotation.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(rotation.index()), Some(Rotation::North));
//!
//! // Board dimensions
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Number of rows shown to the player
pub const VISIBLE_ROWS: u8 = 20;

/// Rows above the visible area where pieces spawn and rotate unseen
pub const HIDDEN_ROWS: u8 = 2;

/// Board height in cells including the hidden rows (22 rows)
pub const BOARD_HEIGHT: u8 = VISIBLE_ROWS + HIDDEN_ROWS;

/// Host frame interval in milliseconds (20ms = 50 FPS)
pub const FRAME_MS: u32 = 20;

/// Gravity at the start of a game, in cycles per second
pub const BASE_SPEED: f32 = 1.0;

/// Slowest gravity a session accepts (one step every ~11.5 days); save files
/// with a lower speed are rejected
pub const MIN_SPEED: f32 = 1.0e-6;

/// Gravity increase applied every time a piece locks
pub const SPEED_INCREMENT: f32 = 0.035;

/// Multiplier turning the current speed into the displayed level
pub const LEVEL_FACTOR: f32 = 1.70;

/// Gravity while the soft drop key is held, in cycles per second
pub const SOFT_DROP_SPEED: f32 = 25.0;

/// Frames after a lock during which soft drop is ignored (~0.5s at 50 FPS)
pub const DROP_COOLDOWN_FRAMES: u32 = 25;

/// Line clear base score; clearing `n` lines awards `LINE_CLEAR_BASE << n`
pub const LINE_CLEAR_BASE: u32 = 50;

/// Level shown before the first lock of a new game
pub const STARTING_LEVEL: u32 = 1;

/// The seven tetromino piece kinds, in catalog order
///
/// The discriminant is the catalog index written by the save format:
/// - **I** (0): cyan bar
/// - **J** (1): blue
/// - **L** (2): orange
/// - **O** (3): yellow square
/// - **S** (4): green
/// - **T** (5): purple
/// - **Z** (6): red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Catalog index (0-6)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a kind by catalog index
    ///
    /// ```
    /// use term_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_index(3), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_index(9), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Rotation states, stepping clockwise
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 270° clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use term_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use term_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation index (0-3) as stored in save files
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Rotation::North),
            1 => Some(Rotation::East),
            2 => Some(Rotation::South),
            3 => Some(Rotation::West),
            _ => None,
        }
    }
}

/// Logical player commands, independent of the physical key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Soft drop key went down: fall at soft drop speed
    SoftDropPress,
    /// Soft drop key went up: back to game speed
    SoftDropRelease,
    /// Toggle pause state
    Pause,
    /// Write the game to the save file
    Save,
    /// Restore the game from the save file
    Load,
    /// Start a game from the title screen or after game over
    StartOrRestart,
}

/// What the session is doing; exactly one mode holds at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// Title screen, waiting for the first start command
    #[default]
    NewGame,
    Playing,
    /// A game in progress with the clock frozen
    Paused,
    /// The last spawn collided; waiting for a restart
    GameOver,
}

impl GameMode {
    pub fn is_new_game(self) -> bool {
        self == GameMode::NewGame
    }

    pub fn is_playing(self) -> bool {
        self == GameMode::Playing
    }

    pub fn is_paused(self) -> bool {
        self == GameMode::Paused
    }

    pub fn is_game_over(self) -> bool {
        self == GameMode::GameOver
    }

    /// Whether a game is in progress (playing or paused)
    pub fn in_game(self) -> bool {
        matches!(self, GameMode::Playing | GameMode::Paused)
    }
}

/// State transitions a presentation layer may react to (sound cues, HUD flashes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    PieceSpawned(PieceKind),
    PieceLocked,
    LinesCleared(u32),
    Paused,
    Resumed,
    GameOver,
    Saved,
    Loaded,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_includes_hidden_rows() {
        assert_eq!(BOARD_HEIGHT, 22);
        assert_eq!(BOARD_HEIGHT - HIDDEN_ROWS, VISIBLE_ROWS);
    }

    #[test]
    fn timing_defaults() {
        assert_eq!(FRAME_MS, 20);
        assert_eq!(DROP_COOLDOWN_FRAMES, 25);
        assert_eq!(SOFT_DROP_SPEED, 25.0);
        assert!(MIN_SPEED > 0.0 && MIN_SPEED < BASE_SPEED);
        assert_eq!(LINE_CLEAR_BASE << 4, 800);
    }

    #[test]
    fn piece_index_round_trip() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
    }

    #[test]
    fn rotation_index_round_trip() {
        for i in 0..4 {
            assert_eq!(Rotation::from_index(i).map(|r| r.index()), Some(i));
        }
        assert_eq!(Rotation::from_index(4), None);
    }

    #[test]
    fn mode_flags_are_exclusive() {
        for mode in [
            GameMode::NewGame,
            GameMode::Playing,
            GameMode::Paused,
            GameMode::GameOver,
        ] {
            let flags = [
                mode.is_new_game(),
                mode.is_playing(),
                mode.is_paused(),
                mode.is_game_over(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{:?}", mode);
        }
    }
}

use crate::game_state::Tetromino;
use crate::types::{Cell, GameMode, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Read-only copy of everything a renderer draws.
///
/// `board` includes the two hidden rows; renderers skip them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub speed: f32,
    pub drop_cooldown: u32,
    pub mode: GameMode,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost_y = None;
        self.next = PieceKind::I;
        self.score = 0;
        self.level = 0;
        self.speed = 0.0;
        self.drop_cooldown = 0;
        self.mode = GameMode::NewGame;
    }

    pub fn is_new_game(&self) -> bool {
        self.mode.is_new_game()
    }

    pub fn is_paused(&self) -> bool {
        self.mode.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.mode.is_game_over()
    }

    pub fn playable(&self) -> bool {
        self.mode.is_playing()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            score: 0,
            level: 0,
            speed: 0.0,
            drop_cooldown: 0,
            mode: GameMode::NewGame,
        };
        s.clear();
        s
    }
}

//! Game state module - manages the complete game session
//!
//! This module ties together all core components: board, pieces, clock, RNG,
//! scoring and the save codec. It owns the mode state machine
//!
//! ```text
//! NewGame -> Playing <-> Paused
//!               |
//!               v
//!           GameOver -> (restart) -> Playing
//! ```
//!
//! and turns clock cycles into gravity steps. Time enters only through the
//! `*_at(now)` methods; the plain variants use `Instant::now()`.

use std::mem;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::clock::Clock;
use crate::pieces::{dimension, get_shape, insets, spawn_column, spawn_row, PieceShape};
use crate::rng::SimpleRng;
use crate::save::{read_save, write_save, SaveData, SaveError, SavedCell};
use crate::scoring::{level_for_speed, line_clear_score, next_speed};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Save file used when none is configured
pub const DEFAULT_SAVE_PATH: &str = "DatosGuardados.txt";

/// Pending events kept between two `take_events` calls; extra events are dropped
pub const MAX_PENDING_EVENTS: usize = 16;

pub type EventBuffer = ArrayVec<GameEvent, MAX_PENDING_EVENTS>;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    pub fn new(kind: PieceKind, x: i8, y: i8, rotation: Rotation) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    /// Create a new tetromino at its spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        Self::new(kind, spawn_column(kind), spawn_row(kind), Rotation::North)
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Inside the board and not overlapping locked cells
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_and_empty(self.kind, self.x, self.y, self.rotation)
    }

    pub fn moved(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Tetromino>,
    next: PieceKind,
    rng: SimpleRng,
    clock: Clock,
    mode: GameMode,
    score: u32,
    level: u32,
    speed: f32,
    drop_cooldown: u32,
    /// Soft drop rate is in effect on the clock
    soft_dropping: bool,
    save_path: PathBuf,
    events: EventBuffer,
}

impl GameState {
    /// Create a session on the title screen with the given RNG seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = rng.next_piece();
        let mut clock = Clock::new(BASE_SPEED);
        clock.set_paused(true);

        Self {
            board: Board::new(),
            active: None,
            next,
            rng,
            clock,
            mode: GameMode::NewGame,
            score: 0,
            level: STARTING_LEVEL,
            speed: BASE_SPEED,
            drop_cooldown: 0,
            soft_dropping: false,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            events: EventBuffer::new(),
        }
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_new_game(&self) -> bool {
        self.mode.is_new_game()
    }

    pub fn is_playing(&self) -> bool {
        self.mode.is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.mode.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.mode.is_game_over()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Gravity in cycles per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn drop_cooldown(&self) -> u32 {
        self.drop_cooldown
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Drain the events raised since the previous call
    pub fn take_events(&mut self) -> EventBuffer {
        mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: GameEvent) {
        let _ = self.events.try_push(event);
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_row();
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.speed = self.speed;
        out.drop_cooldown = self.drop_cooldown;
        out.mode = self.mode;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Start a fresh game
    pub fn reset_game(&mut self) {
        self.reset_game_at(Instant::now());
    }

    pub fn reset_game_at(&mut self, now: Instant) {
        self.level = STARTING_LEVEL;
        self.score = 0;
        self.speed = BASE_SPEED;
        self.drop_cooldown = 0;
        self.soft_dropping = false;
        self.next = self.rng.next_piece();
        self.mode = GameMode::Playing;
        self.board.clear();
        self.clock.reset_at(now);
        self.clock.set_cycles_per_second(self.speed);

        tracing::info!("new game started");
        self.push_event(GameEvent::Started);
        self.spawn_piece();
    }

    /// Promote the next piece to the active piece and draw a new next piece.
    ///
    /// A blocked spawn point ends the game. Returns whether the spawn succeeded.
    pub fn spawn_piece(&mut self) -> bool {
        let kind = self.next;
        let piece = Tetromino::spawn(kind);
        self.next = self.rng.next_piece();

        if !piece.is_valid(&self.board) {
            self.active = None;
            self.mode = GameMode::GameOver;
            self.soft_dropping = false;
            self.clock.set_paused(true);
            tracing::info!("game over with score {}", self.score);
            self.push_event(GameEvent::GameOver);
            return false;
        }

        tracing::debug!("spawned {:?}, next {:?}", kind, self.next);
        self.active = Some(piece);
        self.push_event(GameEvent::PieceSpawned(kind));
        true
    }

    /// Shift the active piece horizontally if the target is free
    pub(crate) fn try_move(&mut self, dx: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.moved(dx, 0);
        if moved.is_valid(&self.board) {
            self.active = Some(moved);
            true
        } else {
            false
        }
    }

    /// Rotate the active piece to `target`.
    ///
    /// The candidate is first pushed back inside the board so that a piece
    /// hugging a wall can still turn; then it must be free, or nothing changes.
    pub fn rotate_piece(&mut self, target: Rotation) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let ins = insets(active.kind, target);
        let dim = dimension(active.kind);

        let mut x = active.x;
        let mut y = active.y;

        if x < -ins.left {
            x = -ins.left;
        } else if x + dim - ins.right > BOARD_WIDTH as i8 {
            x = BOARD_WIDTH as i8 - dim + ins.right;
        }

        if y < -ins.top {
            y = -ins.top;
        } else if y + dim - ins.bottom > BOARD_HEIGHT as i8 {
            y = BOARD_HEIGHT as i8 - dim + ins.bottom;
        }

        let candidate = Tetromino::new(active.kind, x, y, target);
        if candidate.is_valid(&self.board) {
            self.active = Some(candidate);
            true
        } else {
            false
        }
    }

    /// One gravity step: fall a row, or lock and spawn the next piece
    pub fn update_game(&mut self) {
        self.update_game_at(Instant::now());
    }

    pub fn update_game_at(&mut self, now: Instant) {
        let Some(active) = self.active else {
            return;
        };

        let fallen = active.moved(0, 1);
        if fallen.is_valid(&self.board) {
            self.active = Some(fallen);
            return;
        }

        self.lock_piece(active, now);
    }

    fn lock_piece(&mut self, piece: Tetromino, now: Instant) {
        self.board
            .add_piece(piece.kind, piece.x, piece.y, piece.rotation);
        self.active = None;
        self.push_event(GameEvent::PieceLocked);

        let cleared = self.board.check_lines();
        if cleared > 0 {
            self.score = self.score.saturating_add(line_clear_score(cleared));
            tracing::debug!("cleared {} lines, score {}", cleared, self.score);
            self.push_event(GameEvent::LinesCleared(cleared));
        }

        self.speed = next_speed(self.speed);
        self.clock.set_cycles_per_second(self.speed);
        self.clock.reset_at(now);
        self.soft_dropping = false;
        self.drop_cooldown = DROP_COOLDOWN_FRAMES;
        self.level = level_for_speed(self.speed);

        tracing::debug!(
            "locked {:?} at ({}, {}), speed {:.3}",
            piece.kind,
            piece.x,
            piece.y,
            self.speed
        );
        self.spawn_piece();
    }

    /// Lowest row the active piece can fall to
    pub fn ghost_row(&self) -> Option<i8> {
        let mut ghost = self.active?;
        loop {
            let below = ghost.moved(0, 1);
            if !below.is_valid(&self.board) {
                return Some(ghost.y);
            }
            ghost = below;
        }
    }

    /// One host frame
    pub fn frame(&mut self) -> bool {
        self.frame_at(Instant::now())
    }

    /// Advance the clock to `now`, run at most one gravity step while playing
    /// and count down the drop cooldown. Returns whether a step ran.
    pub fn frame_at(&mut self, now: Instant) -> bool {
        self.clock.update_at(now);

        let mut stepped = false;
        if self.mode.is_playing() && self.clock.has_elapsed_cycle() {
            self.update_game_at(now);
            stepped = true;
        }

        if self.drop_cooldown > 0 {
            self.drop_cooldown -= 1;
        }
        stepped
    }

    /// Apply a player command. Returns whether it changed anything.
    pub fn apply_command(&mut self, command: GameCommand) -> bool {
        self.apply_command_at(command, Instant::now())
    }

    pub fn apply_command_at(&mut self, command: GameCommand, now: Instant) -> bool {
        match command {
            GameCommand::StartOrRestart => {
                if self.mode.is_new_game() || self.mode.is_game_over() {
                    self.reset_game_at(now);
                    true
                } else {
                    false
                }
            }
            GameCommand::Pause => self.toggle_pause(),
            GameCommand::MoveLeft => self.mode.is_playing() && self.try_move(-1),
            GameCommand::MoveRight => self.mode.is_playing() && self.try_move(1),
            GameCommand::RotateCw => {
                self.mode.is_playing() && self.rotate_active(Rotation::rotate_cw)
            }
            GameCommand::RotateCcw => {
                self.mode.is_playing() && self.rotate_active(Rotation::rotate_ccw)
            }
            GameCommand::SoftDropPress => self.start_soft_drop(),
            GameCommand::SoftDropRelease => self.end_soft_drop(now),
            GameCommand::Save => {
                let path = self.save_path.clone();
                match self.save_to(&path) {
                    Ok(saved) => saved,
                    Err(e) => {
                        tracing::warn!("saving to {} failed: {}", path.display(), e);
                        false
                    }
                }
            }
            GameCommand::Load => {
                let path = self.save_path.clone();
                match self.load_from_at(&path, now) {
                    Ok(loaded) => loaded,
                    Err(e) => {
                        tracing::warn!("loading {} failed: {}", path.display(), e);
                        false
                    }
                }
            }
        }
    }

    fn rotate_active(&mut self, step: fn(&Rotation) -> Rotation) -> bool {
        match self.active {
            Some(active) => self.rotate_piece(step(&active.rotation)),
            None => false,
        }
    }

    fn toggle_pause(&mut self) -> bool {
        match self.mode {
            GameMode::Playing => {
                self.mode = GameMode::Paused;
                self.clock.set_paused(true);
                self.push_event(GameEvent::Paused);
                true
            }
            GameMode::Paused => {
                self.mode = GameMode::Playing;
                self.clock.set_paused(false);
                self.push_event(GameEvent::Resumed);
                true
            }
            GameMode::NewGame | GameMode::GameOver => false,
        }
    }

    fn start_soft_drop(&mut self) -> bool {
        if !self.mode.is_playing() || self.drop_cooldown > 0 || self.soft_dropping {
            return false;
        }
        self.soft_dropping = true;
        self.clock.set_cycles_per_second(SOFT_DROP_SPEED);
        true
    }

    fn end_soft_drop(&mut self, now: Instant) -> bool {
        if !self.soft_dropping {
            return false;
        }
        self.soft_dropping = false;
        self.clock.set_cycles_per_second(self.speed);
        self.clock.reset_at(now);
        if !self.mode.is_playing() {
            self.clock.set_paused(true);
        }
        true
    }

    /// Everything needed to resume this game later; `None` without an active piece
    pub fn save_data(&self) -> Option<SaveData> {
        let active = self.active?;
        Some(SaveData {
            level: self.level,
            score: self.score,
            speed: self.speed,
            current: active.kind,
            col: active.x,
            rotation: active.rotation,
            row: active.y,
            drop_cooldown: self.drop_cooldown,
            paused: self.mode.is_paused(),
            new_game: self.mode.is_new_game(),
            next: self.next,
            cells: self
                .board
                .occupied_cells()
                .map(|(col, row, kind)| SavedCell { row, col, kind })
                .collect(),
        })
    }

    /// Write the game to `path`. Only a game in progress is saved.
    pub fn save_to(&mut self, path: &Path) -> Result<bool, SaveError> {
        if !self.mode.in_game() {
            return Ok(false);
        }
        let Some(data) = self.save_data() else {
            return Ok(false);
        };
        write_save(path, &data)?;
        tracing::info!("game saved to {}", path.display());
        self.push_event(GameEvent::Saved);
        Ok(true)
    }

    /// Replace the game in progress with the one stored at `path`.
    ///
    /// A missing file is not an error and changes nothing; neither does a
    /// malformed one, which is reported as `Err`.
    pub fn load_from(&mut self, path: &Path) -> Result<bool, SaveError> {
        self.load_from_at(path, Instant::now())
    }

    fn load_from_at(&mut self, path: &Path, now: Instant) -> Result<bool, SaveError> {
        if !self.mode.in_game() {
            return Ok(false);
        }
        match read_save(path)? {
            Some(data) => {
                self.restore_at(data, now);
                tracing::info!("game loaded from {}", path.display());
                Ok(true)
            }
            None => {
                tracing::debug!("no save file at {}", path.display());
                Ok(false)
            }
        }
    }

    /// Apply decoded save data to this session
    pub fn restore(&mut self, data: SaveData) {
        self.restore_at(data, Instant::now());
    }

    pub fn restore_at(&mut self, data: SaveData, now: Instant) {
        self.board.clear();
        for cell in &data.cells {
            self.board.set(cell.col, cell.row, Some(cell.kind));
        }

        self.level = data.level;
        self.score = data.score;
        self.speed = data.speed;
        self.active = Some(Tetromino::new(
            data.current,
            data.col,
            data.row,
            data.rotation,
        ));
        self.next = data.next;
        self.drop_cooldown = data.drop_cooldown;
        self.soft_dropping = false;
        self.mode = if data.new_game {
            GameMode::NewGame
        } else if data.paused {
            GameMode::Paused
        } else {
            GameMode::Playing
        };

        self.clock.set_cycles_per_second(self.speed);
        self.clock.reset_at(now);
        if !self.mode.is_playing() {
            self.clock.set_paused(true);
        }
        self.push_event(GameEvent::Loaded);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

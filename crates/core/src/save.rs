//! Save module - line-oriented text codec for a game in progress
//!
//! One value per line, in this order:
//!
//! ```text
//! level
//! score
//! speed            (float, e.g. 1.035)
//! current piece    (catalog index 0-6)
//! current column
//! current rotation (0-3)
//! current row
//! drop cooldown
//! paused flag      (0/1)
//! new game flag    (0/1)
//! next piece       (catalog index 0-6)
//! ```
//!
//! followed by one `row`, `col`, `piece` triple per occupied board cell,
//! row-major, until end of input. There is no count prefix.
//!
//! Decoding is strict: everything is parsed into a [`SaveData`] first, so a
//! malformed file never touches a running game.

use std::fmt::Write as _;
use std::io;
use std::ops::RangeInclusive;
use std::path::Path;

use thiserror::Error;

use crate::pieces::{dimension, insets};
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, MIN_SPEED};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("save data ended before `{field}` (line {line})")]
    MissingField { field: &'static str, line: usize },

    #[error("`{field}` on line {line} is not a valid number: {value:?}")]
    InvalidNumber {
        field: &'static str,
        line: usize,
        value: String,
    },

    #[error("`{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("board cell starting on line {line} is incomplete")]
    TruncatedCell { line: usize },
}

/// One occupied board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedCell {
    pub row: i8,
    pub col: i8,
    pub kind: PieceKind,
}

/// Everything the save file stores, validated and ready to apply
#[derive(Debug, Clone, PartialEq)]
pub struct SaveData {
    pub level: u32,
    pub score: u32,
    pub speed: f32,
    pub current: PieceKind,
    pub col: i8,
    pub rotation: Rotation,
    pub row: i8,
    pub drop_cooldown: u32,
    pub paused: bool,
    pub new_game: bool,
    pub next: PieceKind,
    pub cells: Vec<SavedCell>,
}

/// Render save data in the file format
pub fn encode(data: &SaveData) -> String {
    let mut out = String::with_capacity(64 + data.cells.len() * 8);
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", data.level);
    let _ = writeln!(out, "{}", data.score);
    let _ = writeln!(out, "{:?}", data.speed);
    let _ = writeln!(out, "{}", data.current.index());
    let _ = writeln!(out, "{}", data.col);
    let _ = writeln!(out, "{}", data.rotation.index());
    let _ = writeln!(out, "{}", data.row);
    let _ = writeln!(out, "{}", data.drop_cooldown);
    let _ = writeln!(out, "{}", data.paused as u8);
    let _ = writeln!(out, "{}", data.new_game as u8);
    let _ = writeln!(out, "{}", data.next.index());
    for cell in &data.cells {
        let _ = writeln!(out, "{}", cell.row);
        let _ = writeln!(out, "{}", cell.col);
        let _ = writeln!(out, "{}", cell.kind.index());
    }
    out
}

/// Line cursor with 1-based line numbers for error reporting
struct Fields<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let text = self.lines.next()?;
        self.line += 1;
        Some((self.line, text.trim()))
    }

    /// Next non-blank line (board section)
    fn next_nonblank(&mut self) -> Option<(usize, &'a str)> {
        loop {
            let (line, text) = self.next_line()?;
            if !text.is_empty() {
                return Some((line, text));
            }
        }
    }

    fn int(&mut self, field: &'static str) -> Result<i64, SaveError> {
        let (line, text) = self.next_line().ok_or(SaveError::MissingField {
            field,
            line: self.line + 1,
        })?;
        parse_int(field, line, text)
    }

    fn int_in(&mut self, field: &'static str, range: RangeInclusive<i64>) -> Result<i64, SaveError> {
        check_range(field, self.int(field)?, range)
    }

    fn float(&mut self, field: &'static str) -> Result<f32, SaveError> {
        let (line, text) = self.next_line().ok_or(SaveError::MissingField {
            field,
            line: self.line + 1,
        })?;
        let invalid = || SaveError::InvalidNumber {
            field,
            line,
            value: text.to_string(),
        };
        let value: f32 = text.parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < MIN_SPEED {
            return Err(invalid());
        }
        Ok(value)
    }

    fn piece(&mut self, field: &'static str) -> Result<PieceKind, SaveError> {
        let index = self.int_in(field, 0..=6)?;
        PieceKind::from_index(index as usize).ok_or(SaveError::OutOfRange { field, value: index })
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, SaveError> {
        Ok(self.int_in(field, 0..=1)? == 1)
    }
}

fn parse_int(field: &'static str, line: usize, text: &str) -> Result<i64, SaveError> {
    text.parse().map_err(|_| SaveError::InvalidNumber {
        field,
        line,
        value: text.to_string(),
    })
}

fn check_range(field: &'static str, value: i64, range: RangeInclusive<i64>) -> Result<i64, SaveError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(SaveError::OutOfRange { field, value })
    }
}

/// Parse and validate save data
pub fn decode(input: &str) -> Result<SaveData, SaveError> {
    let mut fields = Fields::new(input);

    let level = fields.int_in("level", 0..=u32::MAX as i64)? as u32;
    let score = fields.int_in("score", 0..=u32::MAX as i64)? as u32;
    let speed = fields.float("speed")?;
    let current = fields.piece("current piece")?;
    let col = fields.int("current column")?;
    let rotation_index = fields.int_in("current rotation", 0..=3)?;
    let rotation = Rotation::from_index(rotation_index as usize).ok_or(SaveError::OutOfRange {
        field: "current rotation",
        value: rotation_index,
    })?;
    let row = fields.int("current row")?;
    let drop_cooldown = fields.int_in("drop cooldown", 0..=u32::MAX as i64)? as u32;
    let paused = fields.flag("paused flag")?;
    let new_game = fields.flag("new game flag")?;
    let next = fields.piece("next piece")?;

    // The active piece's footprint must be inside the grid.
    let ins = insets(current, rotation);
    let dim = dimension(current) as i64;
    let col = check_range(
        "current column",
        col,
        -(ins.left as i64)..=BOARD_WIDTH as i64 - dim + ins.right as i64,
    )? as i8;
    let row = check_range(
        "current row",
        row,
        -(ins.top as i64)..=BOARD_HEIGHT as i64 - dim + ins.bottom as i64,
    )? as i8;

    let mut cells = Vec::new();
    while let Some((start, text)) = fields.next_nonblank() {
        let cell_row = check_range(
            "cell row",
            parse_int("cell row", start, text)?,
            0..=BOARD_HEIGHT as i64 - 1,
        )?;
        let (line, text) = fields
            .next_line()
            .ok_or(SaveError::TruncatedCell { line: start })?;
        let cell_col = check_range(
            "cell column",
            parse_int("cell column", line, text)?,
            0..=BOARD_WIDTH as i64 - 1,
        )?;
        let (line, text) = fields
            .next_line()
            .ok_or(SaveError::TruncatedCell { line: start })?;
        let kind_index = check_range("cell piece", parse_int("cell piece", line, text)?, 0..=6)?;
        let kind = PieceKind::from_index(kind_index as usize).ok_or(SaveError::OutOfRange {
            field: "cell piece",
            value: kind_index,
        })?;
        cells.push(SavedCell {
            row: cell_row as i8,
            col: cell_col as i8,
            kind,
        });
    }

    Ok(SaveData {
        level,
        score,
        speed,
        current,
        col,
        rotation,
        row,
        drop_cooldown,
        paused,
        new_game,
        next,
        cells,
    })
}

pub fn write_save(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    std::fs::write(path, encode(data))?;
    Ok(())
}

/// Read and decode a save file. A missing file is `Ok(None)`.
pub fn read_save(path: &Path) -> Result<Option<SaveData>, SaveError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    decode(&text).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SaveData {
        SaveData {
            level: 1,
            score: 300,
            speed: 1.035,
            current: PieceKind::T,
            col: 4,
            rotation: Rotation::East,
            row: 3,
            drop_cooldown: 12,
            paused: true,
            new_game: false,
            next: PieceKind::I,
            cells: vec![
                SavedCell {
                    row: 20,
                    col: 0,
                    kind: PieceKind::O,
                },
                SavedCell {
                    row: 21,
                    col: 9,
                    kind: PieceKind::Z,
                },
            ],
        }
    }

    #[test]
    fn test_encode_layout() {
        let text = encode(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "1", "300", "1.035", "5", "4", "1", "3", "12", "1", "0", "0", "20", "0", "3", "21",
                "9", "6"
            ]
        );
    }

    #[test]
    fn test_whole_speed_keeps_decimal_point() {
        let mut data = sample();
        data.speed = 1.0;
        assert_eq!(encode(&data).lines().nth(2), Some("1.0"));
    }

    #[test]
    fn test_decode_accepts_crlf_and_trailing_blank_lines() {
        let text = encode(&sample()).replace('\n', "\r\n") + "\r\n\r\n";
        assert_eq!(decode(&text).unwrap(), sample());
    }

    #[test]
    fn test_decode_missing_field() {
        let err = decode("1\n300\n").unwrap_err();
        assert!(matches!(
            err,
            SaveError::MissingField {
                field: "speed",
                line: 3
            }
        ));
    }

    #[test]
    fn test_decode_invalid_number() {
        let err = decode("1\nlots\n").unwrap_err();
        assert!(matches!(err, SaveError::InvalidNumber { field: "score", line: 2, .. }));
    }

    #[test]
    fn test_decode_rejects_bad_piece_index() {
        let text = encode(&sample()).replacen("\n5\n", "\n7\n", 1);
        assert!(matches!(
            decode(&text).unwrap_err(),
            SaveError::OutOfRange {
                field: "current piece",
                value: 7
            }
        ));
    }

    #[test]
    fn test_decode_truncated_cell() {
        let mut text = encode(&sample());
        text.push_str("5\n5\n");
        let header_and_cells = 11 + 6;
        assert!(matches!(
            decode(&text).unwrap_err(),
            SaveError::TruncatedCell { line } if line == header_and_cells + 1
        ));
    }

    #[test]
    fn test_decode_rejects_cell_outside_board() {
        let mut text = encode(&sample());
        text.push_str("22\n0\n1\n");
        assert!(matches!(
            decode(&text).unwrap_err(),
            SaveError::OutOfRange {
                field: "cell row",
                value: 22
            }
        ));
    }

    #[test]
    fn test_decode_rejects_active_piece_outside_board() {
        let mut data = sample();
        // T East occupies bounding-box columns 1..3, so col 8 pokes out.
        data.col = 8;
        assert!(matches!(
            decode(&encode(&data)).unwrap_err(),
            SaveError::OutOfRange {
                field: "current column",
                value: 8
            }
        ));
        data.col = 7;
        assert!(decode(&encode(&data)).is_ok());
    }

    #[test]
    fn test_decode_rejects_non_positive_speed() {
        let text = encode(&sample()).replacen("1.035", "0.0", 1);
        assert!(matches!(
            decode(&text).unwrap_err(),
            SaveError::InvalidNumber { field: "speed", .. }
        ));
    }

    #[test]
    fn test_decode_rejects_speed_below_floor() {
        let err = decode("1\n0\n1e-30\n3\n4\n0\n5\n0\n0\n0\n3\n").unwrap_err();
        assert!(matches!(
            err,
            SaveError::InvalidNumber { field: "speed", line: 3, ref value } if value == "1e-30"
        ));
    }

    #[test]
    fn test_decoded_speed_drives_a_clock() {
        let text = encode(&sample()).replacen("1.035", "1.0E-5", 1);
        let data = decode(&text).unwrap();
        assert_eq!(data.speed, 1.0e-5);

        let mut clock = crate::clock::Clock::new(1.0);
        clock.set_cycles_per_second(data.speed);
        assert_eq!(clock.cycles_per_second(), 1.0e-5);
    }
}

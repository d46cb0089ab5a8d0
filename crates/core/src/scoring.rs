//! Scoring module - line clear points, gravity progression and level display
//!
//! Clearing `n` rows at once awards `50 << n` (100, 200, 400, 800). Every
//! locked piece speeds gravity up by a fixed increment; the level shown to the
//! player is derived from the speed and has no effect on the rules.

use crate::types::{LEVEL_FACTOR, LINE_CLEAR_BASE, SPEED_INCREMENT};

/// Points for clearing `lines` rows with a single lock
pub fn line_clear_score(lines: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    LINE_CLEAR_BASE.checked_shl(lines).unwrap_or(u32::MAX)
}

/// Gravity after one more piece has locked
pub fn next_speed(speed: f32) -> f32 {
    speed + SPEED_INCREMENT
}

/// Displayed level for a gravity speed
pub fn level_for_speed(speed: f32) -> u32 {
    (speed * LEVEL_FACTOR).floor().max(0.0) as u32
}

//! Soft drop hold tracking for terminal environments.
//!
//! The soft drop lasts while its key is held. Terminals with keyboard
//! enhancement report the release directly; on the others a held key only
//! shows up as a stream of repeats, so a release is synthesised once the
//! repeats stop for longer than a timeout.

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{is_soft_drop_key, map_key};
use crate::types::GameCommand;

/// Silence after the last soft drop key event that counts as a release.
///
/// Longer than the usual key repeat delay (~500ms) so that a held key is not
/// released before its first repeat arrives.
pub const DEFAULT_SOFT_DROP_RELEASE_MS: u64 = 550;

#[derive(Debug, Clone)]
pub struct InputHandler {
    drop_held: bool,
    last_drop_key: Instant,
    release_timeout: Duration,
    /// Set once the terminal has reported any key release
    release_events: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            drop_held: false,
            last_drop_key: Instant::now(),
            release_timeout: Duration::from_millis(DEFAULT_SOFT_DROP_RELEASE_MS),
            release_events: false,
        }
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// Declare up front that the terminal reports key releases
    pub fn with_release_events(mut self, enabled: bool) -> Self {
        self.release_events = enabled;
        self
    }

    pub fn release_timeout(&self) -> Duration {
        self.release_timeout
    }

    pub fn is_drop_held(&self) -> bool {
        self.drop_held
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<GameCommand> {
        self.handle_key_event_at(key, Instant::now())
    }

    /// Translate one terminal key event into a command
    pub fn handle_key_event_at(&mut self, key: KeyEvent, now: Instant) -> Option<GameCommand> {
        match key.kind {
            KeyEventKind::Release => {
                self.release_events = true;
                if is_soft_drop_key(key.code) && self.drop_held {
                    self.drop_held = false;
                    Some(GameCommand::SoftDropRelease)
                } else {
                    None
                }
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let command = map_key(key)?;
                if command == GameCommand::SoftDropPress {
                    self.drop_held = true;
                    self.last_drop_key = now;
                }
                Some(command)
            }
        }
    }

    pub fn update(&mut self) -> Option<GameCommand> {
        self.update_at(Instant::now())
    }

    /// Synthesise a soft drop release on terminals without release events
    pub fn update_at(&mut self, now: Instant) -> Option<GameCommand> {
        if self.release_events || !self.drop_held {
            return None;
        }
        if now.saturating_duration_since(self.last_drop_key) > self.release_timeout {
            self.drop_held = false;
            return Some(GameCommand::SoftDropRelease);
        }
        None
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn test_press_and_repeat_emit_soft_drop() {
        let t0 = Instant::now();
        let mut ih = InputHandler::new();

        assert_eq!(
            ih.handle_key_event_at(key(KeyCode::Down, KeyEventKind::Press), t0),
            Some(GameCommand::SoftDropPress)
        );
        assert!(ih.is_drop_held());
        assert_eq!(
            ih.handle_key_event_at(key(KeyCode::Down, KeyEventKind::Repeat), t0),
            Some(GameCommand::SoftDropPress)
        );
    }

    #[test]
    fn test_release_event_ends_soft_drop() {
        let t0 = Instant::now();
        let mut ih = InputHandler::new();

        ih.handle_key_event_at(key(KeyCode::Char('s'), KeyEventKind::Press), t0);
        assert_eq!(
            ih.handle_key_event_at(key(KeyCode::Char('s'), KeyEventKind::Release), t0),
            Some(GameCommand::SoftDropRelease)
        );
        // A second release has nothing to end.
        assert_eq!(
            ih.handle_key_event_at(key(KeyCode::Char('s'), KeyEventKind::Release), t0),
            None
        );
    }

    #[test]
    fn test_auto_release_after_timeout_without_release_events() {
        let t0 = Instant::now();
        let mut ih = InputHandler::new().with_release_timeout_ms(50);

        ih.handle_key_event_at(key(KeyCode::Down, KeyEventKind::Press), t0);
        assert_eq!(ih.update_at(t0 + Duration::from_millis(50)), None);

        // A repeat pushes the deadline out.
        ih.handle_key_event_at(key(KeyCode::Down, KeyEventKind::Repeat), t0 + Duration::from_millis(40));
        assert_eq!(ih.update_at(t0 + Duration::from_millis(80)), None);

        assert_eq!(
            ih.update_at(t0 + Duration::from_millis(91)),
            Some(GameCommand::SoftDropRelease)
        );
        assert!(!ih.is_drop_held());
        assert_eq!(ih.update_at(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_no_auto_release_once_terminal_reports_releases() {
        let t0 = Instant::now();
        let mut ih = InputHandler::new().with_release_timeout_ms(50);

        // Any release event proves the terminal reports them.
        ih.handle_key_event_at(key(KeyCode::Left, KeyEventKind::Release), t0);
        ih.handle_key_event_at(key(KeyCode::Down, KeyEventKind::Press), t0);
        assert_eq!(ih.update_at(t0 + Duration::from_secs(5)), None);
        assert!(ih.is_drop_held());
    }

    #[test]
    fn test_other_keys_do_not_touch_drop_state() {
        let t0 = Instant::now();
        let mut ih = InputHandler::new();
        assert_eq!(
            ih.handle_key_event_at(key(KeyCode::Left, KeyEventKind::Press), t0),
            Some(GameCommand::MoveLeft)
        );
        assert_eq!(
            ih.handle_key_event_at(key(KeyCode::Left, KeyEventKind::Release), t0),
            None
        );
        assert!(!ih.is_drop_held());
    }

    #[test]
    fn test_default_release_timeout_is_non_zero() {
        let ih = InputHandler::new();
        assert!(ih.release_timeout() > Duration::ZERO);
    }
}

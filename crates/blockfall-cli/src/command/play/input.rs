use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Ticks a latched soft drop survives without another ↓ event (150ms at 30Hz).
///
/// Only used when the terminal cannot report key release.
pub(crate) const SOFT_DROP_GRACE_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Command(Command),
    Quit,
}

/// Maps a pressed key to its action.
pub(crate) fn key_action(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::Left => KeyAction::Command(Command::MoveLeft),
        KeyCode::Right => KeyAction::Command(Command::MoveRight),
        KeyCode::Up => KeyAction::Command(Command::RotateCw),
        KeyCode::Down => KeyAction::Command(Command::SoftDropStart),
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Turns terminal key events into session commands.
///
/// Holding ↓ keeps soft drop on. Terminals with key release reporting end it
/// on release. Elsewhere a held key only shows up as repeated presses, so
/// soft drop is latched and lapses after [`SOFT_DROP_GRACE_TICKS`] ticks
/// without a ↓ event.
#[derive(Debug)]
pub(crate) struct InputState {
    key_release_events: bool,
    soft_drop: Option<u32>,
}

impl InputState {
    pub(crate) fn new(key_release_events: bool) -> Self {
        Self {
            key_release_events,
            soft_drop: None,
        }
    }

    pub(crate) fn is_soft_dropping(&self) -> bool {
        self.soft_drop.is_some()
    }

    pub(crate) fn handle_key(&mut self, event: KeyEvent) -> Option<KeyAction> {
        if event.kind == KeyEventKind::Release {
            if event.code == KeyCode::Down && self.soft_drop.take().is_some() {
                return Some(KeyAction::Command(Command::SoftDropStop));
            }
            return None;
        }

        let action = key_action(event.code)?;
        if action == KeyAction::Command(Command::SoftDropStart) {
            let was_active = self.soft_drop.replace(SOFT_DROP_GRACE_TICKS).is_some();
            if was_active {
                return None;
            }
        }
        Some(action)
    }

    /// Advances the latch by one tick, returning `SoftDropStop` when it lapses.
    pub(crate) fn tick(&mut self) -> Option<Command> {
        if self.key_release_events {
            return None;
        }
        let remaining = self.soft_drop.as_mut()?;
        *remaining -= 1;
        if *remaining > 0 {
            return None;
        }
        self.soft_drop = None;
        Some(Command::SoftDropStop)
    }
}

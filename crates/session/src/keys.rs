//! Platform-sensitive undo/redo shortcut resolution.
//!
//! macOS accepts Cmd or Ctrl with Z (Shift added for redo); everywhere
//! else it is Ctrl+Z and Ctrl+Shift+Z. When a chord resolves to a
//! command the caller must suppress the native default (prevent
//! default / stop propagation on the originating event), or the
//! browser's own text undo fights the editor's history in rich-text
//! inputs elsewhere on the page.

use serde::{Deserialize, Serialize};

/// The platform the key event originated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    MacOs,
    Other,
}

/// A pressed key plus its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyChord {
    /// The key value (as in `KeyboardEvent.key`), matched
    /// case-insensitively so Shift-modified keys still resolve.
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    /// Cmd on macOS.
    pub meta: bool,
}

/// A resolved history command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

/// Resolve a key chord to a history command, if any.
pub fn history_command(chord: &KeyChord, platform: Platform) -> Option<HistoryCommand> {
    if !chord.key.eq_ignore_ascii_case("z") {
        return None;
    }
    let modifier_held = match platform {
        Platform::MacOs => chord.meta || chord.ctrl,
        Platform::Other => chord.ctrl && !chord.meta,
    };
    if !modifier_held {
        return None;
    }
    Some(if chord.shift {
        HistoryCommand::Redo
    } else {
        HistoryCommand::Undo
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(key: &str, ctrl: bool, shift: bool, meta: bool) -> KeyChord {
        KeyChord {
            key: key.into(),
            ctrl,
            shift,
            meta,
        }
    }

    #[test]
    fn mac_accepts_cmd_or_ctrl_for_undo() {
        assert_eq!(
            history_command(&chord("z", false, false, true), Platform::MacOs),
            Some(HistoryCommand::Undo)
        );
        assert_eq!(
            history_command(&chord("z", true, false, false), Platform::MacOs),
            Some(HistoryCommand::Undo)
        );
    }

    #[test]
    fn mac_shift_means_redo() {
        assert_eq!(
            history_command(&chord("Z", false, true, true), Platform::MacOs),
            Some(HistoryCommand::Redo)
        );
    }

    #[test]
    fn other_platforms_require_ctrl() {
        assert_eq!(
            history_command(&chord("z", true, false, false), Platform::Other),
            Some(HistoryCommand::Undo)
        );
        assert_eq!(
            history_command(&chord("z", true, true, false), Platform::Other),
            Some(HistoryCommand::Redo)
        );
        // Cmd alone does nothing off-mac.
        assert_eq!(history_command(&chord("z", false, false, true), Platform::Other), None);
    }

    #[test]
    fn unmodified_or_non_z_keys_do_not_resolve() {
        assert_eq!(history_command(&chord("z", false, false, false), Platform::MacOs), None);
        assert_eq!(history_command(&chord("y", true, false, false), Platform::Other), None);
    }
}

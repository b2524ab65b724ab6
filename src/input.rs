//! Input handling module
//!
//! Single-line text entry used to edit the game path and the archive folder.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::Display;

/// Which remembered path the dialog edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PathField {
    #[strum(serialize = "World of Tanks path")]
    GamePath,
    #[strum(serialize = "Mod archive folder")]
    ZipFolder,
}

/// Result of feeding one key to a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// User confirmed with a value
    Confirm(String),
    /// User cancelled
    Cancel,
    /// Continue processing input
    Continue,
}

/// Text input dialog state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDialog {
    pub field: PathField,
    pub value: String,
    /// Cursor position in chars
    pub cursor: usize,
}

impl InputDialog {
    /// Open a dialog pre-filled with `current`, cursor at the end.
    pub fn new(field: PathField, current: impl Into<String>) -> Self {
        let value = current.into();
        let cursor = value.chars().count();
        Self {
            field,
            value,
            cursor,
        }
    }

    pub fn title(&self) -> String {
        format!(" {} ", self.field)
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Handle keyboard input for the dialog
    pub fn handle_input(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => return InputResult::Confirm(self.value.trim().to_string()),
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let at = self.byte_index(self.cursor - 1);
                    self.value.remove(at);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            // Ctrl+U clears the line
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                self.cursor = 0;
            }
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_confirm() {
        let mut dialog = InputDialog::new(PathField::GamePath, "C:\\WoT");
        assert_eq!(dialog.cursor, 6);
        dialog.handle_input(key(KeyCode::Backspace));
        dialog.handle_input(key(KeyCode::Char('X')));
        assert_eq!(
            dialog.handle_input(key(KeyCode::Enter)),
            InputResult::Confirm("C:\\WoX".to_string())
        );
    }

    #[test]
    fn test_insert_in_middle_with_multibyte() {
        let mut dialog = InputDialog::new(PathField::ZipFolder, "/möds");
        dialog.handle_input(key(KeyCode::Home));
        dialog.handle_input(key(KeyCode::Right));
        dialog.handle_input(key(KeyCode::Right));
        dialog.handle_input(key(KeyCode::Delete));
        assert_eq!(dialog.value, "/mds");
        dialog.handle_input(key(KeyCode::Char('ö')));
        assert_eq!(dialog.value, "/möds");
        assert_eq!(dialog.cursor, 3);
    }

    #[test]
    fn test_escape_and_clear() {
        let mut dialog = InputDialog::new(PathField::GamePath, "abc");
        dialog.handle_input(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(dialog.value.is_empty());
        assert_eq!(dialog.handle_input(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(dialog.title(), " World of Tanks path ");
    }
}

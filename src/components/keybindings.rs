//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change based on the current
//! application mode. The event loop resolves keys to [`KeyAction`]s here,
//! and the nav bar and help overlay render from the same table.

use crate::app::AppMode;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    PageUp,
    PageDown,
    Home,
    End,
    ToggleArchive,
    SelectAll,
    SelectNone,
    Refresh,
    DetectVersion,
    EditGamePath,
    EditZipFolder,
    Preview,
    Install,
    /// Switch the focused dialog button
    ToggleButton,
    Confirm,
    Cancel,
    ScrollUp,
    ScrollDown,
    Dismiss,
    Help,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    fn matches(&self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        let key = match key {
            KeyCode::Char(c) if self.modifiers == KeyModifiers::NONE => {
                KeyCode::Char(c.to_ascii_lowercase())
            }
            other => other,
        };
        // Shift is implied by uppercase letters and symbols like '?'
        let modifiers = modifiers.difference(KeyModifiers::SHIFT);
        self.key == key && self.modifiers == modifiers
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Mode-specific keybindings
    mode_bindings: HashMap<AppMode, Vec<Keybinding>>,
    /// Global keybindings (available in all modes)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            mode_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    /// Register default keybindings for all modes
    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        self.mode_bindings.insert(
            AppMode::Browse,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Previous archive"),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Next archive"),
                Keybinding::new(KeyCode::Home, KeyAction::Home, "Home", "First archive"),
                Keybinding::new(KeyCode::End, KeyAction::End, "End", "Last archive"),
                Keybinding::new(KeyCode::PageUp, KeyAction::ScrollUp, "PgUp", "Scroll log up"),
                Keybinding::new(KeyCode::PageDown, KeyAction::ScrollDown, "PgDn", "Scroll log down"),
                Keybinding::new(KeyCode::Char(' '), KeyAction::ToggleArchive, "Space", "Select archive"),
                Keybinding::new(KeyCode::Char('a'), KeyAction::SelectAll, "A", "Select all"),
                Keybinding::new(KeyCode::Char('n'), KeyAction::SelectNone, "N", "Select none"),
                Keybinding::new(KeyCode::Char('r'), KeyAction::Refresh, "R", "Refresh list"),
                Keybinding::new(KeyCode::Char('d'), KeyAction::DetectVersion, "D", "Detect version"),
                Keybinding::new(KeyCode::Char('g'), KeyAction::EditGamePath, "G", "Game path"),
                Keybinding::new(KeyCode::Char('z'), KeyAction::EditZipFolder, "Z", "Archive folder"),
                Keybinding::new(KeyCode::Char('p'), KeyAction::Preview, "P", "Preview"),
                Keybinding::new(KeyCode::Char('i'), KeyAction::Install, "I", "Install"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        self.mode_bindings.insert(
            AppMode::Preview,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::ScrollUp, "Up", "Scroll up"),
                Keybinding::new(KeyCode::Down, KeyAction::ScrollDown, "Down", "Scroll down"),
                Keybinding::new(KeyCode::PageUp, KeyAction::PageUp, "PgUp", "Page up"),
                Keybinding::new(KeyCode::PageDown, KeyAction::PageDown, "PgDn", "Page down"),
                Keybinding::new(KeyCode::Home, KeyAction::Home, "Home", "Top"),
                Keybinding::new(KeyCode::End, KeyAction::End, "End", "Bottom"),
                Keybinding::new(KeyCode::Esc, KeyAction::Dismiss, "Esc", "Close"),
                Keybinding::new(KeyCode::Enter, KeyAction::Dismiss, "Enter", "Close"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Dismiss, "Q", "Close"),
                Keybinding::new(KeyCode::Char('i'), KeyAction::Install, "I", "Install"),
            ],
        );

        self.mode_bindings.insert(
            AppMode::ConfirmInstall,
            vec![
                Keybinding::new(KeyCode::Left, KeyAction::ToggleButton, "Left", "Switch button"),
                Keybinding::new(KeyCode::Right, KeyAction::ToggleButton, "Right", "Switch button"),
                Keybinding::new(KeyCode::Tab, KeyAction::ToggleButton, "Tab", "Switch button"),
                Keybinding::new(KeyCode::Enter, KeyAction::Confirm, "Enter", "Choose"),
                Keybinding::new(KeyCode::Char('y'), KeyAction::Install, "Y", "Install"),
                Keybinding::new(KeyCode::Char('j'), KeyAction::Install, "J", "Install"),
                Keybinding::new(KeyCode::Char('n'), KeyAction::Cancel, "N", "Cancel"),
                Keybinding::new(KeyCode::Esc, KeyAction::Cancel, "Esc", "Cancel"),
            ],
        );

        self.mode_bindings.insert(
            AppMode::Installing,
            vec![
                Keybinding::new(KeyCode::PageUp, KeyAction::ScrollUp, "PgUp", "Scroll log up"),
                Keybinding::new(KeyCode::PageDown, KeyAction::ScrollDown, "PgDn", "Scroll log down"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        self.mode_bindings.insert(
            AppMode::Summary,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Dismiss, "Enter", "Close"),
                Keybinding::new(KeyCode::Esc, KeyAction::Dismiss, "Esc", "Close"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        // Text entry consumes every key itself
        self.mode_bindings.insert(
            AppMode::EditPath,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Confirm, "Enter", "Apply"),
                Keybinding::new(KeyCode::Esc, KeyAction::Cancel, "Esc", "Cancel"),
            ],
        );
    }

    /// Get keybindings for a specific mode (includes global bindings)
    pub fn get_bindings(&self, mode: &AppMode) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(mode_bindings) = self.mode_bindings.get(mode) {
            bindings.extend(mode_bindings.iter());
        }

        if *mode != AppMode::EditPath {
            bindings.extend(self.global_bindings.iter());
        }

        bindings
    }

    /// Resolve a key press to an action in `mode`.
    pub fn action_for(
        &self,
        mode: &AppMode,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<KeyAction> {
        self.get_bindings(mode)
            .into_iter()
            .find(|b| b.matches(key, modifiers))
            .map(|b| b.action)
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, mode: &AppMode) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(mode);

        let priority_actions: &[KeyAction] = match mode {
            AppMode::Browse => &[
                KeyAction::NavigateUp,
                KeyAction::ToggleArchive,
                KeyAction::SelectAll,
                KeyAction::SelectNone,
                KeyAction::Preview,
                KeyAction::Install,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            AppMode::EditPath => &[KeyAction::Confirm, KeyAction::Cancel],
            AppMode::Preview => &[
                KeyAction::ScrollUp,
                KeyAction::PageUp,
                KeyAction::Install,
                KeyAction::Dismiss,
            ],
            AppMode::ConfirmInstall => &[
                KeyAction::ToggleButton,
                KeyAction::Confirm,
                KeyAction::Cancel,
            ],
            AppMode::Installing => &[KeyAction::ScrollUp],
            AppMode::Summary => &[KeyAction::Dismiss, KeyAction::Quit],
        };

        let mut items = Vec::new();
        for &action in priority_actions {
            let Some(binding) = bindings.iter().find(|b| b.action == action) else {
                continue;
            };
            let item = match action {
                KeyAction::NavigateUp => NavBarItem::new("Up/Dn", "Navigate"),
                KeyAction::ScrollUp if *mode == AppMode::Installing => {
                    NavBarItem::new("PgUp/PgDn", "Scroll log")
                }
                KeyAction::ScrollUp => NavBarItem::new("Up/Dn", "Scroll"),
                KeyAction::PageUp => NavBarItem::new("PgUp/PgDn", "Page"),
                KeyAction::ToggleButton => NavBarItem::new("Tab", "Switch"),
                _ => NavBarItem::new(&binding.display, &binding.description),
            };
            items.push(item);
        }

        items
    }

    /// Get full help content for a mode (for help overlay)
    pub fn get_help_content(&self, mode: &AppMode) -> Vec<HelpSection> {
        let groups: [(&str, fn(KeyAction) -> bool); 3] = [
            ("Navigation", |a| {
                matches!(
                    a,
                    KeyAction::NavigateUp
                        | KeyAction::NavigateDown
                        | KeyAction::PageUp
                        | KeyAction::PageDown
                        | KeyAction::Home
                        | KeyAction::End
                        | KeyAction::ScrollUp
                        | KeyAction::ScrollDown
                )
            }),
            ("General", |a| {
                matches!(a, KeyAction::Dismiss | KeyAction::Help | KeyAction::Quit)
            }),
            ("Actions", |_| true),
        ];

        let bindings = self.get_bindings(mode);
        let mut sections: Vec<HelpSection> = Vec::new();
        let mut used = vec![false; bindings.len()];
        for (title, belongs) in groups {
            let mut items = Vec::new();
            for (i, binding) in bindings.iter().enumerate() {
                if !used[i] && belongs(binding.action) {
                    used[i] = true;
                    items.push((binding.display.clone(), binding.description.clone()));
                }
            }
            if !items.is_empty() {
                sections.push(HelpSection {
                    title: title.to_string(),
                    items,
                });
            }
        }

        // Actions before General in display order
        sections.sort_by_key(|s| match s.title.as_str() {
            "Navigation" => 0,
            "Actions" => 1,
            _ => 2,
        });
        sections
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

impl NavBarItem {
    fn new(key_display: &str, action_label: &str) -> Self {
        Self {
            key_display: key_display.to_string(),
            action_label: action_label.to_string(),
        }
    }
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

//! Keybinding configuration for the TUI.

use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::KeyAction;

/// Configuration for all keybindings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub open_link: Vec<String>,
    pub dismiss: Vec<String>,
    pub dismiss_all: Vec<String>,
    pub refresh: Vec<String>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: vec!["q".to_string(), "Ctrl+c".to_string()],
            move_up: vec!["k".to_string(), "Up".to_string()],
            move_down: vec!["j".to_string(), "Down".to_string()],
            next_page: vec!["n".to_string(), "PageDown".to_string()],
            prev_page: vec!["p".to_string(), "PageUp".to_string()],
            open_link: vec!["o".to_string(), "Enter".to_string()],
            dismiss: vec!["d".to_string(), "Delete".to_string()],
            dismiss_all: vec!["D".to_string()],
            refresh: vec!["R".to_string()],
        }
    }
}

impl KeybindingConfig {
    /// Every action with the strings bound to it, in lookup order.
    fn table(&self) -> [(KeyAction, &[String]); 9] {
        [
            (KeyAction::Quit, self.quit.as_slice()),
            (KeyAction::MoveUp, self.move_up.as_slice()),
            (KeyAction::MoveDown, self.move_down.as_slice()),
            (KeyAction::NextPage, self.next_page.as_slice()),
            (KeyAction::PrevPage, self.prev_page.as_slice()),
            (KeyAction::OpenLink, self.open_link.as_slice()),
            (KeyAction::Dismiss, self.dismiss.as_slice()),
            (KeyAction::DismissAll, self.dismiss_all.as_slice()),
            (KeyAction::Refresh, self.refresh.as_slice()),
        ]
    }

    /// Get the action for a key event.
    pub fn get_action(&self, key: &KeyEvent) -> KeyAction {
        self.table()
            .into_iter()
            .find(|(_, bindings)| {
                bindings
                    .iter()
                    .filter_map(|binding| binding.parse::<KeyBinding>().ok())
                    .any(|binding| binding.matches(key))
            })
            .map_or(KeyAction::None, |(action, _)| action)
    }

    /// Reject bindings that could never match a key press.
    pub fn validate(&self) -> Result<(), String> {
        for (action, bindings) in self.table() {
            for binding in bindings {
                binding
                    .parse::<KeyBinding>()
                    .map_err(|e| format!("keybindings for {:?}: {}", action, e))?;
            }
        }
        Ok(())
    }

    /// Short help text for the status bar, built from the first binding of each action.
    pub fn help_line(&self) -> String {
        let first = |bindings: &[String]| bindings.first().cloned().unwrap_or_default();
        format!(
            "{}/{}:Navigate  {}:Open  {}:Dismiss  {}:Dismiss all  {}:Refresh  {}:Quit",
            first(&self.move_down),
            first(&self.move_up),
            first(&self.open_link),
            first(&self.dismiss),
            first(&self.dismiss_all),
            first(&self.refresh),
            first(&self.quit),
        )
    }
}

/// A key with its modifiers, as written in the config file
/// (`"j"`, `"PageDown"`, `"Ctrl+c"`, `"Shift+F5"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Terminals report Shift on uppercase letters, so a binding written
    /// without Shift still matches them.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == key.modifiers.difference(KeyModifiers::SHIFT))
    }
}

const NAMED_KEYS: &[(&[&str], KeyCode)] = &[
    (&["enter", "return"], KeyCode::Enter),
    (&["tab"], KeyCode::Tab),
    (&["backtab"], KeyCode::BackTab),
    (&["backspace", "bs"], KeyCode::Backspace),
    (&["delete", "del"], KeyCode::Delete),
    (&["home"], KeyCode::Home),
    (&["end"], KeyCode::End),
    (&["pageup", "pgup"], KeyCode::PageUp),
    (&["pagedown", "pgdn"], KeyCode::PageDown),
    (&["up"], KeyCode::Up),
    (&["down"], KeyCode::Down),
    (&["left"], KeyCode::Left),
    (&["right"], KeyCode::Right),
    (&["esc", "escape"], KeyCode::Esc),
    (&["space"], KeyCode::Char(' ')),
];

impl FromStr for KeyBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "+" alone, or as the last part of "Ctrl++", is the plus key.
        let (prefix, key) = match s.strip_suffix("++") {
            Some(prefix) => (Some(prefix), "+"),
            None if s == "+" => (None, "+"),
            None => match s.rsplit_once('+') {
                Some((prefix, key)) => (Some(prefix), key),
                None => (None, s),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.into_iter().flat_map(|p| p.split('+')) {
            modifiers |= match part.trim().to_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "shift" => KeyModifiers::SHIFT,
                "alt" => KeyModifiers::ALT,
                _ => return Err(format!("Unknown modifier: {}", part)),
            };
        }

        Ok(KeyBinding {
            code: key_code(key.trim())?,
            modifiers,
        })
    }
}

fn key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    let named = NAMED_KEYS
        .iter()
        .find(|(names, _)| names.contains(&lower.as_str()));
    if let Some((_, code)) = named {
        return Ok(*code);
    }
    match lower.strip_prefix('f').map(str::parse::<u8>) {
        Some(Ok(n @ 1..=12)) => Ok(KeyCode::F(n)),
        _ => Err(format!("Unknown key: {}", s)),
    }
}

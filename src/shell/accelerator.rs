//! Hotkey accelerator strings such as `F10` or `Ctrl+Shift+O`.

use crate::config::DEFAULT_HOTKEY;
use crate::error::HotkeyError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

/// The non-modifier part of an accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// F1 through F24.
    Function(u8),
    /// An uppercase ASCII letter or a digit.
    Char(char),
    Space,
    Tab,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accelerator {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl Accelerator {
    /// Parses `text`, falling back to the default hotkey when it is invalid.
    pub fn parse_or_default(text: &str) -> Self {
        match text.parse() {
            Ok(accelerator) => accelerator,
            Err(e) => {
                tracing::warn!(
                    %e,
                    hotkey = text,
                    fallback = DEFAULT_HOTKEY,
                    "Invalid hotkey, using default"
                );
                DEFAULT_HOTKEY
                    .parse()
                    .unwrap_or(Accelerator {
                        modifiers: Modifiers::default(),
                        key: Key::Function(10),
                    })
            }
        }
    }
}

fn parse_key(token: &str) -> Option<Key> {
    let upper = token.to_ascii_uppercase();

    if let Some(number) = upper.strip_prefix('F') {
        if let Ok(n @ 1..=24) = number.parse::<u8>() {
            return Some(Key::Function(n));
        }
    }

    let mut chars = upper.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Some(Key::Char(c));
        }
    }

    match upper.as_str() {
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "INSERT" => Some(Key::Insert),
        "DELETE" => Some(Key::Delete),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        _ => None,
    }
}

impl FromStr for Accelerator {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(HotkeyError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key = None;

        for token in text.split('+').map(str::trim) {
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmdorctrl" | "commandorcontrol" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "super" | "win" | "meta" | "cmd" | "command" => modifiers.super_key = true,
                _ => {
                    let parsed = parse_key(token)
                        .ok_or_else(|| HotkeyError::UnknownKey(token.to_string()))?;
                    key = Some(parsed);
                }
            }
        }

        let key = key.ok_or_else(|| HotkeyError::MissingKey(text.to_string()))?;
        Ok(Accelerator { modifiers, key })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Function(n) => write!(f, "F{n}"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Space => write!(f, "Space"),
            Key::Tab => write!(f, "Tab"),
            Key::Insert => write!(f, "Insert"),
            Key::Delete => write!(f, "Delete"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        let names = [
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.super_key, "Super"),
        ];
        for (held, name) in names {
            if held {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

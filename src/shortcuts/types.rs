//! Key combination types with proper error handling and platform-aware display.
//!
//! This module provides:
//! - `KeyCombo` - A parsed key combination (modifiers + key)
//! - `Modifiers` - Modifier flags, including the `Mod` platform alias
//! - `ShortcutParseError` - Detailed parse errors for user feedback
//! - Platform-aware display (⌘⇧Z on macOS, Ctrl+Shift+Z on Windows/Linux)

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;
use thiserror::Error;

use super::event::KeyEvent;

/// Errors that can occur when parsing a shortcut string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutParseError {
    #[error("shortcut string is empty")]
    Empty,
    #[error("shortcut has no key, only modifiers")]
    MissingKey,
    #[error("shortcut names two keys, '{0}' and '{1}'")]
    MultipleKeys(String, String),
}

/// Modifier keys for a combination.
///
/// `primary` is the `Mod` token: satisfied by either Ctrl or Meta, so one
/// binding covers Cmd on macOS and Ctrl elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
    pub primary: bool,
}

impl Modifiers {
    pub fn primary() -> Self {
        Self {
            primary: true,
            ..Default::default()
        }
    }
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }
    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Default::default()
        }
    }
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.alt || self.shift || self.primary
    }
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// Platform enum for display formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Platform::MacOS
        }
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Platform::Linux
        }
    }
}

/// A key combination: modifier flags plus one canonical key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: impl AsRef<str>, modifiers: Modifiers) -> Self {
        Self {
            key: canonicalize_key(key.as_ref()),
            modifiers,
        }
    }

    /// Parses strings like `"Mod+Shift+Z"`. Tokens are `+`-separated,
    /// case-insensitive and trimmed; exactly one token must be a key.
    pub fn parse(s: &str) -> Result<Self, ShortcutParseError> {
        let tokens: Vec<&str> = s
            .split('+')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key_part: Option<&str> = None;

        for token in tokens {
            match token.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "cmd" | "command" | "meta" => modifiers.meta = true,
                "mod" => modifiers.primary = true,
                "alt" | "option" | "opt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => {
                    if let Some(first) = key_part {
                        return Err(ShortcutParseError::MultipleKeys(
                            first.to_string(),
                            token.to_string(),
                        ));
                    }
                    key_part = Some(token);
                }
            }
        }

        let key = key_part.ok_or(ShortcutParseError::MissingKey)?;
        Ok(Self::new(key, modifiers))
    }

    /// Builds a concrete combination from a keydown, for shortcut recording.
    ///
    /// Returns `None` while only a modifier key is down.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let key = canonicalize_key(&event.key);
        if key.is_empty() || is_modifier_key(&key) {
            return None;
        }
        Some(Self {
            key,
            modifiers: event.modifiers(),
        })
    }

    /// Modifier-aware match against a keydown.
    ///
    /// An event modifier the combination doesn't allow rejects the match, so
    /// `Ctrl+Z` never fires on Ctrl+Shift+Z. `primary` allows and requires
    /// Ctrl or Meta; holding both still matches.
    pub fn matches_event(&self, event: &KeyEvent) -> bool {
        let m = &self.modifiers;

        if event.shift && !m.shift {
            return false;
        }
        if event.alt && !m.alt {
            return false;
        }
        if event.ctrl && !(m.ctrl || m.primary) {
            return false;
        }
        if event.meta && !(m.meta || m.primary) {
            return false;
        }

        if (m.ctrl && !event.ctrl)
            || (m.meta && !event.meta)
            || (m.shift && !event.shift)
            || (m.alt && !event.alt)
            || (m.primary && !(event.ctrl || event.meta))
        {
            return false;
        }

        canonicalize_key(&event.key) == self.key
    }

    /// Every concrete (primary-free) combination this one matches.
    pub fn variants(&self) -> SmallVec<[KeyCombo; 3]> {
        let mut out: SmallVec<[KeyCombo; 3]> = SmallVec::new();
        if !self.modifiers.primary {
            out.push(self.clone());
            return out;
        }

        let base = Modifiers {
            primary: false,
            ..self.modifiers
        };
        for (ctrl, meta) in [(true, false), (false, true), (true, true)] {
            let variant = KeyCombo {
                key: self.key.clone(),
                modifiers: Modifiers {
                    ctrl: base.ctrl || ctrl,
                    meta: base.meta || meta,
                    ..base
                },
            };
            if !out.contains(&variant) {
                out.push(variant);
            }
        }
        out
    }

    /// True when some keydown would satisfy both combinations.
    pub fn overlaps(&self, other: &KeyCombo) -> bool {
        if self.key != other.key {
            return false;
        }
        let theirs = other.variants();
        self.variants().iter().any(|v| theirs.contains(v))
    }

    pub fn display(&self) -> String {
        self.display_for_platform(Platform::current())
    }

    pub fn display_for_platform(&self, platform: Platform) -> String {
        match platform {
            Platform::MacOS => self.display_macos(),
            Platform::Windows | Platform::Linux => self.display_other(),
        }
    }

    fn display_macos(&self) -> String {
        let mut s = String::new();
        if self.modifiers.ctrl {
            s.push('⌃');
        }
        if self.modifiers.alt {
            s.push('⌥');
        }
        if self.modifiers.shift {
            s.push('⇧');
        }
        if self.modifiers.meta || self.modifiers.primary {
            s.push('⌘');
        }
        s.push_str(&self.key_display());
        s
    }

    fn display_other(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.ctrl || self.modifiers.primary {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }
        if self.modifiers.meta {
            parts.push("Super".to_string());
        }
        parts.push(self.key_display_text());
        parts.join("+")
    }

    fn key_display(&self) -> String {
        match self.key.as_str() {
            "enter" => "↵",
            "escape" => "⎋",
            "tab" => "⇥",
            "space" => "␣",
            "backspace" => "⌫",
            "delete" => "⌦",
            "up" => "↑",
            "down" => "↓",
            "left" => "←",
            "right" => "→",
            k => return k.to_uppercase(),
        }
        .to_string()
    }

    fn key_display_text(&self) -> String {
        match self.key.as_str() {
            "enter" => "Enter",
            "escape" => "Esc",
            "tab" => "Tab",
            "space" => "Space",
            "backspace" => "Backspace",
            "delete" => "Delete",
            "up" => "Up",
            "down" => "Down",
            "left" => "Left",
            "right" => "Right",
            "pageup" => "PageUp",
            "pagedown" => "PageDown",
            k => return k.to_uppercase(),
        }
        .to_string()
    }

    /// Lowercase form used for persistence, e.g. `"mod+shift+z"`.
    pub fn to_canonical_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.alt {
            parts.push("alt");
        }
        if self.modifiers.ctrl {
            parts.push("ctrl");
        }
        if self.modifiers.meta {
            parts.push("meta");
        }
        if self.modifiers.primary {
            parts.push("mod");
        }
        if self.modifiers.shift {
            parts.push("shift");
        }
        parts.push(&self.key);
        parts.join("+")
    }
}

impl FromStr for KeyCombo {
    type Err = ShortcutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Canonicalize a key name to the internal standard form.
///
/// Applied to both binding keys and event keys, so `"Esc"` in a binding
/// matches a keydown reporting `"Escape"`.
pub fn canonicalize_key(key: &str) -> String {
    if key == " " {
        return "space".to_string();
    }
    let key_lower = key.trim().to_lowercase();
    match key_lower.as_str() {
        "arrowup" | "uparrow" => "up",
        "arrowdown" | "downarrow" => "down",
        "arrowleft" | "leftarrow" => "left",
        "arrowright" | "rightarrow" => "right",
        "return" => "enter",
        "esc" => "escape",
        "del" => "delete",
        "spacebar" => "space",
        "+" => "plus",
        "pgup" => "pageup",
        "pgdn" | "pgdown" => "pagedown",
        "control" => "ctrl",
        "os" | "super" | "command" | "cmd" => "meta",
        "option" => "alt",
        _ => return key_lower,
    }
    .to_string()
}

fn is_modifier_key(canonical: &str) -> bool {
    matches!(canonical, "ctrl" | "meta" | "alt" | "shift" | "altgraph")
}

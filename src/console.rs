//! Line commands for the interactive harness.
//!
//! One command per line:
//!
//! ```text
//! exec hello world        # undoable append to the document
//! key mod+z               # synthesize a keydown
//! key ctrl+shift+z@input  # same, with a text field focused
//! bind save Mod+Shift+S   # override a binding
//! unbind save             # drop one override
//! reset                   # drop all overrides
//! import {"save":"Alt+S"} # replace overrides from JSON
//! export                  # print overrides as JSON
//! show                    # list bindings, history and document
//! quit
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use thiserror::Error;

use crate::history::Command;
use crate::shortcuts::{
    FocusTarget, KeyCombo, KeyEvent, Platform, ShortcutOverrides, ShortcutParseError,
};

const INPUT_TARGET_SUFFIX: &str = "@input";

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command} expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid chord '{chord}': {source}")]
    InvalidChord {
        chord: String,
        #[source]
        source: ShortcutParseError,
    },
    #[error("invalid overrides JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug)]
pub enum ConsoleCommand {
    Exec(String),
    Key(KeyEvent),
    Bind { id: String, keys: String },
    Unbind(String),
    Reset,
    Import(ShortcutOverrides),
    Export,
    Show,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str, platform: Platform) -> Result<Option<Self>, ConsoleError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "exec" => Self::Exec(required(rest, "exec", "text to append")?.to_string()),
            "key" => Self::Key(synthesize_event(
                required(rest, "key", "a chord such as mod+z")?,
                platform,
            )?),
            "bind" => {
                let (id, keys) = required(rest, "bind", "<id> <keys>")?
                    .split_once(char::is_whitespace)
                    .ok_or(ConsoleError::MissingArgument {
                        command: "bind",
                        expected: "<id> <keys>",
                    })?;
                Self::Bind {
                    id: id.to_string(),
                    keys: keys.trim().to_string(),
                }
            }
            "unbind" => Self::Unbind(required(rest, "unbind", "a binding id")?.to_string()),
            "reset" => Self::Reset,
            "import" => Self::Import(serde_json::from_str(required(
                rest,
                "import",
                "a JSON object",
            )?)?),
            "export" => Self::Export,
            "show" => Self::Show,
            "quit" | "exit" => Self::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, ConsoleError> {
    if rest.is_empty() {
        Err(ConsoleError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

/// Build a keydown from a chord. `mod` resolves to Cmd on macOS and Ctrl
/// elsewhere, the way a real keyboard would report it.
pub fn synthesize_event(chord: &str, platform: Platform) -> Result<KeyEvent, ConsoleError> {
    let (chord, target) = match chord.strip_suffix(INPUT_TARGET_SUFFIX) {
        Some(chord) => (chord, FocusTarget::Input),
        None => (chord, FocusTarget::Other),
    };
    let combo = KeyCombo::parse(chord).map_err(|source| ConsoleError::InvalidChord {
        chord: chord.to_string(),
        source,
    })?;

    let primary_is_meta = platform == Platform::MacOS;
    let modifiers = combo.modifiers;
    let mut event = KeyEvent::new(combo.key).in_target(target);
    event.ctrl = modifiers.ctrl || (modifiers.primary && !primary_is_meta);
    event.meta = modifiers.meta || (modifiers.primary && primary_is_meta);
    event.alt = modifiers.alt;
    event.shift = modifiers.shift;
    Ok(event)
}

/// Undoable append of `text` to `document`.
pub fn append_command(document: &Rc<RefCell<Vec<String>>>, text: String) -> Command {
    let label = format!("append '{}'", text);
    let forward = Rc::clone(document);
    let backward = Rc::clone(document);
    Command::new(
        move || {
            forward.borrow_mut().push(text.clone());
            Ok(())
        },
        move || {
            backward
                .borrow_mut()
                .pop()
                .map(drop)
                .context("document is already empty")
        },
    )
    .labeled(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryStack;

    fn parse(line: &str) -> ConsoleCommand {
        ConsoleCommand::parse(line, Platform::Linux)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn blank_line_is_ignored() {
        assert!(ConsoleCommand::parse("   ", Platform::Linux)
            .unwrap()
            .is_none());
    }

    #[test]
    fn exec_keeps_inner_whitespace() {
        let ConsoleCommand::Exec(text) = parse("exec  hello   world ") else {
            panic!("expected exec");
        };
        assert_eq!(text, "hello   world");
    }

    #[test]
    fn bind_splits_id_and_keys() {
        let ConsoleCommand::Bind { id, keys } = parse("bind save Mod+Shift+S") else {
            panic!("expected bind");
        };
        assert_eq!(id, "save");
        assert_eq!(keys, "Mod+Shift+S");
    }

    #[test]
    fn bind_without_keys_is_rejected() {
        let err = ConsoleCommand::parse("bind save", Platform::Linux).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::MissingArgument { command: "bind", .. }
        ));
    }

    #[test]
    fn import_parses_overrides_json() {
        let ConsoleCommand::Import(overrides) = parse(r#"import {"save": "Alt+S"}"#) else {
            panic!("expected import");
        };
        assert_eq!(overrides.get("save"), Some("Alt+S"));
    }

    #[test]
    fn import_with_bad_json_is_rejected() {
        let err = ConsoleCommand::parse("import {nope", Platform::Linux).unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidJson(_)));
    }

    #[test]
    fn unknown_verb_is_rejected() {
        let err = ConsoleCommand::parse("fly away", Platform::Linux).unwrap_err();
        assert_eq!(err.to_string(), "unknown command: fly");
    }

    #[test]
    fn mod_chord_resolves_per_platform() {
        let linux = synthesize_event("mod+shift+z", Platform::Linux).unwrap();
        assert!(linux.ctrl && linux.shift && !linux.meta);

        let mac = synthesize_event("mod+z", Platform::MacOS).unwrap();
        assert!(mac.meta && !mac.ctrl);
        assert_eq!(mac.target, FocusTarget::Other);
    }

    #[test]
    fn input_suffix_targets_text_field() {
        let event = synthesize_event("ctrl+z@input", Platform::Linux).unwrap();
        assert_eq!(event.target, FocusTarget::Input);
        assert!(event.ctrl);
        assert_eq!(event.key, "z");
    }

    #[test]
    fn invalid_chord_reports_parse_error() {
        let err = synthesize_event("ctrl+shift", Platform::Linux).unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidChord { .. }));
    }

    #[test]
    fn append_command_is_undoable() {
        let document = Rc::new(RefCell::new(Vec::new()));
        let mut history = HistoryStack::new(10);

        history
            .execute(append_command(&document, "one".to_string()))
            .unwrap();
        history
            .execute(append_command(&document, "two".to_string()))
            .unwrap();
        assert_eq!(history.undo_label(), Some("append 'two'"));

        history.undo().unwrap();
        assert_eq!(*document.borrow(), vec!["one".to_string()]);
        history.redo().unwrap();
        assert_eq!(document.borrow().len(), 2);
    }
}

use super::event::{FocusTarget, KeyEvent};
use super::types::*;

fn combo(s: &str) -> KeyCombo {
    KeyCombo::parse(s).unwrap()
}

// ========================================
// Parsing
// ========================================

#[test]
fn parse_is_case_insensitive_and_trims() {
    let parsed = combo(" Mod + Shift + Z ");
    assert_eq!(parsed.key, "z");
    assert!(parsed.modifiers.primary);
    assert!(parsed.modifiers.shift);
    assert!(!parsed.modifiers.ctrl);
    assert!(!parsed.modifiers.meta);
}

#[test]
fn parse_modifier_aliases() {
    assert!(combo("control+a").modifiers.ctrl);
    assert!(combo("ctrl+a").modifiers.ctrl);
    assert!(combo("cmd+a").modifiers.meta);
    assert!(combo("meta+a").modifiers.meta);
    assert!(combo("command+a").modifiers.meta);
    assert!(combo("alt+a").modifiers.alt);
    assert!(combo("option+a").modifiers.alt);
    assert!(combo("mod+a").modifiers.primary);
}

#[test]
fn parse_modifier_order_does_not_matter() {
    assert_eq!(combo("Shift+Mod+Z"), combo("Mod+Shift+Z"));
}

#[test]
fn parse_errors() {
    assert_eq!(KeyCombo::parse(""), Err(ShortcutParseError::Empty));
    assert_eq!(KeyCombo::parse(" + "), Err(ShortcutParseError::Empty));
    assert_eq!(
        KeyCombo::parse("Ctrl+Shift"),
        Err(ShortcutParseError::MissingKey)
    );
    assert_eq!(
        KeyCombo::parse("Ctrl+A+B"),
        Err(ShortcutParseError::MultipleKeys("A".to_string(), "B".to_string()))
    );
}

#[test]
fn parse_canonicalizes_key_aliases() {
    assert_eq!(combo("Mod+Esc").key, "escape");
    assert_eq!(combo("Alt+ArrowUp").key, "up");
    assert_eq!(combo("Ctrl+Return").key, "enter");
    assert_eq!(combo("Ctrl+Plus").key, "plus");
}

#[test]
fn from_str_matches_parse() {
    let parsed: KeyCombo = "Mod+K".parse().unwrap();
    assert_eq!(parsed, combo("mod+k"));
}

// ========================================
// Matching
// ========================================

#[test]
fn extra_shift_rejects_match() {
    let ctrl_k = combo("Ctrl+K");
    assert!(ctrl_k.matches_event(&KeyEvent::new("k").with_ctrl()));
    assert!(!ctrl_k.matches_event(&KeyEvent::new("k").with_ctrl().with_shift()));
}

#[test]
fn extra_alt_rejects_match() {
    let ctrl_k = combo("Ctrl+K");
    assert!(!ctrl_k.matches_event(&KeyEvent::new("k").with_ctrl().with_alt()));
}

#[test]
fn extra_meta_rejects_ctrl_binding() {
    let ctrl_k = combo("Ctrl+K");
    assert!(!ctrl_k.matches_event(&KeyEvent::new("k").with_ctrl().with_meta()));
}

#[test]
fn mod_matches_ctrl_or_meta() {
    let save = combo("Mod+S");
    assert!(save.matches_event(&KeyEvent::new("s").with_meta()));
    assert!(save.matches_event(&KeyEvent::new("s").with_ctrl()));
    assert!(save.matches_event(&KeyEvent::new("s").with_ctrl().with_meta()));
    assert!(!save.matches_event(&KeyEvent::new("s")));
    assert!(!save.matches_event(&KeyEvent::new("s").with_alt()));
}

#[test]
fn missing_required_modifier_rejects_match() {
    let redo = combo("Mod+Shift+Z");
    assert!(!redo.matches_event(&KeyEvent::new("z").with_meta()));
    assert!(redo.matches_event(&KeyEvent::new("Z").with_meta().with_shift()));
}

#[test]
fn key_comparison_is_case_insensitive_and_canonical() {
    assert!(combo("Ctrl+K").matches_event(&KeyEvent::new("K").with_ctrl()));
    assert!(combo("Mod+Esc").matches_event(&KeyEvent::new("Escape").with_meta()));
    assert!(combo("Alt+Up").matches_event(&KeyEvent::new("ArrowUp").with_alt()));
    assert!(combo("Ctrl+Space").matches_event(&KeyEvent::new(" ").with_ctrl()));
}

#[test]
fn wrong_key_rejects_match() {
    assert!(!combo("Ctrl+K").matches_event(&KeyEvent::new("j").with_ctrl()));
}

#[test]
fn unmodified_key_binding() {
    let escape = combo("Escape");
    assert!(escape.matches_event(&KeyEvent::new("Escape")));
    assert!(!escape.matches_event(&KeyEvent::new("Escape").with_ctrl()));
}

// ========================================
// Overlap
// ========================================

#[test]
fn variants_expand_primary() {
    let variants = combo("Mod+Z").variants();
    assert_eq!(variants.len(), 3);
    assert!(variants.contains(&combo("Ctrl+Z")));
    assert!(variants.contains(&combo("Cmd+Z")));
    assert!(variants.contains(&combo("Ctrl+Cmd+Z")));

    let concrete = combo("Ctrl+Z").variants();
    assert_eq!(concrete.len(), 1);
}

#[test]
fn variants_dedupe_when_ctrl_is_explicit() {
    let variants = combo("Mod+Ctrl+Z").variants();
    assert_eq!(variants.len(), 2);
}

#[test]
fn overlaps_detects_mod_against_concrete() {
    assert!(combo("Mod+S").overlaps(&combo("Ctrl+S")));
    assert!(combo("Cmd+S").overlaps(&combo("Mod+S")));
    assert!(combo("Mod+S").overlaps(&combo("mod+s")));
    assert!(!combo("Ctrl+S").overlaps(&combo("Cmd+S")));
    assert!(!combo("Mod+S").overlaps(&combo("Mod+Shift+S")));
    assert!(!combo("Mod+S").overlaps(&combo("Mod+D")));
}

// ========================================
// Recording
// ========================================

#[test]
fn from_event_records_concrete_combo() {
    let event = KeyEvent::new("K").with_meta().with_shift();
    let recorded = KeyCombo::from_event(&event).unwrap();
    assert_eq!(recorded, combo("Cmd+Shift+K"));
}

#[test]
fn from_event_ignores_modifier_only_keys() {
    assert_eq!(KeyCombo::from_event(&KeyEvent::new("Shift").with_shift()), None);
    assert_eq!(KeyCombo::from_event(&KeyEvent::new("Control").with_ctrl()), None);
    assert_eq!(KeyCombo::from_event(&KeyEvent::new("Meta").with_meta()), None);
    assert_eq!(KeyCombo::from_event(&KeyEvent::new("Alt").with_alt()), None);
}

#[test]
fn focus_target_text_input_detection() {
    assert!(FocusTarget::Input.is_text_input());
    assert!(FocusTarget::TextArea.is_text_input());
    assert!(FocusTarget::ContentEditable.is_text_input());
    assert!(!FocusTarget::Other.is_text_input());
}

// ========================================
// Display
// ========================================

#[test]
fn display_macos_uses_symbols() {
    assert_eq!(combo("Mod+Shift+Z").display_for_platform(Platform::MacOS), "⇧⌘Z");
    assert_eq!(combo("Ctrl+Alt+Enter").display_for_platform(Platform::MacOS), "⌃⌥↵");
}

#[test]
fn display_other_uses_words() {
    assert_eq!(
        combo("Mod+Shift+Z").display_for_platform(Platform::Windows),
        "Ctrl+Shift+Z"
    );
    assert_eq!(combo("Meta+Esc").display_for_platform(Platform::Linux), "Super+Esc");
}

#[test]
fn canonical_string_is_stable_and_reparses() {
    let original = combo("Shift+Alt+Mod+K");
    let canonical = original.to_canonical_string();
    assert_eq!(canonical, "alt+mod+shift+k");
    assert_eq!(combo(&canonical), original);
}

#[test]
fn canonicalize_key_aliases() {
    assert_eq!(canonicalize_key("ArrowDown"), "down");
    assert_eq!(canonicalize_key("esc"), "escape");
    assert_eq!(canonicalize_key(" "), "space");
    assert_eq!(canonicalize_key("PgDn"), "pagedown");
    assert_eq!(canonicalize_key("Q"), "q");
}

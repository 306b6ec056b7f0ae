use std::{fmt, sync::LazyLock};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;
use serde::Deserialize;

use super::input::KeyAction;

const KEYMAP_SOURCE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/keymap/dialog.keymap.json"
));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Command {
    Confirm,
    Activate,
    Cancel,
    Dismiss,
    Next,
    Previous,
}

impl From<Command> for KeyAction {
    fn from(command: Command) -> Self {
        match command {
            Command::Confirm => KeyAction::Confirm,
            Command::Activate => KeyAction::Activate,
            Command::Cancel => KeyAction::Cancel,
            Command::Dismiss => KeyAction::Dismiss,
            Command::Next => KeyAction::FocusStep(1),
            Command::Previous => KeyAction::FocusStep(-1),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BindingSpec {
    label: String,
    keys: Vec<String>,
}

/// A key plus the modifiers that must be held, normalized so that `Shift+Tab` and a
/// shifted letter compare equal to what crossterm reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Chord {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl Chord {
    fn normalize(code: KeyCode, modifiers: KeyModifiers) -> Self {
        match code {
            KeyCode::Char(ch) => Chord {
                code: KeyCode::Char(ch.to_ascii_lowercase()),
                modifiers: modifiers - KeyModifiers::SHIFT,
            },
            KeyCode::BackTab => Chord {
                code,
                modifiers: modifiers - KeyModifiers::SHIFT,
            },
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => Chord {
                code: KeyCode::BackTab,
                modifiers: modifiers - KeyModifiers::SHIFT,
            },
            _ => Chord { code, modifiers },
        }
    }

    fn parse(spec: &str) -> Result<Self, ChordError> {
        let mut parts: Vec<&str> = spec.split('+').map(str::trim).collect();
        let key = parts
            .pop()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ChordError::new(spec, "missing key"))?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(ChordError::new(spec, "unknown modifier")),
            };
        }

        let code = match key.to_ascii_lowercase().as_str() {
            "enter" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            single if single.chars().count() == 1 => {
                KeyCode::Char(single.chars().next().unwrap_or_default())
            }
            _ => return Err(ChordError::new(spec, "unknown key")),
        };
        Ok(Chord::normalize(code, modifiers))
    }
}

#[derive(Debug)]
struct ChordError {
    spec: String,
    problem: &'static str,
}

impl ChordError {
    fn new(spec: &str, problem: &'static str) -> Self {
        Self {
            spec: spec.to_string(),
            problem,
        }
    }
}

impl fmt::Display for ChordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.spec, self.problem)
    }
}

struct Keymap {
    chords: Vec<(Chord, KeyAction)>,
    help: String,
}

impl Keymap {
    fn from_json(source: &str) -> Result<Self, String> {
        let specs: IndexMap<Command, BindingSpec> =
            serde_json::from_str(source).map_err(|err| err.to_string())?;
        let mut chords = Vec::new();
        let mut help = Vec::with_capacity(specs.len());
        for (command, spec) in &specs {
            if spec.keys.is_empty() {
                return Err(format!("{command:?} has no keys"));
            }
            for key in &spec.keys {
                let chord = Chord::parse(key).map_err(|err| err.to_string())?;
                chords.push((chord, KeyAction::from(*command)));
            }
            help.push(format!("{} {}", spec.keys.join("/"), spec.label));
        }
        Ok(Self {
            chords,
            help: help.join(" • "),
        })
    }

    fn lookup(&self, key: &KeyEvent) -> Option<KeyAction> {
        let chord = Chord::normalize(key.code, key.modifiers);
        self.chords
            .iter()
            .find(|(bound, _)| *bound == chord)
            .map(|(_, action)| *action)
    }
}

// Compiled-in asset, checked by `bundled_keymap_loads`.
static KEYMAP: LazyLock<Keymap> = LazyLock::new(|| {
    Keymap::from_json(KEYMAP_SOURCE)
        .unwrap_or_else(|err| panic!("invalid keymap/dialog.keymap.json: {err}"))
});

pub(super) fn classify_key(key: &KeyEvent) -> Option<KeyAction> {
    KEYMAP.lookup(key)
}

pub(super) fn help_text() -> String {
    KEYMAP.help.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn bundled_keymap_loads() {
        assert!(Keymap::from_json(KEYMAP_SOURCE).is_ok());
    }

    #[test]
    fn ctrl_s_confirms() {
        let action = classify_key(&key(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(action, Some(KeyAction::Confirm));
        let shouted = classify_key(&key(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));
        assert_eq!(shouted, Some(KeyAction::Confirm));
    }

    #[test]
    fn plain_letters_are_not_bound() {
        assert_eq!(classify_key(&key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
        assert_eq!(classify_key(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)), None);
    }

    #[test]
    fn shift_tab_steps_backwards() {
        assert_eq!(
            classify_key(&key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(KeyAction::FocusStep(-1))
        );
        assert_eq!(
            classify_key(&key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(KeyAction::FocusStep(1))
        );
    }

    #[test]
    fn escape_cancels_and_ctrl_q_dismisses() {
        assert_eq!(
            classify_key(&key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(KeyAction::Cancel)
        );
        assert_eq!(
            classify_key(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(KeyAction::Dismiss)
        );
    }

    #[test]
    fn rejects_unknown_modifiers_and_empty_bindings() {
        assert!(Keymap::from_json(r#"{"confirm": {"label": "x", "keys": ["Hyper+S"]}}"#).is_err());
        assert!(Keymap::from_json(r#"{"cancel": {"label": "x", "keys": []}}"#).is_err());
    }

    #[test]
    fn help_lists_every_binding_in_file_order() {
        let help = help_text();
        assert!(help.starts_with("Ctrl+S Submit"));
        assert!(help.contains("Esc Cancel"));
        assert!(help.contains("Shift+Tab/Up Previous"));
    }
}

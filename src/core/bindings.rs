//! Key binding table.
//!
//! Maps a keyboard key or gamepad button to a command line that runs when
//! the input is pressed. Bindings are stored as `<key-name> <command>` lines.

use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bevy::input::gamepad::GamepadButton;
use bevy::prelude::*;

use crate::persist::{self, PersistError};

/// Prefix distinguishing gamepad buttons from keys in key names.
pub const GAMEPAD_PREFIX: &str = "Gamepad";

/// A physical input that can be bound to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindInput {
    /// A keyboard key.
    Key(KeyCode),
    /// A gamepad button, on any connected gamepad.
    Gamepad(GamepadButton),
}

/// Canonical key names. The first entry for a key code is used for display.
const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("A", KeyCode::KeyA),
    ("B", KeyCode::KeyB),
    ("C", KeyCode::KeyC),
    ("D", KeyCode::KeyD),
    ("E", KeyCode::KeyE),
    ("F", KeyCode::KeyF),
    ("G", KeyCode::KeyG),
    ("H", KeyCode::KeyH),
    ("I", KeyCode::KeyI),
    ("J", KeyCode::KeyJ),
    ("K", KeyCode::KeyK),
    ("L", KeyCode::KeyL),
    ("M", KeyCode::KeyM),
    ("N", KeyCode::KeyN),
    ("O", KeyCode::KeyO),
    ("P", KeyCode::KeyP),
    ("Q", KeyCode::KeyQ),
    ("R", KeyCode::KeyR),
    ("S", KeyCode::KeyS),
    ("T", KeyCode::KeyT),
    ("U", KeyCode::KeyU),
    ("V", KeyCode::KeyV),
    ("W", KeyCode::KeyW),
    ("X", KeyCode::KeyX),
    ("Y", KeyCode::KeyY),
    ("Z", KeyCode::KeyZ),
    ("D0", KeyCode::Digit0),
    ("D1", KeyCode::Digit1),
    ("D2", KeyCode::Digit2),
    ("D3", KeyCode::Digit3),
    ("D4", KeyCode::Digit4),
    ("D5", KeyCode::Digit5),
    ("D6", KeyCode::Digit6),
    ("D7", KeyCode::Digit7),
    ("D8", KeyCode::Digit8),
    ("D9", KeyCode::Digit9),
    ("F1", KeyCode::F1),
    ("F2", KeyCode::F2),
    ("F3", KeyCode::F3),
    ("F4", KeyCode::F4),
    ("F5", KeyCode::F5),
    ("F6", KeyCode::F6),
    ("F7", KeyCode::F7),
    ("F8", KeyCode::F8),
    ("F9", KeyCode::F9),
    ("F10", KeyCode::F10),
    ("F11", KeyCode::F11),
    ("F12", KeyCode::F12),
    ("Space", KeyCode::Space),
    ("Enter", KeyCode::Enter),
    ("Escape", KeyCode::Escape),
    ("Tab", KeyCode::Tab),
    ("Back", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Insert", KeyCode::Insert),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Up", KeyCode::ArrowUp),
    ("Down", KeyCode::ArrowDown),
    ("Left", KeyCode::ArrowLeft),
    ("Right", KeyCode::ArrowRight),
    ("LeftShift", KeyCode::ShiftLeft),
    ("RightShift", KeyCode::ShiftRight),
    ("LeftControl", KeyCode::ControlLeft),
    ("RightControl", KeyCode::ControlRight),
    ("LeftAlt", KeyCode::AltLeft),
    ("RightAlt", KeyCode::AltRight),
    ("CapsLock", KeyCode::CapsLock),
    ("NumLock", KeyCode::NumLock),
    ("Scroll", KeyCode::ScrollLock),
    ("PrintScreen", KeyCode::PrintScreen),
    ("Pause", KeyCode::Pause),
    ("OemMinus", KeyCode::Minus),
    ("OemPlus", KeyCode::Equal),
    ("OemOpenBrackets", KeyCode::BracketLeft),
    ("OemCloseBrackets", KeyCode::BracketRight),
    ("OemPipe", KeyCode::Backslash),
    ("OemSemicolon", KeyCode::Semicolon),
    ("OemQuotes", KeyCode::Quote),
    ("OemComma", KeyCode::Comma),
    ("OemPeriod", KeyCode::Period),
    ("OemQuestion", KeyCode::Slash),
    ("OemTilde", KeyCode::Backquote),
    ("NumPad0", KeyCode::Numpad0),
    ("NumPad1", KeyCode::Numpad1),
    ("NumPad2", KeyCode::Numpad2),
    ("NumPad3", KeyCode::Numpad3),
    ("NumPad4", KeyCode::Numpad4),
    ("NumPad5", KeyCode::Numpad5),
    ("NumPad6", KeyCode::Numpad6),
    ("NumPad7", KeyCode::Numpad7),
    ("NumPad8", KeyCode::Numpad8),
    ("NumPad9", KeyCode::Numpad9),
    ("Add", KeyCode::NumpadAdd),
    ("Subtract", KeyCode::NumpadSubtract),
    ("Multiply", KeyCode::NumpadMultiply),
    ("Divide", KeyCode::NumpadDivide),
    ("Decimal", KeyCode::NumpadDecimal),
];

/// Gamepad button names, without the [`GAMEPAD_PREFIX`].
const BUTTON_NAMES: &[(&str, GamepadButton)] = &[
    ("South", GamepadButton::South),
    ("East", GamepadButton::East),
    ("North", GamepadButton::North),
    ("West", GamepadButton::West),
    ("LeftTrigger", GamepadButton::LeftTrigger),
    ("LeftTrigger2", GamepadButton::LeftTrigger2),
    ("RightTrigger", GamepadButton::RightTrigger),
    ("RightTrigger2", GamepadButton::RightTrigger2),
    ("Select", GamepadButton::Select),
    ("Start", GamepadButton::Start),
    ("Mode", GamepadButton::Mode),
    ("LeftThumb", GamepadButton::LeftThumb),
    ("RightThumb", GamepadButton::RightThumb),
    ("DPadUp", GamepadButton::DPadUp),
    ("DPadDown", GamepadButton::DPadDown),
    ("DPadLeft", GamepadButton::DPadLeft),
    ("DPadRight", GamepadButton::DPadRight),
    ("C", GamepadButton::C),
    ("Z", GamepadButton::Z),
    // Face button letters as printed on Xbox-style pads.
    ("A", GamepadButton::South),
    ("B", GamepadButton::East),
    ("X", GamepadButton::West),
    ("Y", GamepadButton::North),
    ("LeftShoulder", GamepadButton::LeftTrigger),
    ("RightShoulder", GamepadButton::RightTrigger),
    ("Back", GamepadButton::Select),
    ("LeftStick", GamepadButton::LeftThumb),
    ("RightStick", GamepadButton::RightThumb),
];

/// Error returned when a key name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindParseError {
    /// No key or button has this name.
    UnknownKey(String),
}

impl Display for BindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindParseError::UnknownKey(name) => write!(f, "Invalid key: {}", name),
        }
    }
}

impl std::error::Error for BindParseError {}

impl BindInput {
    /// Canonical names of every bindable input, keys first.
    pub fn all_names() -> impl Iterator<Item = String> {
        let keys = KEY_NAMES.iter().map(|(name, _)| name.to_string());
        let buttons = BUTTON_NAMES
            .iter()
            .filter(|(name, button)| button_name(*button) == Some(*name))
            .map(|(name, _)| format!("{}{}", GAMEPAD_PREFIX, name));
        keys.chain(buttons)
    }
}

fn key_name(code: KeyCode) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(_, key)| *key == code)
        .map(|(name, _)| *name)
}

fn button_name(button: GamepadButton) -> Option<&'static str> {
    BUTTON_NAMES
        .iter()
        .find(|(_, b)| *b == button)
        .map(|(name, _)| *name)
}

impl Display for BindInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BindInput::Key(code) => match key_name(code) {
                Some(name) => f.write_str(name),
                None => write!(f, "{:?}", code),
            },
            BindInput::Gamepad(button) => match button_name(button) {
                Some(name) => write!(f, "{}{}", GAMEPAD_PREFIX, name),
                None => write!(f, "{}{:?}", GAMEPAD_PREFIX, button),
            },
        }
    }
}

impl FromStr for BindInput {
    type Err = BindParseError;

    /// Parse a key name, ignoring case.
    ///
    /// Accepts canonical names (`F1`, `G`, `OemTilde`), Bevy key code names
    /// (`KeyG`, `ArrowUp`), bare digits (`0`..`9`) and gamepad buttons with
    /// the `Gamepad` prefix (`GamepadSouth`, `GamepadA`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let unknown = || BindParseError::UnknownKey(name.to_string());

        if let [digit @ b'0'..=b'9'] = name.as_bytes() {
            let index = usize::from(digit - b'0');
            return Ok(BindInput::Key(DIGITS[index]));
        }

        if let Some((_, code)) = KEY_NAMES
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            return Ok(BindInput::Key(*code));
        }

        if let Some((_, code)) = KEY_NAMES
            .iter()
            .find(|(_, code)| format!("{:?}", code).eq_ignore_ascii_case(name))
        {
            return Ok(BindInput::Key(*code));
        }

        let prefix_len = GAMEPAD_PREFIX.len();
        if name.len() > prefix_len
            && name.is_char_boundary(prefix_len)
            && name[..prefix_len].eq_ignore_ascii_case(GAMEPAD_PREFIX)
        {
            let button = &name[prefix_len..];
            return BUTTON_NAMES
                .iter()
                .find(|(b, _)| b.eq_ignore_ascii_case(button))
                .map(|(_, b)| BindInput::Gamepad(*b))
                .ok_or_else(unknown);
        }

        Err(unknown())
    }
}

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Table of input bindings, persisted to a flat file when one is attached.
///
/// # Examples
///
/// ```
/// use bevy::prelude::KeyCode;
/// use bevy_dev_console::core::{BindInput, KeyBindings};
///
/// let mut binds = KeyBindings::new();
/// binds.set_bind(BindInput::Key(KeyCode::F1), "noclip");
/// assert_eq!(binds.get_bind(BindInput::Key(KeyCode::F1)), "noclip");
///
/// binds.set_bind(BindInput::Key(KeyCode::F1), "");
/// assert!(!binds.has_bind(BindInput::Key(KeyCode::F1)));
/// ```
#[derive(Resource, Debug, Default, Clone)]
pub struct KeyBindings {
    binds: Vec<(BindInput, String)>,
    path: Option<PathBuf>,
}

impl KeyBindings {
    /// Create an empty in-memory table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table backed by `path`, loading it if it exists.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let mut binds = Self::new();
        binds.attach_file(path);
        binds
    }

    /// Back this table with `path`, merging any bindings stored there.
    pub fn attach_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.exists() {
            match self.load_from(&path) {
                Ok(count) => info!("Loaded {} key bindings from '{}'", count, path.display()),
                Err(e) => error!("Console: Failed to load key bindings: {}", e),
            }
        } else {
            info!("No bindings file found at '{}'", path.display());
        }
        self.path = Some(path);
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bind `command` to `input`, replacing any previous binding.
    ///
    /// An empty command removes the binding. The file is rewritten after
    /// every change.
    pub fn set_bind(&mut self, input: BindInput, command: impl Into<String>) {
        let command = command.into();
        let existing = self.binds.iter().position(|(bound, _)| *bound == input);

        match (existing, command.is_empty()) {
            (Some(idx), true) => {
                self.binds.remove(idx);
            }
            (Some(idx), false) => self.binds[idx].1 = command,
            (None, false) => self.binds.push((input, command)),
            (None, true) => {}
        }

        self.save();
    }

    /// Check if `input` has a binding.
    pub fn has_bind(&self, input: BindInput) -> bool {
        self.binds.iter().any(|(bound, _)| *bound == input)
    }

    /// The command bound to `input`, or `""`.
    pub fn get_bind(&self, input: BindInput) -> &str {
        self.binds
            .iter()
            .find(|(bound, _)| *bound == input)
            .map(|(_, command)| command.as_str())
            .unwrap_or("")
    }

    /// Iterate over bindings in the order they were first made.
    pub fn iter(&self) -> impl Iterator<Item = (BindInput, &str)> {
        self.binds.iter().map(|(input, command)| (*input, command.as_str()))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.binds.len()
    }

    /// Check if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    /// Commands whose input was newly pressed, in binding order.
    pub fn triggered(&self, mut just_pressed: impl FnMut(BindInput) -> bool) -> Vec<String> {
        self.binds
            .iter()
            .filter(|(input, _)| just_pressed(*input))
            .map(|(_, command)| command.clone())
            .collect()
    }

    /// Read bindings from `path` into this table, without saving.
    ///
    /// Lines with unknown key names are skipped. Returns the number of
    /// bindings read.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<usize, PersistError> {
        let mut count = 0;
        for (key, command) in persist::read_pairs(path)? {
            match key.parse::<BindInput>() {
                Ok(input) => {
                    match self.binds.iter_mut().find(|(bound, _)| *bound == input) {
                        Some(entry) => entry.1 = command,
                        None => self.binds.push((input, command)),
                    }
                    count += 1;
                }
                Err(e) => debug!("Skipping binding line: {}", e),
            }
        }
        Ok(count)
    }

    /// Write every binding to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let names: Vec<(String, &str)> = self
            .binds
            .iter()
            .map(|(input, command)| (input.to_string(), command.as_str()))
            .collect();
        persist::write_pairs(path, names.iter().map(|(key, command)| (key.as_str(), *command)))
    }

    /// Rewrite the backing file, logging failures.
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = self.save_to(path) {
            error!("Console: Failed to save key bindings: {}", e);
        }
    }
}

/// Key names starting with `partial`, lowercased, for autocomplete.
pub fn complete_key_name(partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    BindInput::all_names()
        .map(|name| name.to_lowercase())
        .filter(|name| name.starts_with(&partial))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> BindInput {
        BindInput::Key(code)
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!("F1".parse::<BindInput>(), Ok(key(KeyCode::F1)));
        assert_eq!("f1".parse::<BindInput>(), Ok(key(KeyCode::F1)));
        assert_eq!("g".parse::<BindInput>(), Ok(key(KeyCode::KeyG)));
        assert_eq!("KeyG".parse::<BindInput>(), Ok(key(KeyCode::KeyG)));
        assert_eq!("arrowup".parse::<BindInput>(), Ok(key(KeyCode::ArrowUp)));
        assert_eq!("up".parse::<BindInput>(), Ok(key(KeyCode::ArrowUp)));
        assert_eq!("OemTilde".parse::<BindInput>(), Ok(key(KeyCode::Backquote)));
        assert_eq!("numpad5".parse::<BindInput>(), Ok(key(KeyCode::Numpad5)));
    }

    #[test]
    fn test_parse_bare_digits() {
        assert_eq!("0".parse::<BindInput>(), Ok(key(KeyCode::Digit0)));
        assert_eq!("7".parse::<BindInput>(), Ok(key(KeyCode::Digit7)));
        assert_eq!("d7".parse::<BindInput>(), Ok(key(KeyCode::Digit7)));
        assert!("10".parse::<BindInput>().is_err());
    }

    #[test]
    fn test_parse_gamepad_buttons() {
        assert_eq!(
            "GamepadSouth".parse::<BindInput>(),
            Ok(BindInput::Gamepad(GamepadButton::South))
        );
        assert_eq!(
            "gamepada".parse::<BindInput>(),
            Ok(BindInput::Gamepad(GamepadButton::South))
        );
        assert_eq!(
            "GamepadDPadUp".parse::<BindInput>(),
            Ok(BindInput::Gamepad(GamepadButton::DPadUp))
        );
        assert_eq!(
            "Gamepad".parse::<BindInput>(),
            Err(BindParseError::UnknownKey("Gamepad".to_string()))
        );
        assert!("GamepadBanana".parse::<BindInput>().is_err());
    }

    #[test]
    fn test_parse_unknown() {
        let err = "notakey".parse::<BindInput>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid key: notakey");
        assert!("".parse::<BindInput>().is_err());
    }

    #[test]
    fn test_display_roundtrips() {
        for name in BindInput::all_names() {
            let input: BindInput = name.parse().unwrap();
            assert_eq!(input.to_string(), name);
            assert_eq!(input.to_string().parse::<BindInput>(), Ok(input));
        }
        assert_eq!(BindInput::Gamepad(GamepadButton::West).to_string(), "GamepadWest");
    }

    #[test]
    fn test_set_bind_upsert_and_remove() {
        let mut binds = KeyBindings::new();
        binds.set_bind(key(KeyCode::KeyG), "noclip");
        binds.set_bind(key(KeyCode::F5), "timescale 2");
        binds.set_bind(key(KeyCode::KeyG), "god");
        assert_eq!(binds.len(), 2);
        assert_eq!(binds.get_bind(key(KeyCode::KeyG)), "god");

        let order: Vec<_> = binds.iter().map(|(input, _)| input).collect();
        assert_eq!(order, [key(KeyCode::KeyG), key(KeyCode::F5)]);

        binds.set_bind(key(KeyCode::KeyG), "");
        binds.set_bind(key(KeyCode::KeyG), "");
        assert!(!binds.has_bind(key(KeyCode::KeyG)));
        assert_eq!(binds.get_bind(key(KeyCode::KeyG)), "");
    }

    #[test]
    fn test_triggered_edges() {
        let mut binds = KeyBindings::new();
        binds.set_bind(key(KeyCode::F1), "a");
        binds.set_bind(BindInput::Gamepad(GamepadButton::Start), "b");
        binds.set_bind(key(KeyCode::F2), "c");

        let fired = binds.triggered(|input| input != key(KeyCode::F1));
        assert_eq!(fired, ["b", "c"]);
        assert!(binds.triggered(|_| false).is_empty());
    }

    #[test]
    fn test_persistence_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binds.cfg");

        let mut binds = KeyBindings::with_file(&path);
        binds.set_bind(key(KeyCode::KeyG), r#"tp 5 ~ 10; echo "went up""#);
        binds.set_bind(key(KeyCode::Digit1), "warp village");
        binds.set_bind(BindInput::Gamepad(GamepadButton::North), "noclip");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "G tp 5 ~ 10; echo \"went up\"\nD1 warp village\nGamepadNorth noclip\n"
        );

        let reloaded = KeyBindings::with_file(&path);
        assert_eq!(reloaded.len(), 3);
        assert_eq!(
            reloaded.get_bind(key(KeyCode::KeyG)),
            r#"tp 5 ~ 10; echo "went up""#
        );
        assert_eq!(
            reloaded.get_bind(BindInput::Gamepad(GamepadButton::North)),
            "noclip"
        );
    }

    #[test]
    fn test_persistence_keeps_command_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binds.cfg");

        let mut binds = KeyBindings::with_file(&path);
        binds.set_bind(key(KeyCode::F1), "  echo hi");

        let reloaded = KeyBindings::with_file(&path);
        assert_eq!(reloaded.get_bind(key(KeyCode::F1)), "  echo hi");
    }

    #[test]
    fn test_load_skips_bad_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binds.cfg");
        std::fs::write(&path, "f1 noclip\nbogus echo hi\nF2\n3 god\n").unwrap();

        let binds = KeyBindings::with_file(&path);
        assert_eq!(binds.len(), 2);
        assert_eq!(binds.get_bind(key(KeyCode::F1)), "noclip");
        assert_eq!(binds.get_bind(key(KeyCode::Digit3)), "god");
    }

    #[test]
    fn test_unbind_rewrites_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binds.cfg");

        let mut binds = KeyBindings::with_file(&path);
        binds.set_bind(key(KeyCode::F1), "noclip");
        binds.set_bind(key(KeyCode::F1), "");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_complete_key_name() {
        let names = complete_key_name("F1");
        assert_eq!(names, ["f1", "f10", "f11", "f12"]);
        assert!(complete_key_name("gamepadd").contains(&"gamepaddpadup".to_string()));
        assert!(!complete_key_name("gamepad").contains(&"gamepada".to_string()));
    }
}

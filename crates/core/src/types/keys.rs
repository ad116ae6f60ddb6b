//! Key bindings as stored in level files
//!
//! Bindings are written as case-insensitive symbolic names (`LCTRL`, `F1`,
//! `JOYB3`). The numeric codes match the virtual-key codes of the input layer,
//! with joystick directions and buttons placed above the keyboard range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A keyboard key or joystick input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum KeyCode {
    #[default]
    None = 0,
    Back = 8,
    Tab = 9,
    Enter = 13,
    Pause = 19,
    Esc = 27,
    Space = 32,
    PageUp = 33,
    PageDown = 34,
    End = 35,
    Home = 36,
    Left = 37,
    Up = 38,
    Right = 39,
    Down = 40,
    Insert = 45,
    Delete = 46,
    D0 = 48,
    D1 = 49,
    D2 = 50,
    D3 = 51,
    D4 = 52,
    D5 = 53,
    D6 = 54,
    D7 = 55,
    D8 = 56,
    D9 = 57,
    A = 65,
    B = 66,
    C = 67,
    D = 68,
    E = 69,
    F = 70,
    G = 71,
    H = 72,
    I = 73,
    J = 74,
    K = 75,
    L = 76,
    M = 77,
    N = 78,
    O = 79,
    P = 80,
    Q = 81,
    R = 82,
    S = 83,
    T = 84,
    U = 85,
    V = 86,
    W = 87,
    X = 88,
    Y = 89,
    Z = 90,
    LWin = 91,
    RWin = 92,
    NumPad0 = 96,
    NumPad1 = 97,
    NumPad2 = 98,
    NumPad3 = 99,
    NumPad4 = 100,
    NumPad5 = 101,
    NumPad6 = 102,
    NumPad7 = 103,
    NumPad8 = 104,
    NumPad9 = 105,
    Multiply = 106,
    Add = 107,
    Subtract = 109,
    Divide = 111,
    F1 = 112,
    F2 = 113,
    F3 = 114,
    F4 = 115,
    F5 = 116,
    F6 = 117,
    F7 = 118,
    F8 = 119,
    F9 = 120,
    F10 = 121,
    F11 = 122,
    F12 = 123,
    LShift = 160,
    RShift = 161,
    LCtrl = 162,
    RCtrl = 163,
    LAlt = 164,
    RAlt = 165,
    JoyUp = 996,
    JoyDown = 997,
    JoyLeft = 998,
    JoyRight = 999,
    JoyB1 = 1000,
    JoyB2 = 1001,
    JoyB3 = 1002,
    JoyB4 = 1003,
    JoyB5 = 1004,
    JoyB6 = 1005,
    JoyB7 = 1006,
    JoyB8 = 1007,
    JoyB9 = 1008,
    JoyB10 = 1009,
    JoyB11 = 1010,
    JoyB12 = 1011,
    JoyB13 = 1012,
    JoyB14 = 1013,
    JoyB15 = 1014,
}

/// Accepted spellings, upper case
const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("NONE", KeyCode::None),
    ("BACKSPACE", KeyCode::Back),
    ("TAB", KeyCode::Tab),
    ("ENTER", KeyCode::Enter),
    ("RETURN", KeyCode::Enter),
    ("PAUSE", KeyCode::Pause),
    ("ESC", KeyCode::Esc),
    ("ESCAPE", KeyCode::Esc),
    ("SPACE", KeyCode::Space),
    ("PAGEUP", KeyCode::PageUp),
    ("PAGEDOWN", KeyCode::PageDown),
    ("END", KeyCode::End),
    ("HOME", KeyCode::Home),
    ("LEFT", KeyCode::Left),
    ("UP", KeyCode::Up),
    ("RIGHT", KeyCode::Right),
    ("DOWN", KeyCode::Down),
    ("INS", KeyCode::Insert),
    ("INSERT", KeyCode::Insert),
    ("DEL", KeyCode::Delete),
    ("DELETE", KeyCode::Delete),
    ("0", KeyCode::D0),
    ("1", KeyCode::D1),
    ("2", KeyCode::D2),
    ("3", KeyCode::D3),
    ("4", KeyCode::D4),
    ("5", KeyCode::D5),
    ("6", KeyCode::D6),
    ("7", KeyCode::D7),
    ("8", KeyCode::D8),
    ("9", KeyCode::D9),
    ("A", KeyCode::A),
    ("B", KeyCode::B),
    ("C", KeyCode::C),
    ("D", KeyCode::D),
    ("E", KeyCode::E),
    ("F", KeyCode::F),
    ("G", KeyCode::G),
    ("H", KeyCode::H),
    ("I", KeyCode::I),
    ("J", KeyCode::J),
    ("K", KeyCode::K),
    ("L", KeyCode::L),
    ("M", KeyCode::M),
    ("N", KeyCode::N),
    ("O", KeyCode::O),
    ("P", KeyCode::P),
    ("Q", KeyCode::Q),
    ("R", KeyCode::R),
    ("S", KeyCode::S),
    ("T", KeyCode::T),
    ("U", KeyCode::U),
    ("V", KeyCode::V),
    ("W", KeyCode::W),
    ("X", KeyCode::X),
    ("Y", KeyCode::Y),
    ("Z", KeyCode::Z),
    ("LWIN", KeyCode::LWin),
    ("RWIN", KeyCode::RWin),
    ("NUMPAD0", KeyCode::NumPad0),
    ("NUMPAD1", KeyCode::NumPad1),
    ("NUMPAD2", KeyCode::NumPad2),
    ("NUMPAD3", KeyCode::NumPad3),
    ("NUMPAD4", KeyCode::NumPad4),
    ("NUMPAD5", KeyCode::NumPad5),
    ("NUMPAD6", KeyCode::NumPad6),
    ("NUMPAD7", KeyCode::NumPad7),
    ("NUMPAD8", KeyCode::NumPad8),
    ("NUMPAD9", KeyCode::NumPad9),
    ("MULTIPLY", KeyCode::Multiply),
    ("ADD", KeyCode::Add),
    ("SUBTRACT", KeyCode::Subtract),
    ("DIVIDE", KeyCode::Divide),
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
    ("LSHIFT", KeyCode::LShift),
    ("RSHIFT", KeyCode::RShift),
    ("LCTRL", KeyCode::LCtrl),
    ("LCONTROL", KeyCode::LCtrl),
    ("RCTRL", KeyCode::RCtrl),
    ("RCONTROL", KeyCode::RCtrl),
    ("LALT", KeyCode::LAlt),
    ("RALT", KeyCode::RAlt),
    ("JOYUP", KeyCode::JoyUp),
    ("JOYDOWN", KeyCode::JoyDown),
    ("JOYLEFT", KeyCode::JoyLeft),
    ("JOYRIGHT", KeyCode::JoyRight),
    ("JOYB1", KeyCode::JoyB1),
    ("JOYB2", KeyCode::JoyB2),
    ("JOYB3", KeyCode::JoyB3),
    ("JOYB4", KeyCode::JoyB4),
    ("JOYB5", KeyCode::JoyB5),
    ("JOYB6", KeyCode::JoyB6),
    ("JOYB7", KeyCode::JoyB7),
    ("JOYB8", KeyCode::JoyB8),
    ("JOYB9", KeyCode::JoyB9),
    ("JOYB10", KeyCode::JoyB10),
    ("JOYB11", KeyCode::JoyB11),
    ("JOYB12", KeyCode::JoyB12),
    ("JOYB13", KeyCode::JoyB13),
    ("JOYB14", KeyCode::JoyB14),
    ("JOYB15", KeyCode::JoyB15),
];

impl KeyCode {
    /// Maps a binding name to a key; unknown names map to `None`
    pub fn from_ini(value: &str) -> Self {
        let wanted = value.trim().to_uppercase();
        KEY_NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, key)| *key)
            .unwrap_or(KeyCode::None)
    }

    /// Numeric input code
    pub fn code(self) -> u16 {
        self as u16
    }

    /// True for joystick directions and buttons
    pub fn is_joystick(self) -> bool {
        self.code() >= KeyCode::JoyUp.code()
    }

    /// Canonical binding name
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Back => "BACKSPACE",
            Self::Tab => "TAB",
            Self::Enter => "ENTER",
            Self::Pause => "PAUSE",
            Self::Esc => "ESC",
            Self::Space => "SPACE",
            Self::PageUp => "PAGEUP",
            Self::PageDown => "PAGEDOWN",
            Self::End => "END",
            Self::Home => "HOME",
            Self::Left => "LEFT",
            Self::Up => "UP",
            Self::Right => "RIGHT",
            Self::Down => "DOWN",
            Self::Insert => "INS",
            Self::Delete => "DEL",
            Self::D0 => "0",
            Self::D1 => "1",
            Self::D2 => "2",
            Self::D3 => "3",
            Self::D4 => "4",
            Self::D5 => "5",
            Self::D6 => "6",
            Self::D7 => "7",
            Self::D8 => "8",
            Self::D9 => "9",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
            Self::K => "K",
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
            Self::S => "S",
            Self::T => "T",
            Self::U => "U",
            Self::V => "V",
            Self::W => "W",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::LWin => "LWIN",
            Self::RWin => "RWIN",
            Self::NumPad0 => "NUMPAD0",
            Self::NumPad1 => "NUMPAD1",
            Self::NumPad2 => "NUMPAD2",
            Self::NumPad3 => "NUMPAD3",
            Self::NumPad4 => "NUMPAD4",
            Self::NumPad5 => "NUMPAD5",
            Self::NumPad6 => "NUMPAD6",
            Self::NumPad7 => "NUMPAD7",
            Self::NumPad8 => "NUMPAD8",
            Self::NumPad9 => "NUMPAD9",
            Self::Multiply => "MULTIPLY",
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Divide => "DIVIDE",
            Self::F1 => "F1",
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
            Self::F5 => "F5",
            Self::F6 => "F6",
            Self::F7 => "F7",
            Self::F8 => "F8",
            Self::F9 => "F9",
            Self::F10 => "F10",
            Self::F11 => "F11",
            Self::F12 => "F12",
            Self::LShift => "LSHIFT",
            Self::RShift => "RSHIFT",
            Self::LCtrl => "LCTRL",
            Self::RCtrl => "RCTRL",
            Self::LAlt => "LALT",
            Self::RAlt => "RALT",
            Self::JoyUp => "JOYUP",
            Self::JoyDown => "JOYDOWN",
            Self::JoyLeft => "JOYLEFT",
            Self::JoyRight => "JOYRIGHT",
            Self::JoyB1 => "JOYB1",
            Self::JoyB2 => "JOYB2",
            Self::JoyB3 => "JOYB3",
            Self::JoyB4 => "JOYB4",
            Self::JoyB5 => "JOYB5",
            Self::JoyB6 => "JOYB6",
            Self::JoyB7 => "JOYB7",
            Self::JoyB8 => "JOYB8",
            Self::JoyB9 => "JOYB9",
            Self::JoyB10 => "JOYB10",
            Self::JoyB11 => "JOYB11",
            Self::JoyB12 => "JOYB12",
            Self::JoyB13 => "JOYB13",
            Self::JoyB14 => "JOYB14",
            Self::JoyB15 => "JOYB15",
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

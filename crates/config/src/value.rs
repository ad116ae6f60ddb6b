//! Typed setting values and the string mappers behind them
//!
//! Each [`ParamKind`] selects one mapper. Mapping never fails: malformed
//! input falls back, and [`ParamKind::check`] reports whether it would.

use crate::catalog::ParamKind;
use marquee_core::{
    AutostartMode, FnetSort, FontStyle, KeyCode, ListType, Rgba, ScreenSaverMode, SmartAsdMode,
    SortType, TextAlign, UseMouse,
};

/// Color applied to every `*_backcolor` while layout test mode is on
pub const LAYOUT_TEST_BACKCOLOR: &str = "200, 64, 200, 150";

/// The typed form of a parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
    Color(Rgba),
    Key(KeyCode),
    FontStyle(FontStyle),
    TextAlign(TextAlign),
    UseMouse(UseMouse),
    ScreenSaver(ScreenSaverMode),
    SmartAsd(SmartAsdMode),
    FnetSort(FnetSort),
    Autostart(AutostartMode),
    ListType(ListType),
    SortType(SortType),
}

fn parse_int(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

fn parse_float(raw: &str) -> Option<f32> {
    raw.trim().replace(',', ".").parse().ok()
}

impl ParamKind {
    /// Maps a raw string; `default_raw` backs up malformed numbers
    pub fn map(self, raw: &str, default_raw: &str) -> Setting {
        match self {
            Self::Bool => Setting::Bool(raw == "1"),
            Self::Int => Setting::Int(
                parse_int(raw)
                    .or_else(|| parse_int(default_raw))
                    .unwrap_or_default(),
            ),
            Self::Float => Setting::Float(
                parse_float(raw)
                    .or_else(|| parse_float(default_raw))
                    .unwrap_or_default(),
            ),
            Self::Text => Setting::Text(raw.to_string()),
            Self::Color => Setting::Color(Rgba::from_ini(raw)),
            Self::Key => Setting::Key(KeyCode::from_ini(raw)),
            Self::FontStyle => Setting::FontStyle(FontStyle::from_ini(raw)),
            Self::TextAlign => Setting::TextAlign(TextAlign::from_ini(raw)),
            Self::UseMouse => Setting::UseMouse(UseMouse::from_ini(raw)),
            Self::ScreenSaver => Setting::ScreenSaver(ScreenSaverMode::from_ini(raw)),
            Self::SmartasdMode => Setting::SmartAsd(SmartAsdMode::from_ini(raw)),
            Self::FnetSort => Setting::FnetSort(FnetSort::from_ini(raw)),
            Self::AutostartMode => Setting::Autostart(AutostartMode::from_ini(raw)),
            Self::ListType => Setting::ListType(ListType::from_ini(raw)),
            Self::SortType => Setting::SortType(SortType::from_ini(raw)),
        }
    }

    /// Reports why a raw value would fall back, if it would
    pub fn check(self, raw: &str) -> Result<(), String> {
        let trimmed = raw.trim();
        match self {
            Self::Text => Ok(()),
            Self::Bool if raw == "0" || raw == "1" => Ok(()),
            Self::Bool => Err("must be 0 or 1".to_string()),
            Self::Int => parse_int(raw)
                .map(|_| ())
                .ok_or_else(|| "must be an integer".to_string()),
            Self::Float => parse_float(raw)
                .map(|_| ())
                .ok_or_else(|| "must be a number".to_string()),
            Self::Color => Rgba::parse(raw)
                .map(|_| ())
                .ok_or_else(|| "must be r, g, b or r, g, b, a (0-255)".to_string()),
            Self::Key => {
                if trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case("none")
                    || KeyCode::from_ini(trimmed) != KeyCode::None
                {
                    Ok(())
                } else {
                    Err("unknown key name".to_string())
                }
            }
            _ => {
                let mapped = self.map(raw, "").to_ini();
                if mapped == trimmed {
                    Ok(())
                } else {
                    Err(format!("out of range, {} would be used", mapped))
                }
            }
        }
    }
}

impl Setting {
    /// Writes the value back in level-file form
    pub fn to_ini(&self) -> String {
        match self {
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Color(c) => c.to_string(),
            Self::Key(k) => k.to_string(),
            Self::FontStyle(s) => s.to_string(),
            Self::TextAlign(a) => a.to_string(),
            Self::UseMouse(m) => m.to_string(),
            Self::ScreenSaver(s) => s.to_string(),
            Self::SmartAsd(s) => s.to_string(),
            Self::FnetSort(s) => s.to_string(),
            Self::Autostart(a) => a.to_string(),
            Self::ListType(l) => l.to_string(),
            Self::SortType(s) => s.to_string(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<KeyCode> {
        match self {
            Self::Key(k) => Some(*k),
            _ => None,
        }
    }

    pub fn as_font_style(&self) -> Option<FontStyle> {
        match self {
            Self::FontStyle(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_text_align(&self) -> Option<TextAlign> {
        match self {
            Self::TextAlign(a) => Some(*a),
            _ => None,
        }
    }
}

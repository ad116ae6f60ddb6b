//! Small enumerations stored in level files as integers
//!
//! Each mapper accepts a range of codes and falls back to the zero variant
//! for anything else, malformed text included.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! ini_choice {
    (
        $(#[$meta:meta])*
        $name:ident, max = $max:literal, {
            $first:ident = 0,
            $($variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $first,
            $($variant),+
        }

        impl $name {
            /// Maps a level-file integer to a variant
            pub fn from_ini(value: &str) -> Self {
                match value.trim().parse::<i32>() {
                    $(Ok($code) if $code <= $max => Self::$variant,)+
                    _ => Self::$first,
                }
            }

            /// Integer written to level files
            pub fn code(self) -> i32 {
                match self {
                    Self::$first => 0,
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.code())
            }
        }
    };
}

ini_choice! {
    /// How the game list is built
    ListType, max = 4, {
        RomList = 0,
        MameXmlList = 1,
        RomSettingsIniList = 2,
        MameListinfo = 3,
        MessMachine = 4,
    }
}

ini_choice! {
    /// Game list ordering; `ExternalKey` is only set programmatically
    SortType, max = 6, {
        AZ = 0,
        Ranking = 1,
        MostRecentlyPlayed = 2,
        Year = 3,
        Manufacturer = 4,
        Category = 5,
        InputControl = 6,
        ExternalKey = 7,
    }
}

ini_choice! {
    FnetSort, max = 1, {
        LastPlayed = 0,
        MostPlayed = 1,
    }
}

ini_choice! {
    ScreenSaverMode, max = 2, {
        None = 0,
        Slideshow = 1,
        StartRandomGame = 2,
    }
}

ini_choice! {
    TextAlign, max = 2, {
        Left = 0,
        Center = 1,
        Right = 2,
    }
}

ini_choice! {
    /// Control panel layout
    SmartAsdMode, max = 3, {
        None = 0,
        Hybrid = 1,
        Dedicated = 2,
        Dedicated6Buttons = 3,
    }
}

ini_choice! {
    UseMouse, max = 2, {
        No = 0,
        XAxis = 1,
        YAxis = 2,
    }
}

ini_choice! {
    /// What happens when the front-end starts
    AutostartMode, max = 3, {
        Off = 0,
        LastSelected = 1,
        LastPlayed = 2,
        SingleGame = 3,
    }
}

/// Font style bit flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FontStyle(u8);

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle(0);
    pub const BOLD: FontStyle = FontStyle(1);
    pub const ITALIC: FontStyle = FontStyle(2);
    pub const UNDERLINE: FontStyle = FontStyle(4);
    pub const STRIKEOUT: FontStyle = FontStyle(8);

    /// Accepts any combination of flags (1-15), else regular
    pub fn from_ini(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(bits @ 1..=15) => Self(bits as u8),
            _ => Self::REGULAR,
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: FontStyle) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_codes_map() {
        assert_eq!(ListType::from_ini("2"), ListType::RomSettingsIniList);
        assert_eq!(AutostartMode::from_ini("3"), AutostartMode::SingleGame);
        assert_eq!(SmartAsdMode::from_ini(" 1 "), SmartAsdMode::Hybrid);
        assert_eq!(TextAlign::from_ini("1"), TextAlign::Center);
    }

    #[test]
    fn test_out_of_range_falls_back() {
        assert_eq!(ListType::from_ini("5"), ListType::RomList);
        assert_eq!(UseMouse::from_ini("-1"), UseMouse::No);
        assert_eq!(ScreenSaverMode::from_ini("abc"), ScreenSaverMode::None);
        assert_eq!(FnetSort::from_ini(""), FnetSort::LastPlayed);
    }

    #[test]
    fn test_external_key_is_not_accepted_from_files() {
        assert_eq!(SortType::from_ini("6"), SortType::InputControl);
        assert_eq!(SortType::from_ini("7"), SortType::AZ);
        assert_eq!(SortType::ExternalKey.code(), 7);
    }

    #[test]
    fn test_display_writes_code() {
        assert_eq!(SortType::Year.to_string(), "3");
        assert_eq!(AutostartMode::Off.to_string(), "0");
    }

    #[test]
    fn test_font_style_flags() {
        let style = FontStyle::from_ini("3");
        assert!(style.contains(FontStyle::BOLD));
        assert!(style.contains(FontStyle::ITALIC));
        assert!(!style.contains(FontStyle::UNDERLINE));
        assert_eq!(FontStyle::from_ini("16"), FontStyle::REGULAR);
        assert_eq!(FontStyle::from_ini("x"), FontStyle::REGULAR);
    }
}

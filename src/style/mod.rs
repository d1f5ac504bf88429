//! # Text Styles
//!
//! The handful of typographic settings an exam paper needs: size, weight,
//! slant and horizontal alignment. Every block renderer picks one of these
//! per line it draws.

use serde::{Deserialize, Serialize};

/// Font style of a drawn line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// Where the x coordinate of a text command anchors the string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Size and style used for a run of text. Sizes are in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub font_style: FontStyle,
}

impl TextStyle {
    pub const fn plain(font_size: f64) -> Self {
        Self {
            font_size,
            font_style: FontStyle::Normal,
        }
    }

    pub const fn bold(font_size: f64) -> Self {
        Self {
            font_size,
            font_style: FontStyle::Bold,
        }
    }

    pub const fn italic(font_size: f64) -> Self {
        Self {
            font_size,
            font_style: FontStyle::Italic,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::plain(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_style() {
        assert_eq!(TextStyle::bold(11.0).font_style, FontStyle::Bold);
        assert_eq!(TextStyle::italic(9.0).font_style, FontStyle::Italic);
        assert_eq!(TextStyle::default().font_size, 10.0);
    }
}

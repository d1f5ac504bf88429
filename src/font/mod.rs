//! # Font Management
//!
//! Exam papers are set in one of the standard PDF Type1 families (Times,
//! Helvetica, Courier). These never need embedding, so a font here is just
//! a PDF base name plus a width table for measurement.
//!
//! Resolving the configured family happens once, when the layout engine is
//! built. An unknown family is a hard error: there is no fallback face to
//! quietly substitute.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::error::PaperError;
use crate::style::{FontStyle, TextStyle};

/// A standard font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Times,
    Helvetica,
    Courier,
}

impl FontFamily {
    /// Parse a family name. Accepts the common spellings used by PDF
    /// libraries ("times", "Times-Roman", "helvetica", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "times" | "times-roman" | "times new roman" | "serif" => Some(FontFamily::Times),
            "helvetica" | "arial" | "sans-serif" => Some(FontFamily::Helvetica),
            "courier" | "monospace" => Some(FontFamily::Courier),
            _ => None,
        }
    }
}

/// One of the standard PDF fonts, by face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Width table for this face. Oblique Helvetica shares the upright widths.
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::TimesRoman => &metrics::TIMES_ROMAN,
            Self::TimesBold => &metrics::TIMES_BOLD,
            Self::TimesItalic => &metrics::TIMES_ITALIC,
            Self::TimesBoldItalic => &metrics::TIMES_BOLD_ITALIC,
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD,
            Self::Courier
            | Self::CourierBold
            | Self::CourierOblique
            | Self::CourierBoldOblique => &metrics::COURIER,
        }
    }

    fn face(family: FontFamily, style: FontStyle) -> Self {
        match (family, style) {
            (FontFamily::Times, FontStyle::Normal) => Self::TimesRoman,
            (FontFamily::Times, FontStyle::Bold) => Self::TimesBold,
            (FontFamily::Times, FontStyle::Italic) => Self::TimesItalic,
            (FontFamily::Times, FontStyle::BoldItalic) => Self::TimesBoldItalic,
            (FontFamily::Helvetica, FontStyle::Normal) => Self::Helvetica,
            (FontFamily::Helvetica, FontStyle::Bold) => Self::HelveticaBold,
            (FontFamily::Helvetica, FontStyle::Italic) => Self::HelveticaOblique,
            (FontFamily::Helvetica, FontStyle::BoldItalic) => Self::HelveticaBoldOblique,
            (FontFamily::Courier, FontStyle::Normal) => Self::Courier,
            (FontFamily::Courier, FontStyle::Bold) => Self::CourierBold,
            (FontFamily::Courier, FontStyle::Italic) => Self::CourierOblique,
            (FontFamily::Courier, FontStyle::BoldItalic) => Self::CourierBoldOblique,
        }
    }
}

/// Map a character to its WinAnsiEncoding byte. Characters without one
/// are drawn as `?`.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let cp = ch as u32;
    match cp {
        0x20..=0x7E | 0xA0..=0xFF => Some(cp as u8),
        _ => {
            let byte = match ch {
                '\u{20AC}' => 0x80,
                '\u{201A}' => 0x82,
                '\u{0192}' => 0x83,
                '\u{201E}' => 0x84,
                '\u{2026}' => 0x85,
                '\u{2020}' => 0x86,
                '\u{2021}' => 0x87,
                '\u{02C6}' => 0x88,
                '\u{2030}' => 0x89,
                '\u{0160}' => 0x8A,
                '\u{2039}' => 0x8B,
                '\u{0152}' => 0x8C,
                '\u{017D}' => 0x8E,
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
                '\u{2022}' => 0x95,
                '\u{2013}' => 0x96,
                '\u{2014}' => 0x97,
                '\u{02DC}' => 0x98,
                '\u{2122}' => 0x99,
                '\u{0161}' => 0x9A,
                '\u{203A}' => 0x9B,
                '\u{0153}' => 0x9C,
                '\u{017E}' => 0x9E,
                '\u{0178}' => 0x9F,
                _ => return None,
            };
            Some(byte)
        }
    }
}

/// Shared font context used by layout and PDF serialization.
#[derive(Debug, Clone)]
pub struct FontContext {
    family: FontFamily,
}

impl FontContext {
    /// Build a context for the named family.
    pub fn new(family: &str) -> Result<Self, PaperError> {
        let family = FontFamily::from_name(family).ok_or_else(|| {
            PaperError::Font(format!(
                "font family '{family}' is not available; use Times, Helvetica or Courier"
            ))
        })?;
        Ok(Self { family })
    }

    pub fn family(&self) -> FontFamily {
        self.family
    }

    /// Resolve a text style to the concrete face.
    pub fn resolve(&self, style: FontStyle) -> StandardFont {
        StandardFont::face(self.family, style)
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, style: &TextStyle) -> f64 {
        self.resolve(style.font_style)
            .metrics()
            .char_width(ch, style.font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, style: &TextStyle) -> f64 {
        self.resolve(style.font_style)
            .metrics()
            .measure_string(text, style.font_size)
    }
}

impl Default for FontContext {
    fn default() -> Self {
        Self {
            family: FontFamily::Times,
        }
    }
}

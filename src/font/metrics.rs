//! AFM advance widths for the standard Type1 fonts used by exam papers.
//!
//! Tables cover the printable ASCII range 0x20..=0x7E in 1/1000 em. A short
//! list of extra glyphs covers the typographic and maths symbols papers
//! actually contain. Accented Latin-1 letters share the width of their base
//! letter in these faces, and characters WinAnsi cannot encode are drawn
//! (and measured) as `?`.

use super::win_ansi_byte;

/// Width data for one standard font face.
#[derive(Debug)]
pub struct StandardFontMetrics {
    ascii: [u16; 95],
    extras: &'static [(char, u16)],
    default_width: u16,
}

impl StandardFontMetrics {
    /// Advance width of `ch` in points at `font_size`.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.units(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.units(ch) as u32).sum::<u32>() as f64 / 1000.0 * font_size
    }

    fn units(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return self.ascii[(cp - 0x20) as usize];
        }
        if let Some((_, w)) = self.extras.iter().find(|(c, _)| *c == ch) {
            return *w;
        }
        if let Some(base) = latin_base_letter(ch) {
            return self.units(base);
        }
        if win_ansi_byte(ch).is_none() {
            return self.units('?');
        }
        self.default_width
    }
}

/// The unaccented letter an accented WinAnsi letter is built on.
fn latin_base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

const TIMES_EXTRAS: &[(char, u16)] = &[
    ('\u{00A9}', 760),
    ('\u{2013}', 500),
    ('\u{2014}', 1000),
    ('\u{2018}', 333),
    ('\u{2019}', 333),
    ('\u{201C}', 444),
    ('\u{201D}', 444),
    ('\u{2022}', 350),
    ('\u{00B0}', 400),
    ('\u{00A0}', 250),
    ('\u{00A3}', 500),
    ('\u{00A7}', 500),
    ('\u{00AE}', 760),
    ('\u{00B1}', 564),
    ('\u{00B2}', 300),
    ('\u{00B3}', 300),
    ('\u{00B5}', 500),
    ('\u{00B7}', 250),
    ('\u{00BC}', 750),
    ('\u{00BD}', 750),
    ('\u{00BE}', 750),
    ('\u{00C6}', 889),
    ('\u{00D7}', 564),
    ('\u{00DF}', 500),
    ('\u{00E6}', 667),
    ('\u{00F7}', 564),
    ('\u{20AC}', 500),
    ('\u{2026}', 1000),
    ('\u{2122}', 980),
];

const HELVETICA_EXTRAS: &[(char, u16)] = &[
    ('\u{00A9}', 737),
    ('\u{2013}', 556),
    ('\u{2014}', 1000),
    ('\u{2018}', 222),
    ('\u{2019}', 222),
    ('\u{201C}', 333),
    ('\u{201D}', 333),
    ('\u{2022}', 350),
    ('\u{00B0}', 400),
    ('\u{00A0}', 278),
    ('\u{00A3}', 556),
    ('\u{00A7}', 556),
    ('\u{00AE}', 737),
    ('\u{00B1}', 584),
    ('\u{00B2}', 333),
    ('\u{00B3}', 333),
    ('\u{00B5}', 556),
    ('\u{00B7}', 278),
    ('\u{00BC}', 834),
    ('\u{00BD}', 834),
    ('\u{00BE}', 834),
    ('\u{00C6}', 1000),
    ('\u{00D7}', 584),
    ('\u{00DF}', 611),
    ('\u{00E6}', 889),
    ('\u{00F7}', 584),
    ('\u{20AC}', 556),
    ('\u{2026}', 1000),
    ('\u{2122}', 1000),
    // dotless-i accents are wider than the 'i' they sit on
    ('\u{00EC}', 278),
    ('\u{00ED}', 278),
    ('\u{00EE}', 278),
    ('\u{00EF}', 278),
];

pub static TIMES_ROMAN: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // sp-/
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0-9
        278, 278, 564, 564, 564, 444, 921, // :-@
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, // A-M
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, // N-Z
        333, 278, 333, 469, 500, 333, // [-`
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, // a-m
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, // n-z
        480, 200, 480, 541, // {-~
    ],
    extras: TIMES_EXTRAS,
    default_width: 500,
};

pub static TIMES_BOLD: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 570, 570, 570, 500, 930,
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        333, 278, 333, 581, 500, 333,
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        394, 220, 394, 520,
    ],
    extras: TIMES_EXTRAS,
    default_width: 500,
};

pub static TIMES_ITALIC: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 675, 675, 675, 500, 920,
        611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
        667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
        389, 278, 389, 422, 500, 333,
        500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
        500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
        400, 275, 400, 541,
    ],
    extras: TIMES_EXTRAS,
    default_width: 500,
};

pub static TIMES_BOLD_ITALIC: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 570, 570, 570, 500, 832,
        667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889,
        722, 722, 611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611,
        333, 278, 333, 570, 500, 333,
        500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778,
        556, 500, 500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389,
        348, 220, 348, 570,
    ],
    extras: TIMES_EXTRAS,
    default_width: 500,
};

pub static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        278, 278, 584, 584, 584, 556, 1015,
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        278, 278, 278, 469, 556, 333,
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        334, 260, 334, 584,
    ],
    extras: HELVETICA_EXTRAS,
    default_width: 556,
};

pub static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    extras: HELVETICA_EXTRAS,
    default_width: 556,
};

pub static COURIER: StandardFontMetrics = StandardFontMetrics {
    ascii: [600; 95],
    extras: &[],
    default_width: 600,
};

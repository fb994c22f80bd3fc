//! Metrics for the PDF standard fonts.
//!
//! Standard fonts are referenced by name and never embedded, so PDF output
//! built with them needs no font files. Widths come from the Adobe font
//! metrics in 1/1000 em for printable ASCII; accented Latin letters are
//! measured as their unaccented base letter.

/// The subset of the PDF standard 14 fonts the product layouts use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesItalic,
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 675, 675, 675, 500, 920,
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
    667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
    389, 278, 389, 422, 500, 333,
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
    500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
    400, 275, 400, 541,
];

impl StandardFont {
    /// The PostScript name the font is referenced by in the PDF
    pub fn base_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesItalic => "Times-Italic",
        }
    }

    /// Ascender in 1/1000 em
    pub fn ascender(self) -> f32 {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaBold => 718.0,
            StandardFont::TimesRoman | StandardFont::TimesItalic => 683.0,
        }
    }

    /// Descender in 1/1000 em; negative
    pub fn descender(self) -> f32 {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaBold => -207.0,
            StandardFont::TimesRoman => -217.0,
            StandardFont::TimesItalic => -205.0,
        }
    }

    fn ascii_widths(self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA,
            StandardFont::HelveticaBold => &HELVETICA_BOLD,
            StandardFont::TimesRoman => &TIMES_ROMAN,
            StandardFont::TimesItalic => &TIMES_ITALIC,
        }
    }

    fn is_times(self) -> bool {
        matches!(self, StandardFont::TimesRoman | StandardFont::TimesItalic)
    }

    /// Advance width of a character in 1/1000 em
    pub fn char_width(self, ch: char) -> u16 {
        let ch = fold_accent(ch);
        if (' '..='~').contains(&ch) {
            return self.ascii_widths()[ch as usize - 32];
        }

        let times = self.is_times();
        match ch {
            '\u{2018}' | '\u{2019}' => if times { 333 } else { 222 },
            '\u{201C}' | '\u{201D}' => if times { 444 } else { 333 },
            '\u{2013}' => if times { 500 } else { 556 },
            '\u{2014}' | '\u{2026}' => 1000,
            '\u{2022}' => 350,
            '\u{00B7}' => if times { 250 } else { 278 },
            '\u{00A0}' => self.char_width(' '),
            _ => if times { 500 } else { 556 },
        }
    }

    /// Encode text as WinAnsi bytes; characters outside the encoding become `?`
    pub fn encode(self, text: &str) -> Vec<u8> {
        text.chars().map(win_ansi).collect()
    }
}

/// Measure accented Latin letters and inverted punctuation as their base glyph
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        '¿' => '?',
        '¡' => '!',
        other => other,
    }
}

fn win_ansi(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{00A0}'..='\u{00FF}' => ch as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_match_afm() {
        assert_eq!(StandardFont::Helvetica.char_width(' '), 278);
        assert_eq!(StandardFont::Helvetica.char_width('W'), 944);
        assert_eq!(StandardFont::HelveticaBold.char_width('m'), 889);
        assert_eq!(StandardFont::TimesRoman.char_width('~'), 541);
        assert_eq!(StandardFont::TimesItalic.char_width('A'), 611);
    }

    #[test]
    fn accented_letters_measure_as_base() {
        for font in [StandardFont::Helvetica, StandardFont::TimesItalic] {
            assert_eq!(font.char_width('é'), font.char_width('e'));
            assert_eq!(font.char_width('Ñ'), font.char_width('N'));
            assert_eq!(font.char_width('¿'), font.char_width('?'));
        }
    }

    #[test]
    fn encodes_spanish_text_in_win_ansi() {
        assert_eq!(StandardFont::Helvetica.encode("añó"), vec![b'a', 0xF1, 0xF3]);
        assert_eq!(StandardFont::Helvetica.encode("\u{2019}"), vec![0x92]);
        assert_eq!(StandardFont::Helvetica.encode("\u{4E2D}"), vec![b'?']);
    }
}

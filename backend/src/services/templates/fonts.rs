//! Helvetica (PDF base-14 font) metrics and WinAnsi encoding.
//!
//! The base-14 fonts are never embedded, so line widths are measured with the
//! published AFM advance widths instead of reading a font file.

/// Font resource name used in page content streams.
pub const FONT_RESOURCE: &str = "F1";
pub const BASE_FONT: &str = "Helvetica";
pub const ENCODING: &str = "WinAnsiEncoding";

/// Advance widths (1/1000 em) for WinAnsi codes 0x20..=0x7E.
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance widths for WinAnsi codes 0xA0..=0xFF.
const LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

/// Maps a character to its WinAnsi byte.
///
/// Control characters become a space; characters WinAnsi cannot express become `?`.
pub fn encode_char(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        c if c.is_control() => b' ',
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Advance width of one WinAnsi byte in 1/1000 em.
///
/// Codes not listed are a full em: the ellipsis, em dash and trademark glyphs
/// really are, and codes [`encode_char`] never produces are given the widest
/// value so a measured line is never narrower than it is drawn.
pub fn glyph_width(code: u8) -> u16 {
    match code {
        0x20..=0x7E => ASCII_WIDTHS[(code - 0x20) as usize],
        0xA0..=0xFF => LATIN1_WIDTHS[(code - 0xA0) as usize],
        0x80 | 0x96 => 556,
        0x91 | 0x92 => 222,
        0x93 | 0x94 => 333,
        0x95 => 350,
        _ => 1000,
    }
}

/// Width of `text` in points at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| u32::from(glyph_width(encode_char(c))))
        .sum();
    units as f32 * font_size / 1000.0
}

/// Shortens `line` so it fits `max_width` points, ending it with `...`.
///
/// Returns the line unchanged when it already fits. The cut always falls on
/// a character boundary and the ellipsis is counted in the width.
pub fn fit_line(line: &str, max_width: f32, font_size: f32) -> String {
    if text_width(line, font_size) <= max_width {
        return line.to_string();
    }
    const ELLIPSIS: &str = "...";
    let budget = max_width - text_width(ELLIPSIS, font_size);
    let mut used = 0.0;
    let mut out = String::new();
    for c in line.chars() {
        let w = f32::from(glyph_width(encode_char(c))) * font_size / 1000.0;
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    let kept = out.trim_end().len();
    out.truncate(kept);
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_match_afm() {
        assert_eq!(glyph_width(b' '), 278);
        assert_eq!(glyph_width(b'@'), 1015);
        assert_eq!(glyph_width(b'W'), 944);
        assert_eq!(glyph_width(b'i'), 222);
        assert_eq!(glyph_width(b'~'), 584);
        // "Hello" = 722 + 556 + 222 + 222 + 556
        assert!((text_width("Hello", 10.0) - 22.78).abs() < 0.001);
    }

    #[test]
    fn latin1_widths_match_afm() {
        assert_eq!(glyph_width(encode_char('ß')), 611);
        assert_eq!(glyph_width(encode_char('÷')), 584);
        assert_eq!(glyph_width(encode_char('±')), 584);
        assert_eq!(glyph_width(encode_char('¬')), 584);
        assert_eq!(glyph_width(encode_char('Æ')), 1000);
        assert_eq!(glyph_width(encode_char('ø')), 611);
        assert_eq!(glyph_width(encode_char('—')), 1000);
        assert_eq!(glyph_width(encode_char('€')), 556);
    }

    #[test]
    fn fitted_latin1_line_stays_in_budget() {
        let line = "ß".repeat(200);
        let fitted = fit_line(&line, 451.0, 12.0);
        let kept = fitted.trim_end_matches("...").chars().count();
        // 611/1000 em each at 12pt, plus three dots at 278.
        assert!(kept as f32 * 611.0 * 0.012 + 3.0 * 278.0 * 0.012 <= 451.0);
        assert_eq!(kept, 60);
    }

    #[test]
    fn encodes_winansi() {
        assert_eq!(encode("Zoë"), vec![b'Z', b'o', 0xEB]);
        assert_eq!(encode("a\nb\tc"), b"a b c".to_vec());
        assert_eq!(encode("€5 – ok"), vec![0x80, b'5', b' ', 0x96, b' ', b'o', b'k']);
        assert_eq!(encode("日本"), b"??".to_vec());
    }

    #[test]
    fn fit_line_keeps_short_lines() {
        assert_eq!(fit_line("name: Ann", 500.0, 12.0), "name: Ann");
    }

    #[test]
    fn fit_line_truncates_with_ellipsis() {
        let long = format!("notes: {}", "word ".repeat(200));
        let fitted = fit_line(&long, 451.0, 12.0);
        assert!(fitted.starts_with("notes: word"));
        assert!(fitted.ends_with("..."));
        assert!(!fitted.ends_with(" ..."));
        assert!(text_width(&fitted, 12.0) <= 451.0);
        assert_eq!(fit_line(&long, 451.0, 12.0), fitted);
    }
}

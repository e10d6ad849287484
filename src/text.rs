//! Helvetica text measurement and word wrapping.
//!
//! The built-in PDF fonts carry no metrics inside printpdf, so widths come
//! from the standard Helvetica AFM table (units of 1/1000 em).

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Bold glyphs run slightly wider than the regular cut.
const BOLD_WIDTH_FACTOR: f32 = 1.06;

/// Advance widths for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Width used for characters outside the table (accented letters, €).
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
    Italic,
}

/// Font face and size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub face: Face,
}

impl TextStyle {
    pub const fn new(size: f32, face: Face) -> Self {
        Self { size, face }
    }

    pub const fn regular(size: f32) -> Self {
        Self::new(size, Face::Regular)
    }

    pub const fn bold(size: f32) -> Self {
        Self::new(size, Face::Bold)
    }

    pub const fn italic(size: f32) -> Self {
        Self::new(size, Face::Italic)
    }
}

fn glyph_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, style: TextStyle) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    let width = units as f32 / 1000.0 * style.size * MM_PER_PT;
    match style.face {
        Face::Bold => width * BOLD_WIDTH_FACTOR,
        Face::Regular | Face::Italic => width,
    }
}

/// Greedy word wrap to `max_width` millimetres.
///
/// Always returns at least one line. Words wider than the column are split
/// by characters so no line exceeds the width.
pub fn wrap_text(text: &str, style: TextStyle, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, style) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, style) <= max_width {
            current = word.to_string();
        } else {
            for piece in split_long_word(word, style, max_width) {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = piece;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, style: TextStyle, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if text_width(&piece, style) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

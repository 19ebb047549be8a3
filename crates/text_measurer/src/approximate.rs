//! Heuristic text measurement
//!
//! Estimates widths from broad character classes when no precalculated
//! table is available. Much coarser than [`crate::PrecalculatedTextMeasurer`]
//! and applies no kerning.

use crate::TextMeasurer;

/// Font size the bundled width table was generated at
pub const DEFAULT_FONT_SIZE: f64 = 110.0;

/// Estimates text width as a fraction of the em per character class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateTextMeasurer {
    font_size: f64,
}

impl ApproximateTextMeasurer {
    /// Create an estimator for the given font size in pixels
    pub fn new(font_size: f64) -> Self {
        Self { font_size }
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Estimated advance of a single character
    pub fn char_width(&self, ch: char) -> f64 {
        self.font_size * em_ratio(ch)
    }
}

impl Default for ApproximateTextMeasurer {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE)
    }
}

impl TextMeasurer for ApproximateTextMeasurer {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }
}

/// Fraction of the em a character is expected to occupy
fn em_ratio(ch: char) -> f64 {
    match ch {
        // Narrow characters
        ' ' | 'i' | 'l' | 'j' | 't' | 'f' | 'r' | '!' | '|' | '\'' | '`' | '.' | ',' | ':' | ';' => 0.30,
        // Narrow letter and digit
        'I' | '1' => 0.35,
        // Wide characters
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.90,
        'A'..='Z' => 0.70,
        'a'..='z' => 0.55,
        '0'..='9' => 0.60,
        // CJK is full-width
        '\u{4E00}'..='\u{9FFF}' | '\u{3000}'..='\u{303F}' => 1.0,
        // Zero-width space, joiners, BOM and soft hyphen
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{00AD}' => 0.0,
        '\u{00A0}' => 0.30,
        _ => 0.60,
    }
}

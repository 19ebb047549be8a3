//! Precalculated text measurement
//!
//! Widths come from a table produced offline for one font at one size: a
//! width per character, a fallback width for everything else, and a
//! kerning adjustment per adjacent character pair. Nothing is rendered.
//!
//! The serialized form is a JSON object:
//!
//! ```json
//! {
//!   "mean-character-length": 65.68,
//!   "character-lengths": { "I": 32.44, "J": 32.44 },
//!   "kerning-pairs": { "AV": 4.19 }
//! }
//! ```

use crate::{Result, TextMeasurer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::{BufReader, Read, Write};

/// Field names are part of the file format.
#[derive(Debug, Deserialize)]
struct WidthsFile {
    #[serde(rename = "mean-character-length")]
    mean_character_length: f64,
    #[serde(rename = "character-lengths")]
    character_lengths: HashMap<char, f64>,
    #[serde(rename = "kerning-pairs")]
    kerning_pairs: HashMap<String, f64>,
}

/// Borrowed, key-sorted view used when writing a table out.
#[derive(Serialize)]
struct WidthsFileRef<'a> {
    #[serde(rename = "mean-character-length")]
    mean_character_length: f64,
    #[serde(rename = "character-lengths")]
    character_lengths: BTreeMap<char, f64>,
    #[serde(rename = "kerning-pairs")]
    kerning_pairs: BTreeMap<&'a str, f64>,
}

/// Measures text using a precalculated width and kerning table.
///
/// The table is immutable once built, so a single instance can be shared
/// across threads (usually behind an `Arc`) and queried without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecalculatedTextMeasurer {
    /// Width used for characters missing from `char_to_width`
    default_character_width: f64,
    /// Width of each known character
    char_to_width: HashMap<char, f64>,
    /// Amount to subtract when the two characters of the key are adjacent
    pair_to_kern: HashMap<String, f64>,
}

impl PrecalculatedTextMeasurer {
    /// Create a measurer from explicit tables.
    ///
    /// Values are taken as given. A pair key is expected to be exactly two
    /// characters long; other keys are kept but can never match a window
    /// in the middle of a string.
    pub fn new<C, P, K>(default_character_width: f64, char_to_width: C, pair_to_kern: P) -> Self
    where
        C: IntoIterator<Item = (char, f64)>,
        P: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            default_character_width,
            char_to_width: char_to_width.into_iter().collect(),
            pair_to_kern: pair_to_kern
                .into_iter()
                .map(|(pair, kern)| (pair.into(), kern))
                .collect(),
        }
    }

    /// Parse a measurer from a JSON stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: WidthsFile = serde_json::from_reader(BufReader::new(reader))?;
        Ok(file.into_measurer())
    }

    /// Parse a measurer from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: WidthsFile = serde_json::from_str(json)?;
        Ok(file.into_measurer())
    }

    /// Parse a measurer from JSON bytes.
    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        let file: WidthsFile = serde_json::from_slice(json)?;
        Ok(file.into_measurer())
    }

    /// Write the table as JSON, keys sorted.
    ///
    /// Non-finite widths are written as `null` and will not parse back.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.as_file())?;
        Ok(())
    }

    /// Serialize the table to a JSON string, keys sorted.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.as_file())?)
    }

    fn as_file(&self) -> WidthsFileRef<'_> {
        WidthsFileRef {
            mean_character_length: self.default_character_width,
            character_lengths: self.char_to_width.iter().map(|(&c, &w)| (c, w)).collect(),
            kerning_pairs: self
                .pair_to_kern
                .iter()
                .map(|(pair, &kern)| (pair.as_str(), kern))
                .collect(),
        }
    }

    /// Width used for characters that have no entry of their own
    pub fn default_character_width(&self) -> f64 {
        self.default_character_width
    }

    /// Width of `ch`, if the table has an entry for it
    pub fn char_width(&self, ch: char) -> Option<f64> {
        self.char_to_width.get(&ch).copied()
    }

    /// Kerning adjustment for an adjacent pair, if the table has one
    pub fn kerning(&self, pair: &str) -> Option<f64> {
        self.pair_to_kern.get(pair).copied()
    }

    /// Number of characters with an explicit width
    pub fn char_count(&self) -> usize {
        self.char_to_width.len()
    }

    /// Number of kerning pairs
    pub fn pair_count(&self) -> usize {
        self.pair_to_kern.len()
    }

    /// Returns the width, in pixels, of `text`.
    ///
    /// Each character contributes its table width (or the default width),
    /// and every adjacent pair found in the kerning table subtracts its
    /// adjustment. The window starting at the last character holds only
    /// that character and is still looked up. The result is not clamped.
    pub fn text_width(&self, text: &str) -> f64 {
        let mut width = 0.0;
        let mut chars = text.char_indices().peekable();

        while let Some((start, ch)) = chars.next() {
            width += self
                .char_to_width
                .get(&ch)
                .copied()
                .unwrap_or(self.default_character_width);

            let end = chars
                .peek()
                .map_or(text.len(), |&(next, next_ch)| next + next_ch.len_utf8());
            width -= self.pair_to_kern.get(&text[start..end]).copied().unwrap_or(0.0);
        }

        width
    }
}

impl WidthsFile {
    fn into_measurer(self) -> PrecalculatedTextMeasurer {
        PrecalculatedTextMeasurer {
            default_character_width: self.mean_character_length,
            char_to_width: self.character_lengths,
            pair_to_kern: self.kerning_pairs,
        }
    }
}

impl TextMeasurer for PrecalculatedTextMeasurer {
    fn text_width(&self, text: &str) -> f64 {
        PrecalculatedTextMeasurer::text_width(self, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MeasureError;
    use proptest::prelude::*;

    fn ij_table() -> PrecalculatedTextMeasurer {
        PrecalculatedTextMeasurer::new(10.0, [('I', 5.0), ('J', 6.0)], [("IJ", 2.0)])
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(ij_table().text_width(""), 0.0);
    }

    #[test]
    fn test_kerned_pair() {
        assert_eq!(ij_table().text_width("IJ"), 9.0);
    }

    #[test]
    fn test_kerning_is_directional() {
        let table = ij_table();
        assert_eq!(table.text_width("JI"), 11.0);
        assert_eq!(table.text_width("IJI"), 14.0);
    }

    #[test]
    fn test_unknown_characters_use_default() {
        let table = ij_table();
        assert_eq!(table.text_width("x"), 10.0);
        assert_eq!(table.text_width("IxJ"), 21.0);
        assert_eq!(table.text_width("字"), 10.0);
        assert_eq!(table.text_width("\u{1F600}"), 10.0);
    }

    #[test]
    fn test_no_transitive_kerning() {
        let table = PrecalculatedTextMeasurer::new(
            10.0,
            [('A', 1.0), ('B', 2.0), ('C', 4.0)],
            [("AB", 0.5), ("BC", 0.25), ("AC", 100.0)],
        );
        assert_eq!(table.text_width("ABC"), 7.0 - 0.5 - 0.25);
    }

    #[test]
    fn test_single_character_kerning_key_matches_last_window() {
        // The last window is one character long and is still looked up
        let table = PrecalculatedTextMeasurer::new(10.0, [('a', 3.0)], [("a", 1.0)]);
        assert_eq!(table.text_width("a"), 2.0);
        assert_eq!(table.text_width("aa"), 5.0);
    }

    #[test]
    fn test_multibyte_pairs() {
        let table = PrecalculatedTextMeasurer::new(8.0, [('é', 4.0), ('字', 9.0)], [("é字", 1.5)]);
        assert_eq!(table.text_width("é字"), 11.5);
        assert_eq!(table.text_width("字é"), 13.0);
    }

    #[test]
    fn test_negative_result_is_not_clamped() {
        let table = PrecalculatedTextMeasurer::new(1.0, [('z', 1.0)], [("ab", 5.0)]);
        assert_eq!(table.text_width("ab"), -3.0);
    }

    #[test]
    fn test_accessors() {
        let table = ij_table();
        assert_eq!(table.default_character_width(), 10.0);
        assert_eq!(table.char_width('I'), Some(5.0));
        assert_eq!(table.char_width('x'), None);
        assert_eq!(table.kerning("IJ"), Some(2.0));
        assert_eq!(table.kerning("JI"), None);
        assert_eq!(table.char_count(), 2);
        assert_eq!(table.pair_count(), 1);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "mean-character-length": 10,
            "character-lengths": {"I": 5, "J": 6},
            "kerning-pairs": {"IJ": 2}
        }"#;
        let table = PrecalculatedTextMeasurer::from_json_str(json).unwrap();
        assert_eq!(table, ij_table());
        assert_eq!(table.text_width("IJI"), 14.0);
    }

    #[test]
    fn test_parse_from_reader() {
        let json = br#"{"mean-character-length": 10.0, "character-lengths": {}, "kerning-pairs": {}}"#;
        let table = PrecalculatedTextMeasurer::from_reader(&json[..]).unwrap();
        assert_eq!(table.text_width("abc"), 30.0);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let json = r#"{
            "font": "DejaVu Sans",
            "mean-character-length": 10,
            "character-lengths": {},
            "kerning-pairs": {}
        }"#;
        assert!(PrecalculatedTextMeasurer::from_json_str(json).is_ok());
    }

    #[test]
    fn test_missing_mean_width_fails() {
        let json = r#"{"character-lengths": {"I": 5}, "kerning-pairs": {}}"#;
        let err = PrecalculatedTextMeasurer::from_json_str(json).unwrap_err();
        assert!(matches!(err, MeasureError::DataFormat(ref msg) if msg.contains("mean-character-length")));
    }

    #[test]
    fn test_missing_tables_fail() {
        let no_chars = r#"{"mean-character-length": 10, "kerning-pairs": {}}"#;
        let no_pairs = r#"{"mean-character-length": 10, "character-lengths": {}}"#;
        assert!(matches!(
            PrecalculatedTextMeasurer::from_json_str(no_chars),
            Err(MeasureError::DataFormat(_))
        ));
        assert!(matches!(
            PrecalculatedTextMeasurer::from_json_str(no_pairs),
            Err(MeasureError::DataFormat(_))
        ));
    }

    #[test]
    fn test_garbage_fails() {
        for input in ["", "not json", "{", "[]", "null", r#"{"mean-character-length": "wide"}"#] {
            assert!(
                matches!(
                    PrecalculatedTextMeasurer::from_json_str(input),
                    Err(MeasureError::DataFormat(_))
                ),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_multi_character_width_key_fails() {
        let json = r#"{"mean-character-length": 10, "character-lengths": {"IJ": 5}, "kerning-pairs": {}}"#;
        assert!(matches!(
            PrecalculatedTextMeasurer::from_json_slice(json.as_bytes()),
            Err(MeasureError::DataFormat(_))
        ));
    }

    #[test]
    fn test_json_output_is_sorted() {
        let table = PrecalculatedTextMeasurer::new(10.0, [('b', 2.0), ('a', 1.0)], [("ba", 0.5), ("ab", 0.25)]);
        let json = table.to_json_string().unwrap();
        assert!(json.find("\"a\"").unwrap() < json.find("\"b\"").unwrap());
        assert!(json.find("\"ab\"").unwrap() < json.find("\"ba\"").unwrap());
        assert!(json.contains("\"mean-character-length\": 10.0"));
    }

    #[test]
    fn test_to_writer_round_trip() {
        let table = ij_table();
        let mut buf = Vec::new();
        table.to_writer(&mut buf).unwrap();
        assert_eq!(PrecalculatedTextMeasurer::from_json_slice(&buf).unwrap(), table);
    }

    /// Quarter-pixel values keep every sum exact regardless of order
    fn exact_width() -> impl Strategy<Value = f64> {
        (0u32..400).prop_map(|n| f64::from(n) / 4.0)
    }

    fn alphabet() -> impl Strategy<Value = char> {
        prop::sample::select(vec!['A', 'V', 'T', 'o', '.', ' ', 'é', '字', '\u{1F600}'])
    }

    fn exact_table() -> impl Strategy<Value = PrecalculatedTextMeasurer> {
        (
            exact_width(),
            prop::collection::hash_map(alphabet(), exact_width(), 0..6),
            prop::collection::hash_map(
                (alphabet(), alphabet()).prop_map(|(a, b)| format!("{a}{b}")),
                exact_width(),
                0..12,
            ),
        )
            .prop_map(|(default, chars, pairs)| PrecalculatedTextMeasurer::new(default, chars, pairs))
    }

    fn width_of(table: &PrecalculatedTextMeasurer, ch: char) -> f64 {
        table.char_width(ch).unwrap_or(table.default_character_width())
    }

    fn kern_of(table: &PrecalculatedTextMeasurer, a: char, b: char) -> f64 {
        table.kerning(&format!("{a}{b}")).unwrap_or(0.0)
    }

    proptest! {
        #[test]
        fn prop_empty_string_is_zero(table in exact_table()) {
            prop_assert_eq!(table.text_width(""), 0.0);
        }

        #[test]
        fn prop_single_character(table in exact_table(), ch in any::<char>()) {
            prop_assert_eq!(table.text_width(&ch.to_string()), width_of(&table, ch));
        }

        #[test]
        fn prop_pair_is_sum_minus_kerning(table in exact_table(), x in alphabet(), y in alphabet()) {
            let text: String = [x, y].iter().collect();
            let expected = width_of(&table, x) + width_of(&table, y) - kern_of(&table, x, y);
            prop_assert_eq!(table.text_width(&text), expected);
        }

        #[test]
        fn prop_triple_kerns_adjacent_pairs_only(
            table in exact_table(),
            x in alphabet(),
            y in alphabet(),
            z in alphabet()
        ) {
            let text: String = [x, y, z].iter().collect();
            let expected = width_of(&table, x) + width_of(&table, y) + width_of(&table, z)
                - kern_of(&table, x, y)
                - kern_of(&table, y, z);
            prop_assert_eq!(table.text_width(&text), expected);
        }

        #[test]
        fn prop_unknown_characters_are_deterministic(table in exact_table(), text in "\\PC{0,16}") {
            prop_assert_eq!(table.text_width(&text), table.text_width(&text));
        }

        #[test]
        fn prop_total_over_any_string(
            default in 0.0f64..200.0,
            chars in prop::collection::hash_map(any::<char>(), 0.0f64..200.0, 0..32),
            pairs in prop::collection::hash_map("\\PC{2}", -50.0f64..50.0, 0..32),
            text in any::<String>()
        ) {
            let table = PrecalculatedTextMeasurer::new(default, chars, pairs);
            prop_assert!(table.text_width(&text).is_finite());
        }

        #[test]
        fn prop_json_round_trip_preserves_widths(
            default in 0.0f64..200.0,
            chars in prop::collection::hash_map(alphabet(), 0.0f64..200.0, 0..9),
            pairs in prop::collection::hash_map(
                (alphabet(), alphabet()).prop_map(|(a, b)| format!("{a}{b}")),
                -50.0f64..50.0,
                0..20,
            ),
            corpus in prop::collection::vec(prop::collection::vec(alphabet(), 0..12), 1..8)
        ) {
            let table = PrecalculatedTextMeasurer::new(default, chars, pairs);
            let parsed = PrecalculatedTextMeasurer::from_json_str(&table.to_json_string().unwrap()).unwrap();
            for text in corpus.iter().map(|chars| chars.iter().collect::<String>()) {
                prop_assert_eq!(parsed.text_width(&text), table.text_width(&text));
            }
        }
    }
}

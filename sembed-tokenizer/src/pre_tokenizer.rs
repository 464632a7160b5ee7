use regex::{Error as RegexError, Regex};
use unicode_categories::UnicodeCategories;

/// The default word boundary marker.
pub const MARKER: char = '\u{2581}';

/// Maximal runs of word characters or single characters which are neither word characters nor
/// whitespace.
const WORDS_OR_PUNCTUATION: &str = r"\w+|[^\w\s]";

/// A pre-tokenizer.
#[derive(Clone, Debug)]
pub(crate) struct PreTokenizer(PreTokenizers);

/// The available pre-tokenizers.
#[derive(Clone, Debug)]
enum PreTokenizers {
    /// Splits into words and punctuation and marks the words.
    Metaspace { pattern: Regex, marker: char },
    /// Splits on whitespace.
    Whitespace,
}

impl PreTokenizer {
    /// Creates a pre-tokenizer which marks units with letters or digits by a word boundary marker.
    pub(crate) fn metaspace(marker: char) -> Result<Self, RegexError> {
        Ok(Self(PreTokenizers::Metaspace {
            pattern: Regex::new(WORDS_OR_PUNCTUATION)?,
            marker,
        }))
    }

    /// Creates a whitespace pre-tokenizer.
    pub(crate) fn whitespace() -> Self {
        Self(PreTokenizers::Whitespace)
    }

    /// Pre-tokenizes the sequence into non-empty units.
    pub(crate) fn pre_tokenize(&self, sequence: &str) -> Vec<String> {
        match self.0 {
            PreTokenizers::Metaspace {
                ref pattern,
                marker,
            } => pattern
                .find_iter(sequence)
                .map(|unit| {
                    let unit = unit.as_str();
                    if is_alphanumeric(unit) {
                        let mut marked = String::with_capacity(marker.len_utf8() + unit.len());
                        marked.push(marker);
                        marked.push_str(unit);
                        marked
                    } else {
                        unit.to_string()
                    }
                })
                .collect(),
            PreTokenizers::Whitespace => sequence.split_whitespace().map(Into::into).collect(),
        }
    }
}

/// Checks whether the unit contains a letter or a decimal digit.
fn is_alphanumeric(unit: &str) -> bool {
    unit.chars().any(|c| c.is_letter() || c.is_number_decimal_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metaspace() -> PreTokenizer {
        PreTokenizer::metaspace(MARKER).unwrap()
    }

    #[test]
    fn test_metaspace() {
        assert_eq!(
            metaspace().pre_tokenize("Hey friend!     How are you?!?"),
            ["▁Hey", "▁friend", "!", "▁How", "▁are", "▁you", "?", "!", "?"],
        );
    }

    #[test]
    fn test_metaspace_first_unit() {
        assert_eq!(metaspace().pre_tokenize("apple"), ["▁apple"]);
        assert_eq!(metaspace().pre_tokenize("(apple)"), ["(", "▁apple", ")"]);
    }

    #[test]
    fn test_metaspace_digits_and_underscores() {
        assert_eq!(
            metaspace().pre_tokenize("April 16, 2024 __ x_1"),
            ["▁April", "▁16", ",", "▁2024", "__", "▁x_1"],
        );
    }

    #[test]
    fn test_metaspace_unicode() {
        assert_eq!(
            metaspace().pre_tokenize("Crème brûlée — très bien"),
            ["▁Crème", "▁brûlée", "—", "▁très", "▁bien"],
        );
    }

    #[test]
    fn test_metaspace_custom_marker() {
        let pre_tokenizer = PreTokenizer::metaspace('#').unwrap();
        assert_eq!(pre_tokenizer.pre_tokenize("a, b"), ["#a", ",", "#b"]);
    }

    #[test]
    fn test_empty() {
        assert!(metaspace().pre_tokenize("").is_empty());
        assert!(metaspace().pre_tokenize(" \t\n").is_empty());
        assert!(PreTokenizer::whitespace().pre_tokenize("  ").is_empty());
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(
            PreTokenizer::whitespace().pre_tokenize("this  is\tan apple, right?"),
            ["this", "is", "an", "apple,", "right?"],
        );
    }
}

use crate::vocab::Vocab;

/// The byte offsets of a token within its unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Offsets(pub(crate) usize, pub(crate) usize);

/// A segmented token.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    pub(crate) value: String,
    pub(crate) offsets: Offsets,
}

/// A subword model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Model {
    /// Greedy longest-match segmentation into subwords of the vocabulary.
    Greedy,
    /// Every unit is taken verbatim as one token.
    WordLevel,
}

impl Model {
    /// Segments the unit into tokens which cover the unit completely.
    ///
    /// Tokens which are missing from the vocabulary are replaced by the unknown token during the
    /// greedy segmentation and are kept during the word level segmentation.
    pub(crate) fn segment(&self, unit: &str, vocab: &Vocab, unk: &str) -> Vec<Token> {
        match self {
            Model::Greedy => greedy(unit, vocab, unk),
            Model::WordLevel => vec![Token {
                value: unit.into(),
                offsets: Offsets(0, unit.len()),
            }],
        }
    }
}

fn greedy(unit: &str, vocab: &Vocab, unk: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = 0;

    while start < unit.len() {
        let rest = &unit[start..];
        // added tokens take priority over the subwords
        let len = vocab
            .added_prefix(rest)
            .or_else(|| longest_match(rest, vocab));
        let token = match len {
            Some(len) => Token {
                value: rest[..len].into(),
                offsets: Offsets(start, start + len),
            },
            None => Token {
                value: unk.into(),
                offsets: Offsets(start, start + rest.chars().next().map_or(1, char::len_utf8)),
            },
        };
        start = token.offsets.1;
        tokens.push(token);
    }

    tokens
}

/// Gets the byte length of the longest prefix of the sequence which is part of the vocabulary.
fn longest_match(sequence: &str, vocab: &Vocab) -> Option<usize> {
    let mut end = sequence.len();
    while end > 0 {
        let candidate = &sequence[..end];
        if vocab.contains(candidate) {
            return Some(end);
        }
        end -= candidate.chars().next_back().map_or(end, char::len_utf8);
    }

    None
}

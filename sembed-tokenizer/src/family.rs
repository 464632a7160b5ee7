/// The encoder families.
///
/// The family selects the pre-tokenizer, the subword model, the decoder and the literal contents
/// of the special tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Greedy longest-match subword segmentation of word boundary marked units, wrapped in
    /// `<s>` and `</s>`.
    Unigram,
    /// Lowercased whitespace separated words as tokens, wrapped in `[CLS]` and `[SEP]`.
    WordLevel,
}

impl Family {
    /// Maps the `model.type` of a tokenizer description to a family.
    pub(crate) fn from_model_type(kind: &str) -> Self {
        if kind.eq_ignore_ascii_case("unigram") {
            Family::Unigram
        } else {
            Family::WordLevel
        }
    }

    /// Gets the literal contents of the begin, end, unknown, padding and mask tokens.
    pub(crate) fn special_tokens(self) -> [&'static str; 5] {
        match self {
            Family::Unigram => ["<s>", "</s>", "<unk>", "<pad>", "<mask>"],
            Family::WordLevel => ["[CLS]", "[SEP]", "[UNK]", "[PAD]", "[MASK]"],
        }
    }

    /// Whether the family lowercases by default.
    pub(crate) fn lowercase(self) -> bool {
        match self {
            Family::Unigram => false,
            Family::WordLevel => true,
        }
    }
}

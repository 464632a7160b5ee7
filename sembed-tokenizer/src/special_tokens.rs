use log::{debug, warn};

use crate::{family::Family, vocab::Vocab, SmallString};

/// A special token with its resolved id.
#[derive(Clone, Debug, PartialEq)]
pub struct SpecialToken {
    content: SmallString,
    id: Option<u32>,
}

impl SpecialToken {
    fn new(content: &str, vocab: &Vocab) -> Self {
        Self {
            content: content.into(),
            id: vocab.resolve(content),
        }
    }

    /// Gets the literal content.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Gets the id, if the token is part of the vocabulary or the added tokens.
    pub fn id(&self) -> Option<u32> {
        self.id
    }
}

/// The special tokens of an encoder family.
///
/// For the word level family the begin and end tokens are the class and separation tokens.
#[derive(Clone, Debug)]
pub struct SpecialTokens {
    begin: SpecialToken,
    end: SpecialToken,
    unknown: SpecialToken,
    pad: SpecialToken,
    mask: SpecialToken,
}

impl SpecialTokens {
    /// Resolves the special tokens of the family by their literal contents.
    pub(crate) fn new(family: Family, vocab: &Vocab) -> Self {
        let [begin, end, unknown, pad, mask] = family.special_tokens();
        let special_tokens = Self {
            begin: SpecialToken::new(begin, vocab),
            end: SpecialToken::new(end, vocab),
            unknown: SpecialToken::new(unknown, vocab),
            pad: SpecialToken::new(pad, vocab),
            mask: SpecialToken::new(mask, vocab),
        };

        if special_tokens.unknown.id.is_none() {
            warn!(
                "The unknown token {} doesn't exist, unknown tokens are mapped to 0",
                unknown,
            );
        }
        debug!("Resolved the special tokens {:?}", special_tokens);

        special_tokens
    }

    /// Gets the begin token.
    pub fn begin(&self) -> &SpecialToken {
        &self.begin
    }

    /// Gets the end token.
    pub fn end(&self) -> &SpecialToken {
        &self.end
    }

    /// Gets the unknown token.
    pub fn unknown(&self) -> &SpecialToken {
        &self.unknown
    }

    /// Gets the padding token.
    pub fn pad(&self) -> &SpecialToken {
        &self.pad
    }

    /// Gets the mask token.
    pub fn mask(&self) -> &SpecialToken {
        &self.mask
    }

    /// Gets the id of the unknown token, which is zero if it doesn't exist.
    pub fn unknown_id(&self) -> u32 {
        self.unknown.id.unwrap_or(0)
    }
}

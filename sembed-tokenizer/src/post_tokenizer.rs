use std::iter::once;

use num_traits::Num;

use crate::{encoding::Encoding, model::Token, special_tokens::SpecialTokens, vocab::Vocab};

/// A post-tokenizer.
///
/// Wraps the tokens in the begin and end tokens and resolves their ids.
#[derive(Debug)]
pub(crate) struct PostTokenizer {
    begin: String,
    end: String,
    unk_id: u32,
}

impl PostTokenizer {
    pub(crate) const ADDED_TOKENS: usize = 2;

    pub(crate) fn new(special_tokens: &SpecialTokens) -> Self {
        Self {
            begin: special_tokens.begin().content().into(),
            end: special_tokens.end().content().into(),
            unk_id: special_tokens.unknown_id(),
        }
    }

    /// Resolves the id of the token from the vocabulary, else from the added tokens, else as the
    /// unknown id.
    fn resolve(&self, token: &str, vocab: &Vocab) -> u32 {
        vocab.resolve(token).unwrap_or(self.unk_id)
    }

    pub(crate) fn post_tokenize<N>(&self, tokens: Vec<Token>, vocab: &Vocab) -> Encoding<N>
    where
        N: Num + From<u32> + Copy,
    {
        let len = tokens.len() + Self::ADDED_TOKENS;
        let mut encoding = Encoding::with_capacity(len);

        let begin = (self.begin.clone(), true);
        let end = (self.end.clone(), true);
        let tokens = tokens.into_iter().map(|token| {
            let special = vocab.is_special(token.value.as_str());
            (token.value, special)
        });
        for (token, special) in once(begin).chain(tokens).chain(once(end)) {
            encoding.ids.push(self.resolve(token.as_str(), vocab).into());
            encoding.special_tokens_mask.push(if special { N::one() } else { N::zero() });
            encoding.tokens.push(token);
        }
        encoding.type_ids = vec![N::zero(); len];
        encoding.attention_mask = vec![N::one(); len];

        encoding
    }
}

use num_traits::ToPrimitive;

use crate::{special_tokens::SpecialTokens, vocab::Vocab};

/// A decoder.
///
/// Decoding is lossy, casing and the original whitespace can't be reconstructed.
#[derive(Clone, Debug)]
pub(crate) enum Decoder {
    /// Concatenates the tokens and replaces the word boundary marker by a space.
    Metaspace { marker: char },
    /// Joins the tokens with single spaces.
    WordLevel,
}

impl Decoder {
    pub(crate) fn decode<N>(
        &self,
        ids: &[N],
        vocab: &Vocab,
        special_tokens: &SpecialTokens,
    ) -> String
    where
        N: ToPrimitive,
    {
        let unknown = special_tokens.unknown().content();
        let tokens = ids.iter().map(|id| {
            id.to_u32()
                .and_then(|id| vocab.id_to_token(id))
                .unwrap_or(unknown)
        });
        let begin = special_tokens.begin().content();
        let end = special_tokens.end().content();

        match self {
            Self::Metaspace { marker } => tokens
                .collect::<String>()
                .replace(*marker, " ")
                .replace(begin, "")
                .replace(end, "")
                .trim()
                .to_string(),
            Self::WordLevel => tokens
                .filter(|token| *token != begin && *token != end)
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string(),
        }
    }
}

use derive_more::{Deref, From};
use displaydoc::Display;
use log::debug;
use ndarray::{Array2, Dim};
use sembed_tokenizer::{BuilderError, Encoding, Tokenizer as SubwordTokenizer};
use thiserror::Error;

#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// A wrapped, pre-configured subword tokenizer.
///
/// Shapes the encodings for the encoder, the core tokenizer itself never pads or truncates.
pub struct Tokenizer {
    tokenizer: SubwordTokenizer<i64>,
    token_size: Option<usize>,
    pad_id: i64,
}

/// The potential errors of the tokenizer.
#[derive(Debug, Display, Error)]
pub enum TokenizerError {
    /// Failed to build the tokenizer: {0}
    Builder(#[from] BuilderError),
    /// The vocabulary of the tokenizer is empty
    EmptyVocab,
}

/// The token ids of the encoded sequences.
#[derive(Clone, Debug, Deref, From)]
pub struct TokenIds(pub Array2<i64>);

/// The attention masks of the encoded sequences.
#[derive(Clone, Debug, Deref, From)]
pub struct AttentionMasks(pub Array2<i64>);

/// The type ids of the encoded sequences.
#[derive(Clone, Debug, Deref, From)]
pub struct TypeIds(pub Array2<i64>);

/// The encoded sequences.
///
/// All arrays are of shape `[batch, tokens]`.
#[derive(Clone, Debug)]
pub struct Encodings {
    pub token_ids: TokenIds,
    pub attention_masks: AttentionMasks,
    pub type_ids: TypeIds,
}

impl Tokenizer {
    /// Wraps a tokenizer.
    ///
    /// Without a token size the encodings are padded to the longest sequence of a batch, otherwise
    /// they are padded and truncated to the token size, which includes the special tokens.
    ///
    /// # Errors
    /// Fails if the vocabulary is empty.
    pub fn new(
        tokenizer: SubwordTokenizer<i64>,
        token_size: Option<usize>,
    ) -> Result<Self, TokenizerError> {
        if tokenizer.vocab().is_empty() {
            return Err(TokenizerError::EmptyVocab);
        }
        let pad_id = tokenizer
            .special_tokens()
            .pad()
            .id()
            .map_or(0, i64::from);
        debug!(
            "Wrapped a {:?} tokenizer with token size {:?} and padding id {}",
            tokenizer.family(),
            token_size,
            pad_id,
        );

        Ok(Self {
            tokenizer,
            token_size,
            pad_id,
        })
    }

    /// Gets the wrapped tokenizer.
    pub fn inner(&self) -> &SubwordTokenizer<i64> {
        &self.tokenizer
    }

    /// Gets the token size.
    pub fn token_size(&self) -> Option<usize> {
        self.token_size
    }

    /// Encodes the sequence.
    ///
    /// The encoding is in correct shape for the encoder.
    pub fn encode(&self, sequence: impl AsRef<str>) -> Encodings {
        self.shape(vec![self.tokenizer.encode(sequence)])
    }

    /// Encodes the batch of sequences.
    ///
    /// The encodings are in correct shape for the encoder.
    pub fn encode_batch<S>(&self, sequences: &[S]) -> Encodings
    where
        S: AsRef<str> + Sync,
    {
        #[cfg(not(feature = "multithreaded"))]
        let sequences = sequences.iter();
        #[cfg(feature = "multithreaded")]
        let sequences = sequences.par_iter();

        let encodings = sequences
            .map(|sequence| self.tokenizer.encode(sequence))
            .collect::<Vec<_>>();
        self.shape(encodings)
    }

    /// Pads and truncates the encodings into arrays.
    fn shape(&self, encodings: Vec<Encoding<i64>>) -> Encodings {
        let token_size = self.token_size.unwrap_or_else(|| {
            encodings
                .iter()
                .map(Encoding::len)
                .max()
                .unwrap_or_default()
        });
        let shape = Dim([encodings.len(), token_size]);

        let token_ids = Array2::from_shape_fn(shape, |(i, j)| {
            fitted(encodings[i].ids(), j, token_size).unwrap_or(self.pad_id)
        })
        .into();
        let attention_masks = Array2::from_shape_fn(shape, |(i, j)| {
            fitted(encodings[i].attention_mask(), j, token_size).unwrap_or(0)
        })
        .into();
        let type_ids = Array2::from_shape_fn(shape, |(i, j)| {
            fitted(encodings[i].type_ids(), j, token_size).unwrap_or(0)
        })
        .into();

        Encodings {
            token_ids,
            attention_masks,
            type_ids,
        }
    }
}

/// Gets the value at the position of the values fitted to the token size.
///
/// Truncated values keep their last value, which is the end token, at the last position.
fn fitted(values: &[i64], position: usize, token_size: usize) -> Option<i64> {
    if values.len() > token_size && position + 1 == token_size {
        values.last().copied()
    } else {
        values.get(position).copied()
    }
}

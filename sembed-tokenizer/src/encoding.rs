/// An encoded sequence.
///
/// All parts have the same length and are ordered by the positions of the tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct Encoding<N> {
    /// The IDs of the tokens.
    pub(crate) ids: Vec<N>,
    /// The type of the IDs.
    pub(crate) type_ids: Vec<N>,
    /// The tokenized sequence.
    pub(crate) tokens: Vec<String>,
    /// The mask identifying special tokens.
    pub(crate) special_tokens_mask: Vec<N>,
    /// The mask identifying padding tokens.
    pub(crate) attention_mask: Vec<N>,
}

impl<N> Encoding<N> {
    /// Creates an empty encoding with capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            type_ids: Vec::with_capacity(capacity),
            tokens: Vec::with_capacity(capacity),
            special_tokens_mask: Vec::with_capacity(capacity),
            attention_mask: Vec::with_capacity(capacity),
        }
    }

    /// Gets the total length.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks whether this is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Gets the ids.
    pub fn ids(&self) -> &[N] {
        self.ids.as_slice()
    }

    /// Gets the type ids.
    pub fn type_ids(&self) -> &[N] {
        self.type_ids.as_slice()
    }

    /// Gets the tokens.
    pub fn tokens(&self) -> &[String] {
        self.tokens.as_slice()
    }

    /// Gets the special tokens mask.
    pub fn special_tokens_mask(&self) -> &[N] {
        self.special_tokens_mask.as_slice()
    }

    /// Gets the attention mask.
    pub fn attention_mask(&self) -> &[N] {
        self.attention_mask.as_slice()
    }
}

use std::{fs, marker::PhantomData, path::Path};

use displaydoc::Display;
use regex::Error as RegexError;
use thiserror::Error;

use crate::{
    config::ModelConfig,
    decoder::Decoder,
    family::Family,
    model::Model,
    normalizer::Normalizer,
    post_tokenizer::PostTokenizer,
    pre_tokenizer::{PreTokenizer, MARKER},
    special_tokens::SpecialTokens,
    tokenizer::Tokenizer,
    vocab::{LoadError, TokenizerDocument, Vocab},
};

/// A builder to create a [`Tokenizer`].
pub struct Builder<N> {
    vocab: Vocab,
    config: ModelConfig,
    family: Family,
    lowercase: Option<bool>,
    marker: char,
    _ids: PhantomData<N>,
}

/// The potential errors of the builder.
#[derive(Debug, Display, Error)]
pub enum BuilderError {
    /// Failed to load the tokenizer documents: {0}
    Load(#[from] LoadError),
    /// Failed to build the pre-tokenizer pattern: {0}
    Pattern(#[from] RegexError),
}

impl<N> Builder<N> {
    /// Creates a [`Tokenizer`] builder from a tokenizer description and a model configuration.
    ///
    /// The default settings are:
    /// - The encoder family inferred from the tokenizer description.
    /// - Lowercasing depending on the family, only the word level family lowercases.
    /// - The `'▁'` word boundary marker.
    pub fn new(tokenizer: &[u8], config: &[u8]) -> Result<Self, BuilderError> {
        let document = TokenizerDocument::parse(tokenizer)?;
        let family = document.family();
        let config = ModelConfig::parse(config)?;

        Ok(Self {
            vocab: document.into(),
            config,
            family,
            lowercase: None,
            marker: MARKER,
            _ids: PhantomData,
        })
    }

    /// Creates a [`Tokenizer`] builder from a tokenizer description file and a model
    /// configuration file.
    ///
    /// The default settings are the same as for [`new()`].
    ///
    /// [`new()`]: Builder::new
    pub fn from_files(
        tokenizer: impl AsRef<Path>,
        config: impl AsRef<Path>,
    ) -> Result<Self, BuilderError> {
        let tokenizer = fs::read(tokenizer).map_err(LoadError::Read)?;
        let config = fs::read(config).map_err(LoadError::Read)?;
        Self::new(&tokenizer, &config)
    }

    /// Configures the encoder family.
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    /// Toggles lowercasing of the sequences.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = Some(lowercase);
        self
    }

    /// Configures the word boundary marker.
    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    /// Builds the tokenizer.
    ///
    /// # Errors
    /// Fails if the pre-tokenizer pattern can't be compiled.
    pub fn build(self) -> Result<Tokenizer<N>, BuilderError> {
        let special_tokens = SpecialTokens::new(self.family, &self.vocab);
        let lowercase = self.lowercase.unwrap_or_else(|| self.family.lowercase());
        let normalizer = Normalizer::new(lowercase);
        let (pre_tokenizer, model, decoder) = match self.family {
            Family::Unigram => (
                PreTokenizer::metaspace(self.marker)?,
                Model::Greedy,
                Decoder::Metaspace {
                    marker: self.marker,
                },
            ),
            Family::WordLevel => (PreTokenizer::whitespace(), Model::WordLevel, Decoder::WordLevel),
        };
        let post_tokenizer = PostTokenizer::new(&special_tokens);

        Ok(Tokenizer {
            vocab: self.vocab,
            config: self.config,
            family: self.family,
            special_tokens,
            normalizer,
            pre_tokenizer,
            model,
            post_tokenizer,
            decoder,
            _ids: PhantomData,
        })
    }
}

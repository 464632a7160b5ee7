use std::path::Path;

use displaydoc::Display;
use log::warn;
use sembed_tokenizer::{Builder as TokenizerBuilder, Family};
use thiserror::Error;

use crate::{
    model::Encoder,
    pipeline::Pipeline,
    pooler::MeanPooler,
    tokenizer::{Tokenizer, TokenizerError},
};

/// A builder to create a [`Pipeline`].
pub struct Builder {
    tokenizer: TokenizerBuilder<i64>,
    token_size: Option<usize>,
    pooler: MeanPooler,
}

/// Potential errors of the pipeline [`Builder`].
#[derive(Debug, Display, Error)]
pub enum BuilderError {
    /// The token size must be at least two to allow for the special tokens
    TokenSize,
    /// Failed to build the tokenizer: {0}
    Tokenizer(#[from] TokenizerError),
}

impl Builder {
    /// Creates a [`Pipeline`] builder from a tokenizer description and a model configuration.
    ///
    /// The default settings are:
    /// - The tokenizer defaults of the encoder family.
    /// - No token size, sequences of a batch are padded to the longest one.
    /// - The default [`MeanPooler`].
    pub fn new(tokenizer: &[u8], config: &[u8]) -> Result<Self, BuilderError> {
        let tokenizer = TokenizerBuilder::new(tokenizer, config).map_err(TokenizerError::from)?;
        Ok(Self {
            tokenizer,
            token_size: None,
            pooler: MeanPooler::default(),
        })
    }

    /// Creates a [`Pipeline`] builder from a tokenizer description file and a model configuration
    /// file.
    pub fn from_files(
        tokenizer: impl AsRef<Path>,
        config: impl AsRef<Path>,
    ) -> Result<Self, BuilderError> {
        let tokenizer =
            TokenizerBuilder::from_files(tokenizer, config).map_err(TokenizerError::from)?;
        Ok(Self {
            tokenizer,
            token_size: None,
            pooler: MeanPooler::default(),
        })
    }

    /// Sets the encoder family of the tokenizer.
    ///
    /// Defaults to the family inferred from the tokenizer description.
    pub fn with_family(mut self, family: Family) -> Self {
        self.tokenizer = self.tokenizer.with_family(family);
        self
    }

    /// Toggles lower casing for the tokenizer.
    ///
    /// Defaults to the setting of the encoder family.
    pub fn with_lowercase(mut self, toggle: bool) -> Self {
        self.tokenizer = self.tokenizer.with_lowercase(toggle);
        self
    }

    /// Sets the token size for the tokenizer.
    ///
    /// Defaults to `None`. An encoder with a fixed token size overrides it.
    ///
    /// # Errors
    /// Fails if `size` is less than two.
    pub fn with_token_size(mut self, size: Option<usize>) -> Result<Self, BuilderError> {
        if matches!(size, Some(size) if size < 2) {
            Err(BuilderError::TokenSize)
        } else {
            self.token_size = size;
            Ok(self)
        }
    }

    /// Sets the pooler.
    ///
    /// Defaults to [`MeanPooler::default()`].
    pub fn with_pooler(mut self, pooler: MeanPooler) -> Self {
        self.pooler = pooler;
        self
    }

    /// Builds a [`Pipeline`] with the encoder.
    ///
    /// # Errors
    /// Fails on invalid tokenizer settings or a mismatching token size of the encoder.
    pub fn build<E>(self, encoder: E) -> Result<Pipeline<E>, BuilderError>
    where
        E: Encoder,
    {
        let token_size = match (self.token_size, encoder.token_size()) {
            (Some(size), Some(fixed)) if size != fixed => {
                warn!(
                    "The token size {} is overridden by the fixed token size {} of the encoder",
                    size, fixed,
                );
                Some(fixed)
            }
            (size, fixed) => fixed.or(size),
        };
        if matches!(token_size, Some(size) if size < 2) {
            return Err(BuilderError::TokenSize);
        }

        let tokenizer = self.tokenizer.build().map_err(TokenizerError::from)?;
        let tokenizer = Tokenizer::new(tokenizer, token_size)?;

        Ok(Pipeline {
            tokenizer,
            encoder,
            pooler: self.pooler,
        })
    }
}

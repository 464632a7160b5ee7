use displaydoc::Display;
use log::trace;
use ndarray::s;
use sembed_tokenizer::TaskError;
use thiserror::Error;

use crate::{
    model::{Encoder, ModelError},
    pooler::{Embedding1, Embedding2, MeanPooler, PoolerError},
    tokenizer::{Encodings, Tokenizer},
};

/// A pipeline for a sentence embedding model.
///
/// Can be created via the [`Builder`] and consists of a tokenizer, an encoder and a pooler.
///
/// [`Builder`]: crate::Builder
pub struct Pipeline<E> {
    pub(crate) tokenizer: Tokenizer,
    pub(crate) encoder: E,
    pub(crate) pooler: MeanPooler,
}

/// The potential errors of the [`Pipeline`].
#[derive(Debug, Display, Error)]
pub enum PipelineError {
    /// Failed to run the encoder: {0}
    Model(#[from] ModelError),
    /// Failed to run the pooler: {0}
    Pooler(#[from] PoolerError),
}

impl<E> Pipeline<E>
where
    E: Encoder,
{
    /// Computes the embedding of the sequence.
    pub fn run(&self, sequence: impl AsRef<str>) -> Result<Embedding1, PipelineError> {
        let encodings = self.tokenizer.encode(sequence);
        let embeddings = self.embed(encodings)?;

        Ok(embeddings.slice(s![0, ..]).to_owned().into())
    }

    /// Computes the embeddings of the sequences.
    ///
    /// The embeddings are in the same order as the sequences.
    pub fn run_batch<S>(&self, sequences: &[S]) -> Result<Embedding2, PipelineError>
    where
        S: AsRef<str> + Sync,
    {
        let encodings = self.tokenizer.encode_batch(sequences);
        self.embed(encodings)
    }

    fn embed(&self, encodings: Encodings) -> Result<Embedding2, PipelineError> {
        trace!("Embedding the encodings {:?}", encodings.token_ids.0);
        let prediction = self.encoder.predict(&encodings)?;
        self.pooler
            .pool(prediction.view(), encodings.attention_masks.view())
            .map_err(Into::into)
    }
}

impl<E> Pipeline<E> {
    /// Gets the index of the task.
    ///
    /// # Errors
    /// Fails if the task is unknown to the model configuration.
    pub fn task_id(&self, name: &str) -> Result<usize, TaskError> {
        self.tokenizer.inner().task_id(name)
    }

    /// Gets the index of the task or `0` if the task is unknown.
    pub fn task_id_or_default(&self, name: &str) -> usize {
        self.tokenizer.inner().task_id_or_default(name)
    }

    /// Gets the tokenizer.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Gets the encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Gets the token size, if any.
    pub fn token_size(&self) -> Option<usize> {
        self.tokenizer.token_size()
    }
}

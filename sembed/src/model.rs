use std::{
    fs::File,
    io::{BufReader, Error as IoError, Read},
    path::Path,
};

use derive_more::{Deref, From};
use displaydoc::Display;
use log::debug;
use ndarray::{concatenate, Array2, Array3, ArrayView3, Axis, Ix3, ShapeError};
use thiserror::Error;
use tract_onnx::prelude::{
    tvec,
    Datum,
    Framework,
    InferenceFact,
    InferenceModelExt,
    Tensor,
    TractError,
    TypedModel,
    TypedSimplePlan,
};

use crate::tokenizer::Encodings;

/// The potential errors of the model.
#[derive(Debug, Display, Error)]
pub enum ModelError {
    /// Failed to read the onnx model: {0}
    Read(#[from] IoError),
    /// Failed to run a tract operation: {0}
    Tract(#[from] TractError),
    /// Invalid onnx model shapes
    Shape,
    /// Invalid prediction shape: {0}
    Prediction(#[from] ShapeError),
}

/// The predicted token embeddings of shape `[batch, tokens, embedding]`.
#[derive(Clone, Debug, Deref, From)]
pub struct Prediction(pub Array3<f32>);

/// An encoder which embeds the tokens of encoded sequences.
///
/// The encoder is an opaque function of the token ids, attention masks and type ids, e.g. a neural
/// network executed by an inference engine.
pub trait Encoder {
    /// Predicts the token embeddings of the encoded sequences.
    ///
    /// The prediction must keep the batch order and the number of tokens of the encodings.
    fn predict(&self, encodings: &Encodings) -> Result<Prediction, ModelError>;

    /// Gets the fixed number of tokens per sequence, if the encoder requires one.
    fn token_size(&self) -> Option<usize> {
        None
    }
}

/// A wrapped onnx model.
///
/// The model has the inputs `input_ids`, `attention_mask` and `token_type_ids` of shape
/// `[1, tokens]` and runs once per sequence of a batch.
pub struct OnnxEncoder {
    plan: TypedSimplePlan<TypedModel>,
    token_size: usize,
    embedding_size: usize,
}

impl OnnxEncoder {
    /// Creates a model from an onnx model file.
    pub fn from_file(model: impl AsRef<Path>, token_size: usize) -> Result<Self, ModelError> {
        Self::new(BufReader::new(File::open(model)?), token_size)
    }

    /// Creates a model from an onnx model.
    ///
    /// Requires the token size of the model inputs.
    pub fn new(mut model: impl Read, token_size: usize) -> Result<Self, ModelError> {
        let input_fact = InferenceFact::dt_shape(i64::datum_type(), &[1, token_size]);
        let plan = tract_onnx::onnx()
            .model_for_read(&mut model)?
            .with_input_fact(0, input_fact.clone())?
            .with_input_fact(1, input_fact.clone())?
            .with_input_fact(2, input_fact)?
            .into_optimized()?
            .into_runnable()?;

        let embedding_size = match plan.model().output_fact(0)?.shape.as_concrete() {
            Some(&[1, tokens, embedding]) if tokens == token_size => embedding,
            _ => return Err(ModelError::Shape),
        };
        debug!(
            "Loaded an onnx model with token size {} and embedding size {}",
            token_size, embedding_size,
        );

        Ok(Self {
            plan,
            token_size,
            embedding_size,
        })
    }

    /// Gets the embedding size of the model.
    pub fn embedding_size(&self) -> usize {
        self.embedding_size
    }

    /// Runs the model on a single encoded sequence.
    fn predict_sequence(
        &self,
        encodings: &Encodings,
        index: usize,
    ) -> Result<Array3<f32>, ModelError> {
        let inputs = tvec!(
            Tensor::from(sequence_input(&encodings.token_ids, index)),
            Tensor::from(sequence_input(&encodings.attention_masks, index)),
            Tensor::from(sequence_input(&encodings.type_ids, index))
        );
        let outputs = self.plan.run(inputs)?;
        let prediction = outputs
            .get(0)
            .ok_or(ModelError::Shape)?
            .to_array_view::<f32>()?
            .into_dimensionality::<Ix3>()?
            .to_owned();

        Ok(prediction)
    }
}

impl Encoder for OnnxEncoder {
    fn predict(&self, encodings: &Encodings) -> Result<Prediction, ModelError> {
        if encodings.token_ids.ncols() != self.token_size {
            return Err(ModelError::Shape);
        }
        let predictions = (0..encodings.token_ids.nrows())
            .map(|index| self.predict_sequence(encodings, index))
            .collect::<Result<Vec<_>, _>>()?;

        concatenate_predictions(&predictions, self.token_size, self.embedding_size).map(Into::into)
    }

    fn token_size(&self) -> Option<usize> {
        Some(self.token_size)
    }
}

/// Slices the sequence at the index out of the batch as a batch of shape `[1, tokens]`.
fn sequence_input(batch: &Array2<i64>, index: usize) -> Array2<i64> {
    batch
        .index_axis(Axis(0), index)
        .insert_axis(Axis(0))
        .to_owned()
}

/// Concatenates the single sequence predictions in order.
///
/// Each prediction must be of shape `[1, token_size, embedding_size]`.
fn concatenate_predictions(
    predictions: &[Array3<f32>],
    token_size: usize,
    embedding_size: usize,
) -> Result<Array3<f32>, ModelError> {
    if predictions
        .iter()
        .any(|prediction| prediction.shape() != [1, token_size, embedding_size])
    {
        return Err(ModelError::Shape);
    }
    if predictions.is_empty() {
        return Ok(Array3::zeros((0, token_size, embedding_size)));
    }
    let views = predictions
        .iter()
        .map(Array3::view)
        .collect::<Vec<ArrayView3<f32>>>();

    concatenate(Axis(0), &views).map_err(Into::into)
}

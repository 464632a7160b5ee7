use derive_more::{Deref, From};
use displaydoc::Display;
use float_cmp::{ApproxEq, F32Margin};
use log::warn;
use ndarray::{
    Array,
    Array1,
    Array2,
    ArrayBase,
    ArrayView2,
    ArrayView3,
    Axis,
    Data,
    Dimension,
    Ix1,
    Ix2,
    ShapeError,
    Zip,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The floor of the number of active tokens during mean pooling.
pub const EPSILON: f32 = 1e-9;

/// A d-dimensional sequence embedding.
#[derive(Clone, Debug, Deref, From, Serialize, Deserialize)]
pub struct Embedding<D>(Array<f32, D>)
where
    D: Dimension;

/// A 1-dimensional sequence embedding.
pub type Embedding1 = Embedding<Ix1>;

/// A 2-dimensional sequence embedding, one row per sequence.
pub type Embedding2 = Embedding<Ix2>;

impl<D> Embedding<D>
where
    D: Dimension,
{
    /// Unwraps the embedding.
    pub fn into_inner(self) -> Array<f32, D> {
        self.0
    }
}

impl<S, D> PartialEq<ArrayBase<S, D>> for Embedding<D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    fn eq(&self, other: &ArrayBase<S, D>) -> bool {
        if self.shape() != other.shape() {
            return false;
        }

        let margin = F32Margin::default();
        Zip::from(&self.0)
            .and(other)
            .all(|this, other| (*this).approx_eq(*other, margin))
    }
}

impl<S, D> PartialEq<Embedding<D>> for ArrayBase<S, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    fn eq(&self, other: &Embedding<D>) -> bool {
        other.eq(self)
    }
}

impl<D> PartialEq for Embedding<D>
where
    D: Dimension,
{
    fn eq(&self, other: &Self) -> bool {
        self.eq(&other.0)
    }
}

/// The potential errors of the pooler.
#[derive(Debug, Display, Error)]
pub enum PoolerError {
    /// Mismatching prediction shape {prediction:?} and attention masks shape {masks:?}
    Mismatch {
        prediction: Vec<usize>,
        masks: Vec<usize>,
    },
    /// Invalid input shape: {0}
    Shape(#[from] ShapeError),
}

/// A masked mean pooling strategy with subsequent L2 normalization.
///
/// The predicted token embeddings are averaged over the active tokens, where the number of active
/// tokens is floored by [`EPSILON`]. By default the L2 norm is not floored, a pooled embedding of
/// zeros therefore normalizes to `NaN`s. The [`floored()`] pooler floors the norm as well and
/// normalizes such an embedding to zeros instead.
///
/// [`floored()`]: MeanPooler::floored
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeanPooler {
    floored: bool,
}

impl MeanPooler {
    /// Creates a mean pooler which floors the L2 norm by [`EPSILON`].
    pub fn floored() -> Self {
        Self { floored: true }
    }

    /// Pools the prediction over its averaged, active tokens and normalizes the averages.
    ///
    /// The prediction is of shape `[batch, tokens, embedding]` and the attention masks are of shape
    /// `[batch, tokens]`.
    pub fn pool(
        &self,
        prediction: ArrayView3<f32>,
        attention_masks: ArrayView2<i64>,
    ) -> Result<Embedding2, PoolerError> {
        let mut embeddings = self.mean(prediction, attention_masks)?;
        for mut embedding in embeddings.outer_iter_mut() {
            let norm = embedding.dot(&embedding).sqrt();
            let norm = if self.floored { norm.max(EPSILON) } else { norm };
            if norm <= EPSILON {
                warn!("Normalizing a degenerate embedding with norm {}", norm);
            }
            embedding.mapv_inplace(|value| value / norm);
        }

        Ok(embeddings.into())
    }

    /// Averages the prediction over its active tokens.
    fn mean(
        &self,
        prediction: ArrayView3<f32>,
        attention_masks: ArrayView2<i64>,
    ) -> Result<Array2<f32>, PoolerError> {
        if prediction.shape()[..2] != *attention_masks.shape() {
            return Err(PoolerError::Mismatch {
                prediction: prediction.shape().to_vec(),
                masks: attention_masks.shape().to_vec(),
            });
        }

        let mut means = Array2::zeros((prediction.len_of(Axis(0)), prediction.len_of(Axis(2))));
        Zip::from(means.outer_iter_mut())
            .and(prediction.outer_iter())
            .and(attention_masks.outer_iter())
            .for_each(|mut mean, prediction, attention_mask| {
                let attention_mask: Array1<f32> = attention_mask.mapv(|mask| mask as f32);
                let count = attention_mask.sum().max(EPSILON);
                mean.assign(&(attention_mask.dot(&prediction) / count));
            });

        Ok(means)
    }
}

/// Pools and normalizes the flattened prediction of shape `[batch, tokens, embedding]` with the
/// flattened attention masks of shape `[batch, tokens]`.
///
/// Returns one embedding per sequence of the batch in the same order.
pub fn pool_and_normalize(
    prediction: &[f32],
    attention_masks: &[i64],
    batch_size: usize,
    token_size: usize,
    embedding_size: usize,
) -> Result<Vec<Vec<f32>>, PoolerError> {
    let prediction = ArrayView3::from_shape((batch_size, token_size, embedding_size), prediction)?;
    let attention_masks = ArrayView2::from_shape((batch_size, token_size), attention_masks)?;
    let embeddings = MeanPooler::default().pool(prediction, attention_masks)?;

    Ok(embeddings
        .outer_iter()
        .map(|embedding| embedding.to_vec())
        .collect())
}

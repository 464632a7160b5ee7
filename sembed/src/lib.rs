#![cfg_attr(doc, forbid(broken_intra_doc_links, private_intra_doc_links))]
//! The sembed pipeline computes sentence embeddings of sequences.
//!
//! Sequences are anything string-like. They are tokenized into subword ids, embedded token-wise by
//! an [`Encoder`], averaged over their active tokens and L2 normalized. The embeddings are
//! f32-arrays of the embedding size of the encoder.
//!
//! ```no_run
//! use sembed::{Builder, MeanPooler, OnnxEncoder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let encoder = OnnxEncoder::from_file("model.onnx", 64)?;
//!     let size = encoder.embedding_size();
//!     let pipeline = Builder::from_files("tokenizer.json", "config.json")?
//!         .with_lowercase(true)
//!         .with_pooler(MeanPooler::default())
//!         .build(encoder)?;
//!
//!     let embedding = pipeline.run("This is a sequence.")?;
//!     assert_eq!(embedding.shape(), [size]);
//!     let task = pipeline.task_id("retrieval.query")?;
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod model;
mod pipeline;
mod pooler;
mod tokenizer;

pub use ndarray;
pub use sembed_tokenizer::{Family, TaskError};

pub use crate::{
    builder::{Builder, BuilderError},
    model::{Encoder, ModelError, OnnxEncoder, Prediction},
    pipeline::{Pipeline, PipelineError},
    pooler::{
        pool_and_normalize,
        Embedding,
        Embedding1,
        Embedding2,
        MeanPooler,
        PoolerError,
        EPSILON,
    },
    tokenizer::{AttentionMasks, Encodings, TokenIds, Tokenizer, TokenizerError, TypeIds},
};

#![cfg_attr(doc, forbid(broken_intra_doc_links, private_intra_doc_links))]
//! A subword tokenizer which converts sequences into encodings for sentence embedding models.
//!
//! The tokenizer is loaded from a tokenizer description (`tokenizer.json`) and a model
//! configuration (`config.json`) and consists of a normalizer, a pre-tokenizer, a subword model,
//! a post-tokenizer and a decoder. The encodings can be of any numerical data type which
//! implements `Num + From<u32> + Copy`.
//!
//! Two encoder families are supported:
//! - [`Family::Unigram`]: Units of word characters are marked with a word boundary marker and are
//!   greedily segmented into the longest matching subwords of the vocabulary. Sequences are
//!   wrapped in `<s>` and `</s>`.
//! - [`Family::WordLevel`]: Lowercased words are taken verbatim as tokens. Sequences are wrapped in
//!   `[CLS]` and `[SEP]`.
//!
//! Tokenization never fails, anything missing from the vocabulary is mapped to the unknown token.
//!
//! ```no_run
//! use sembed_tokenizer::{Builder, Family};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokenizer = Builder::<i64>::from_files("tokenizer.json", "config.json")?
//!         .with_family(Family::Unigram)
//!         .with_lowercase(true)
//!         .build()?;
//!
//!     let encoding = tokenizer.encode("This is a sequence.");
//!     assert_eq!(encoding.len(), encoding.attention_mask().len());
//!     let decoded = tokenizer.decode(encoding.ids());
//!     let task = tokenizer.task_id("retrieval.query")?;
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod config;
mod decoder;
mod encoding;
mod family;
mod model;
mod normalizer;
mod post_tokenizer;
mod pre_tokenizer;
mod special_tokens;
mod tokenizer;
mod vocab;

pub use crate::{
    builder::{Builder, BuilderError},
    config::{ModelConfig, TaskError},
    encoding::Encoding,
    family::Family,
    pre_tokenizer::MARKER,
    special_tokens::{SpecialToken, SpecialTokens},
    tokenizer::Tokenizer,
    vocab::{LoadError, Vocab},
};

/// A stack allocated string with a maximum length of eight bytes.
type SmallString = smallstr::SmallString<[u8; 8]>;

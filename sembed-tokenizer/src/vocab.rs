use std::{collections::HashMap, io::Error as IoError};

use displaydoc::Display;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Error as JsonError;
use thiserror::Error;

use crate::family::Family;

/// The potential errors of loading the tokenizer documents.
#[derive(Debug, Display, Error)]
pub enum LoadError {
    /// Failed to read a document: {0}
    Read(#[from] IoError),
    /// Failed to parse the tokenizer description: {0}
    Tokenizer(#[source] JsonError),
    /// Failed to parse the model configuration: {0}
    Config(#[source] JsonError),
}

/// The relevant parts of a tokenizer description.
#[derive(Deserialize)]
pub(crate) struct TokenizerDocument {
    #[serde(default)]
    model: ModelSection,
    #[serde(default)]
    added_tokens: Vec<AddedToken>,
}

#[derive(Default, Deserialize)]
struct ModelSection {
    #[serde(rename = "type")]
    kind: Option<String>,
    vocab: Option<VocabShape>,
}

/// The shapes in which a vocabulary can be stored.
#[derive(Deserialize)]
#[serde(untagged)]
enum VocabShape {
    /// Tokens mapped to their ids, which may be stored as integral floats.
    Mapping(HashMap<String, f64>),
    /// Tokens with their scores, the position in the list is the id.
    Scored(Vec<(String, f64)>),
}

#[derive(Deserialize)]
struct AddedToken {
    id: u32,
    content: String,
    #[serde(default)]
    special: bool,
}

impl TokenizerDocument {
    /// Parses the tokenizer description.
    pub(crate) fn parse(document: &[u8]) -> Result<Self, LoadError> {
        serde_json::from_slice(document).map_err(LoadError::Tokenizer)
    }

    /// Infers the encoder family from the model type or else from the vocabulary shape.
    pub(crate) fn family(&self) -> Family {
        match (self.model.kind.as_deref(), &self.model.vocab) {
            (Some(kind), _) => Family::from_model_type(kind),
            (None, Some(VocabShape::Mapping(_))) => Family::WordLevel,
            (None, Some(VocabShape::Scored(_))) | (None, None) => Family::Unigram,
        }
    }
}

/// An added token.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Added {
    id: u32,
    special: bool,
}

/// A bidirectional vocabulary together with its added tokens.
///
/// The vocabulary is immutable once it is loaded and can be shared between threads.
#[derive(Debug, Default)]
pub struct Vocab {
    tokens: HashMap<String, u32>,
    ids: HashMap<u32, String>,
    added: HashMap<String, Added>,
    added_ids: HashMap<u32, String>,
}

impl From<TokenizerDocument> for Vocab {
    fn from(document: TokenizerDocument) -> Self {
        let mut vocab = Vocab::default();

        match document.model.vocab {
            Some(VocabShape::Mapping(tokens)) => {
                for (token, id) in tokens {
                    match to_id(id) {
                        Some(id) => vocab.insert(token, id),
                        None => warn!("Skipped the token {:?} with the invalid id {}", token, id),
                    }
                }
            }
            Some(VocabShape::Scored(tokens)) => {
                for (id, (token, _score)) in tokens.into_iter().enumerate() {
                    vocab.insert(token, id as u32);
                }
            }
            None => warn!("The tokenizer description has no vocabulary"),
        }

        for token in document.added_tokens {
            vocab.added_ids.insert(token.id, token.content.clone());
            vocab.added.insert(
                token.content,
                Added {
                    id: token.id,
                    special: token.special,
                },
            );
        }

        debug!(
            "Loaded a vocabulary of {} tokens and {} added tokens",
            vocab.len(),
            vocab.added.len(),
        );
        vocab
    }
}

/// Converts a non-negative integral number into an id.
fn to_id(id: f64) -> Option<u32> {
    (id >= 0. && id.fract() == 0. && id <= f64::from(u32::MAX)).then(|| id as u32)
}

impl Vocab {
    /// Inserts a token while keeping the mapping a bijection.
    fn insert(&mut self, token: String, id: u32) {
        if self.tokens.contains_key(&token) {
            warn!("Skipped the duplicated token {:?}", token);
            return;
        }
        if let Some(existing) = self.ids.get(&id) {
            warn!("The tokens {:?} and {:?} share the id {}", token, existing, id);
            // keep the smallest token to be independent of the order of the document's mapping
            if token >= *existing {
                return;
            }
            self.tokens.remove(existing);
        }
        self.ids.insert(id, token.clone());
        self.tokens.insert(token, id);
    }

    /// Gets the number of tokens in the vocabulary, without the added tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Checks whether the vocabulary is empty, without the added tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Gets the number of added tokens.
    pub fn added_len(&self) -> usize {
        self.added.len()
    }

    /// Gets the id of a token of the vocabulary.
    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.tokens.get(token).copied()
    }

    /// Gets the id of an added token.
    pub fn added_token_to_id(&self, token: &str) -> Option<u32> {
        self.added.get(token).map(|added| added.id)
    }

    /// Resolves the id of a token, first from the vocabulary and then from the added tokens.
    pub fn resolve(&self, token: &str) -> Option<u32> {
        self.token_to_id(token).or_else(|| self.added_token_to_id(token))
    }

    /// Gets the token of an id, first from the vocabulary and then from the added tokens.
    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.ids
            .get(&id)
            .or_else(|| self.added_ids.get(&id))
            .map(String::as_str)
    }

    /// Checks whether the token is part of the vocabulary, without the added tokens.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    /// Checks whether the token is an added token flagged as special.
    pub fn is_special(&self, token: &str) -> bool {
        self.added.get(token).map_or(false, |added| added.special)
    }

    /// Gets the byte length of the longest added token the sequence starts with.
    pub(crate) fn added_prefix(&self, sequence: &str) -> Option<usize> {
        self.added
            .keys()
            .filter(|token| !token.is_empty() && sequence.starts_with(token.as_str()))
            .map(String::len)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(document: &str) -> Vocab {
        TokenizerDocument::parse(document.as_bytes()).unwrap().into()
    }

    #[test]
    fn test_mapping() {
        let vocab = load(
            r#"{
                "model": { "type": "WordPiece", "vocab": { "[UNK]": 0, "hello": 1, "world": 2 } },
                "added_tokens": []
            }"#,
        );
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.token_to_id("hello"), Some(1));
        assert_eq!(vocab.id_to_token(2), Some("world"));
        assert_eq!(vocab.token_to_id("missing"), None);
        assert_eq!(vocab.id_to_token(3), None);
    }

    #[test]
    fn test_mapping_float_ids() {
        let vocab = load(r#"{ "model": { "vocab": { "a": 0.0, "b": 1.0, "c": 2 } } }"#);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.token_to_id("b"), Some(1));
        assert_eq!(vocab.id_to_token(2), Some("c"));

        let vocab = load(r#"{ "model": { "vocab": { "a": 0, "b": -1.0, "c": 2.5, "d": 1e12 } } }"#);
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.token_to_id("a"), Some(0));
        assert_eq!(vocab.token_to_id("b"), None);
        assert_eq!(vocab.token_to_id("c"), None);
        assert_eq!(vocab.token_to_id("d"), None);
    }

    #[test]
    fn test_scored() {
        let vocab = load(
            r#"{
                "model": { "type": "Unigram", "vocab": [["<s>", 0.0], ["▁hi", -3.5], ["!", -7.25]] }
            }"#,
        );
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.token_to_id("<s>"), Some(0));
        assert_eq!(vocab.token_to_id("\u{2581}hi"), Some(1));
        assert_eq!(vocab.id_to_token(2), Some("!"));
    }

    #[test]
    fn test_forward_and_reverse_agree() {
        let vocab = load(r#"{ "model": { "vocab": [["a", 0.0], ["b", 0.0], ["c", 0.0]] } }"#);
        for token in ["a", "b", "c"] {
            let id = vocab.token_to_id(token).unwrap();
            assert_eq!(vocab.id_to_token(id), Some(token));
        }
    }

    #[test]
    fn test_duplicates() {
        let vocab = load(r#"{ "model": { "vocab": [["a", 0.0], ["b", 0.0], ["a", 0.0]] } }"#);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.token_to_id("a"), Some(0));
        assert_eq!(vocab.id_to_token(2), None);

        let vocab = load(r#"{ "model": { "vocab": { "b": 0, "a": 0 } } }"#);
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.token_to_id("a"), Some(0));
        assert_eq!(vocab.id_to_token(0), Some("a"));
    }

    #[test]
    fn test_missing_vocab() {
        let vocab = load(r#"{ "model": { "type": "Unigram" } }"#);
        assert!(vocab.is_empty());

        let vocab = load("{}");
        assert!(vocab.is_empty());
        assert_eq!(vocab.added_len(), 0);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            TokenizerDocument::parse(b"{ \"model\": "),
            Err(LoadError::Tokenizer(_)),
        ));
        assert!(matches!(
            TokenizerDocument::parse(br#"{ "model": { "vocab": 42 } }"#),
            Err(LoadError::Tokenizer(_)),
        ));
        assert!(matches!(
            TokenizerDocument::parse(br#"{ "added_tokens": [{ "content": "<s>" }] }"#),
            Err(LoadError::Tokenizer(_)),
        ));
    }

    #[test]
    fn test_added_tokens() {
        let vocab = load(
            r#"{
                "model": { "vocab": [["hi", 0.0]] },
                "added_tokens": [
                    { "id": 7, "content": "<mask>", "special": true },
                    { "id": 8, "content": "<mask2>", "special": false }
                ]
            }"#,
        );
        assert_eq!(vocab.added_len(), 2);
        assert_eq!(vocab.token_to_id("<mask>"), None);
        assert_eq!(vocab.added_token_to_id("<mask>"), Some(7));
        assert_eq!(vocab.resolve("<mask>"), Some(7));
        assert_eq!(vocab.resolve("hi"), Some(0));
        assert_eq!(vocab.id_to_token(7), Some("<mask>"));
        assert!(vocab.is_special("<mask>"));
        assert!(!vocab.is_special("<mask2>"));
        assert!(!vocab.is_special("hi"));
        assert_eq!(vocab.added_prefix("<mask2>x"), Some(7));
        assert_eq!(vocab.added_prefix("<mask>x"), Some(6));
        assert_eq!(vocab.added_prefix("x<mask>"), None);
    }

    #[test]
    fn test_family() {
        let family = |document: &str| {
            TokenizerDocument::parse(document.as_bytes())
                .unwrap()
                .family()
        };
        assert_eq!(family(r#"{ "model": { "type": "Unigram" } }"#), Family::Unigram);
        assert_eq!(family(r#"{ "model": { "type": "WordPiece" } }"#), Family::WordLevel);
        assert_eq!(family(r#"{ "model": { "vocab": { "a": 0 } } }"#), Family::WordLevel);
        assert_eq!(family(r#"{ "model": { "vocab": [["a", 0.0]] } }"#), Family::Unigram);
        assert_eq!(family("{}"), Family::Unigram);
    }
}

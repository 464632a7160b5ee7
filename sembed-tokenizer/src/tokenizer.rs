use std::marker::PhantomData;

use log::trace;
use num_traits::{Num, ToPrimitive};

use crate::{
    config::{ModelConfig, TaskError},
    decoder::Decoder,
    encoding::Encoding,
    family::Family,
    model::Model,
    normalizer::Normalizer,
    post_tokenizer::PostTokenizer,
    pre_tokenizer::PreTokenizer,
    special_tokens::SpecialTokens,
    vocab::Vocab,
};

/// A subword tokenizer.
///
/// Can be created via the [`Builder`] and consists of a normalizer, a pre-tokenizer, a subword
/// model, a post-tokenizer and a decoder which are selected by the encoder [`Family`].
///
/// The tokenizer is immutable and can be shared between threads.
///
/// [`Builder`]: crate::Builder
#[derive(Debug)]
pub struct Tokenizer<N> {
    pub(crate) vocab: Vocab,
    pub(crate) config: ModelConfig,
    pub(crate) family: Family,
    pub(crate) special_tokens: SpecialTokens,
    pub(crate) normalizer: Normalizer,
    pub(crate) pre_tokenizer: PreTokenizer,
    pub(crate) model: Model,
    pub(crate) post_tokenizer: PostTokenizer,
    pub(crate) decoder: Decoder,
    pub(crate) _ids: PhantomData<N>,
}

impl<N> Tokenizer<N> {
    /// Encodes the sequence.
    ///
    /// The encoding always starts with the begin token and ends with the end token. Anything which
    /// can't be resolved is encoded as the unknown token.
    pub fn encode(&self, sequence: impl AsRef<str>) -> Encoding<N>
    where
        N: Num + From<u32> + Copy,
    {
        let sequence = self.normalizer.normalize(sequence.as_ref());
        let unk = self.special_tokens.unknown().content();
        let tokens = self
            .pre_tokenizer
            .pre_tokenize(sequence.as_ref())
            .iter()
            .flat_map(|unit| self.model.segment(unit, &self.vocab, unk))
            .collect::<Vec<_>>();
        trace!("Tokenized {:?} into {:?}", sequence, tokens);

        self.post_tokenizer.post_tokenize(tokens, &self.vocab)
    }

    /// Encodes the sequences in order.
    pub fn encode_batch(&self, sequences: &[impl AsRef<str>]) -> Vec<Encoding<N>>
    where
        N: Num + From<u32> + Copy,
    {
        sequences
            .iter()
            .map(|sequence| self.encode(sequence))
            .collect()
    }

    /// Decodes the ids.
    ///
    /// Ids which can't be resolved are decoded as the unknown token and the begin and end tokens
    /// are removed.
    pub fn decode(&self, ids: &[N]) -> String
    where
        N: ToPrimitive,
    {
        self.decoder.decode(ids, &self.vocab, &self.special_tokens)
    }

    /// Gets the index of the task.
    ///
    /// # Errors
    /// Fails if the task is not part of the task list of the model configuration.
    pub fn task_id(&self, name: &str) -> Result<usize, TaskError> {
        self.config.task_id(name)
    }

    /// Gets the index of the task or `0` if the task is unknown.
    pub fn task_id_or_default(&self, name: &str) -> usize {
        self.config.task_id_or_default(name)
    }

    /// Gets the special tokens.
    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    /// Gets the vocabulary.
    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    /// Gets the model configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Gets the encoder family.
    pub fn family(&self) -> Family {
        self.family
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    const APPLE: &str = r#"{
        "model": {
            "type": "Unigram",
            "vocab": { "▁this": 5, "▁is": 6, "▁an": 7, "▁apple": 8, "<s>": 0, "</s>": 1, "<unk>": 3 }
        }
    }"#;

    const NO_APPLE: &str = r#"{
        "model": {
            "type": "Unigram",
            "vocab": { "▁this": 5, "▁is": 6, "▁an": 7, "<s>": 0, "</s>": 1, "<unk>": 3, "▁a": 9, "pp": 10 }
        }
    }"#;

    const WORDS: &str = r#"{
        "model": {
            "type": "WordLevel",
            "vocab": { "[PAD]": 0, "[UNK]": 100, "[CLS]": 101, "[SEP]": 102, "this": 5, "is": 6, "an": 7, "apple": 8 }
        }
    }"#;

    const CONFIG: &str = r#"{ "lora_adaptations": ["retrieval.query", "retrieval.passage"] }"#;

    fn tokenizer(document: &str) -> Tokenizer<i64> {
        Builder::new(document.as_bytes(), CONFIG.as_bytes())
            .unwrap()
            .with_lowercase(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_encode() {
        let encoding = tokenizer(APPLE).encode("This is an apple");
        assert_eq!(encoding.ids(), [0, 5, 6, 7, 8, 1]);
        assert_eq!(encoding.attention_mask(), [1, 1, 1, 1, 1, 1]);
        assert_eq!(encoding.type_ids(), [0, 0, 0, 0, 0, 0]);
        assert_eq!(
            encoding.tokens(),
            ["<s>", "▁this", "▁is", "▁an", "▁apple", "</s>"],
        );
        assert_eq!(encoding.special_tokens_mask(), [1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_encode_empty() {
        let tokenizer = tokenizer(APPLE);
        for sequence in ["", "   ", "\t\n"] {
            let encoding = tokenizer.encode(sequence);
            assert_eq!(encoding.ids(), [0, 1]);
            assert_eq!(encoding.attention_mask(), [1, 1]);
        }
    }

    #[test]
    fn test_encode_fallback() {
        let encoding = tokenizer(NO_APPLE).encode("This is an apple");
        assert_eq!(encoding.ids(), [0, 5, 6, 7, 9, 10, 3, 3, 1]);
        assert_eq!(encoding.attention_mask(), [1; 9]);

        let encoding = tokenizer(APPLE).encode("This is an apple, 日本!");
        assert_eq!(encoding.ids(), [0, 5, 6, 7, 8, 3, 3, 3, 3, 3, 1]);
    }

    #[test]
    fn test_encode_added_tokens() {
        let tokenizer = Builder::<i64>::new(
            r#"{
                "model": {
                    "type": "Unigram",
                    "vocab": { "<s>": 0, "</s>": 1, "<unk>": 3, "▁thistle": 11, "istle": 12 }
                },
                "added_tokens": [{ "id": 20, "content": "▁th", "special": false }]
            }"#
            .as_bytes(),
            CONFIG.as_bytes(),
        )
        .unwrap()
        .build()
        .unwrap();
        let encoding = tokenizer.encode("thistle");
        assert_eq!(encoding.ids(), [0, 20, 12, 1]);
        assert_eq!(encoding.tokens(), ["<s>", "▁th", "istle", "</s>"]);
        assert_eq!(encoding.special_tokens_mask(), [1, 0, 0, 1]);
    }

    #[test]
    fn test_encode_lengths() {
        let tokenizer = tokenizer(NO_APPLE);
        for sequence in [
            "This is an apple",
            "Crème brûlée!",
            "   leading and trailing   ",
            "?!",
            "<s> </s>",
        ] {
            let encoding = tokenizer.encode(sequence);
            assert!(!encoding.is_empty());
            assert_eq!(encoding.len(), encoding.attention_mask().len());
            assert_eq!(encoding.len(), encoding.type_ids().len());
            assert_eq!(encoding.len(), encoding.tokens().len());
            assert_eq!(encoding.len(), encoding.special_tokens_mask().len());
            assert_eq!(encoding.ids().first(), Some(&0));
            assert_eq!(encoding.ids().last(), Some(&1));
        }
    }

    #[test]
    fn test_encode_case_sensitive() {
        let tokenizer = Builder::<i64>::new(APPLE.as_bytes(), CONFIG.as_bytes())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(tokenizer.encode("this is").ids(), [0, 5, 6, 1]);
        assert_eq!(tokenizer.encode("This").ids(), [0, 3, 3, 3, 3, 3, 1]);
    }

    #[test]
    fn test_encode_batch() {
        let tokenizer = tokenizer(APPLE);
        let encodings = tokenizer.encode_batch(&["this", "", "an apple"]);
        assert_eq!(encodings.len(), 3);
        assert_eq!(encodings[0].ids(), [0, 5, 1]);
        assert_eq!(encodings[1].ids(), [0, 1]);
        assert_eq!(encodings[2].ids(), [0, 7, 8, 1]);
    }

    #[test]
    fn test_decode() {
        let tokenizer = tokenizer(APPLE);
        let encoding = tokenizer.encode("  This is\tan   APPLE ");
        assert_eq!(tokenizer.decode(encoding.ids()), "this is an apple");
    }

    #[test]
    fn test_word_level() {
        let tokenizer = tokenizer(WORDS);
        assert_eq!(tokenizer.family(), Family::WordLevel);

        let encoding = tokenizer.encode("This is an Apple pie");
        assert_eq!(encoding.ids(), [101, 5, 6, 7, 8, 100, 102]);
        assert_eq!(encoding.attention_mask(), [1; 7]);
        assert_eq!(tokenizer.decode(encoding.ids()), "this is an apple [UNK]");
        assert_eq!(tokenizer.encode("").ids(), [101, 102]);
    }

    #[test]
    fn test_word_level_lowercase_by_default() {
        let tokenizer = Builder::<i64>::new(WORDS.as_bytes(), CONFIG.as_bytes())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(tokenizer.encode("THIS apple").ids(), [101, 5, 8, 102]);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tokenizer<i64>>();
        assert_send_sync::<Tokenizer<u32>>();
    }

    #[test]
    fn test_task_id() {
        let tokenizer = tokenizer(APPLE);
        assert_eq!(tokenizer.task_id("retrieval.passage").unwrap(), 1);
        assert_eq!(
            tokenizer.task_id("separation").unwrap_err(),
            TaskError::Unknown("separation".into()),
        );
        assert_eq!(tokenizer.task_id_or_default("separation"), 0);
    }

    #[test]
    fn test_fixtures() {
        let tokenizer = Builder::<i64>::from_files(
            test_utils::tokenizer::unigram().unwrap(),
            test_utils::tokenizer::config().unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(tokenizer.family(), Family::Unigram);
        let encoding = tokenizer.encode("Hello world!");
        let begin = tokenizer.special_tokens().begin().id().map(i64::from);
        assert_eq!(encoding.ids().first().copied(), begin);
        assert_eq!(tokenizer.task_id("retrieval.query").unwrap(), 0);

        let tokenizer = Builder::<u32>::from_files(
            test_utils::tokenizer::word_level().unwrap(),
            test_utils::tokenizer::config().unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(tokenizer.family(), Family::WordLevel);
        assert_eq!(tokenizer.encode("Hello World").len(), 4);
    }
}

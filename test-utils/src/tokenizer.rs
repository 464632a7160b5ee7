use std::{io::Result, path::PathBuf};

use crate::resolve_data;

/// Resolves the path to the tokenizer description with a scored vocabulary.
pub fn unigram() -> Result<PathBuf> {
    resolve_data(&["unigram", "tokenizer.json"])
}

/// Resolves the path to the tokenizer description with a mapped vocabulary.
pub fn word_level() -> Result<PathBuf> {
    resolve_data(&["word_level", "tokenizer.json"])
}

/// Resolves the path to the model configuration with the named tasks.
pub fn config() -> Result<PathBuf> {
    resolve_data(&["config.json"])
}

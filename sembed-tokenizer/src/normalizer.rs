use std::borrow::Cow;

/// A normalizer.
///
/// Strips leading and trailing whitespace and optionally lowercases. Accents and compatibility
/// characters are kept as they are.
#[derive(Clone, Debug, Default)]
pub(crate) struct Normalizer {
    lowercase: bool,
}

impl Normalizer {
    pub(crate) fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }

    pub(crate) fn normalize<'s>(&self, sequence: &'s str) -> Cow<'s, str> {
        let sequence = sequence.trim();
        if self.lowercase {
            sequence.to_lowercase().into()
        } else {
            sequence.into()
        }
    }
}

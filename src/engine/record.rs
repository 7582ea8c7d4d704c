//! Result building.
//!
//! Turns an accepted [`Match`] into the owned record handed to callers. All
//! text is copied out of the document so records outlive the sentence that
//! produced them.

use crate::{Doc, RuleSet, Sentence, Token};
use serde::Serialize;

/// An accepted match, in token and byte coordinates.
///
/// Byte offsets slice [`Doc::text`](crate::Doc) directly; [`KeyPhrase::span`]
/// converts them to character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Index of the matching rule in its [`RuleSet`].
    pub rule: usize,
    /// Index of the alternative pattern within that rule.
    pub pattern: usize,
    /// First token of the match.
    pub start: usize,
    /// One past the last token of the match.
    pub end: usize,
    /// Subject token whose window produced the match.
    pub anchor: usize,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Match {
    pub fn label<'r>(&self, rules: &'r RuleSet) -> &'r str {
        rules.rules()[self.rule].label()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One extracted key noun phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeyPhrase<I = String> {
    /// Identifier of the source sentence, as supplied by the caller.
    pub identifier: I,
    /// Label of the rule that matched.
    pub label: String,
    /// Verbatim source text of the match.
    pub phrase: String,
    /// Lower-cased lemmas of the non-punctuation tokens, space-joined.
    pub phrase_normalized: String,
    /// `[start, end)` span in the source text, counted in Unicode scalar
    /// values (characters), not bytes.
    pub span: (usize, usize),
}

pub(crate) fn build<I: Clone>(sentence: &Sentence<I>, rules: &RuleSet, m: &Match) -> KeyPhrase<I> {
    let doc = &sentence.doc;
    KeyPhrase {
        identifier: sentence.id.clone(),
        label: m.label(rules).to_string(),
        phrase: doc.span_text(m.start, m.end).to_string(),
        phrase_normalized: normalize(&doc.tokens[m.start..m.end]),
        span: char_span(&doc.text, m.start_byte, m.end_byte),
    }
}

pub(crate) fn byte_span(doc: &Doc, start: usize, end: usize) -> (usize, usize) {
    (doc.tokens[start].start_char, doc.tokens[end - 1].end_char)
}

/// Byte range → character range over the same text.
pub(crate) fn char_span(text: &str, start_byte: usize, end_byte: usize) -> (usize, usize) {
    let start = text.get(..start_byte).map_or(0, |prefix| prefix.chars().count());
    let len = text.get(start_byte..end_byte).map_or(0, |phrase| phrase.chars().count());
    (start, start + len)
}

pub(crate) fn normalize(tokens: &[Token]) -> String {
    tokens.iter().filter(|t| !t.is_punct).map(|t| t.lemma.to_lowercase()).collect::<Vec<_>>().join(" ")
}

//! Key noun phrase extraction over dependency-parsed text.
//!
//! A *key noun phrase* is a short token span that lives inside the subtree of a
//! clause subject (a `nsubj`/`nsubjpass` token whose head is a verb) and matches
//! one of a set of part-of-speech patterns loaded from configuration.
//!
//! The crate does not parse raw text. A [`DependencyParser`] supplies tokens with
//! tags, lemmas and head indices; the engine locates subjects, limits matching to
//! their subtrees, applies the inclusion policy and yields [`KeyPhrase`] records
//! lazily.
//!
//! ```
//! use keynp::{InclusionMode, RuleSet, Sentence, TokenAnnotation, Doc, sentence_phrases};
//!
//! let rules = RuleSet::from_json_str(
//!     r#"[{"label": "ADJ-NOUN", "pattern": [[{"POS": "ADJ"}, {"POS": "NOUN"}]]}]"#,
//! )
//! .unwrap();
//!
//! let doc = Doc::align(
//!     "The rapid fox runs",
//!     vec![
//!         TokenAnnotation::new("The", "the", "DET", "DT", "det", 2),
//!         TokenAnnotation::new("rapid", "rapid", "ADJ", "JJ", "amod", 2),
//!         TokenAnnotation::new("fox", "fox", "NOUN", "NN", "nsubj", 3),
//!         TokenAnnotation::new("runs", "run", "VERB", "VBZ", "ROOT", 3),
//!     ],
//! )
//! .unwrap();
//! let sentence = Sentence::new("s1", doc);
//!
//! let phrases: Vec<_> = sentence_phrases(&rules, &sentence, InclusionMode::Subtree).collect();
//! assert_eq!(phrases.len(), 1);
//! assert_eq!(phrases[0].phrase, "rapid fox");
//! ```

#[macro_use]
mod macros;
mod api;
mod conllu;
mod engine;
mod error;
mod parser;
mod rules;

pub use api::{
    Extraction, KeyPhraseMatcher, Options, PhraseTable, PhraseTableRow, Phrases, SentencePhrases, extract_parsed,
    sentence_phrases,
};
pub use conllu::ConlluReader;
pub use engine::{ExtractionStats, InclusionMode, KeyPhrase, Match, VerbForm, find_matches};
pub use error::{AlignError, ConfigError, ConlluError, ParseError};
pub use parser::{DependencyParser, Pipe, PretaggedParser, UnknownText};
pub use rules::{Attr, AttrValue, Constraint, Language, Pattern, Rule, RuleSet, RuleSource, Step, UnknownLanguage};

// --- Parsed text ------------------------------------------------------------

/// One token as produced by the parser collaborator.
///
/// The engine treats every field as already correct; nothing here is
/// validated beyond bounds checks on `head`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Verbatim token text.
    pub text: String,
    pub lemma: String,
    /// Coarse part-of-speech tag (UPOS), e.g. `NOUN`.
    pub pos: String,
    /// Fine-grained tag, e.g. `VBG`. Carries verb subtypes for PTB-style tagsets.
    pub tag: String,
    /// Morphological features, e.g. `VerbForm=Part|Tense=Past`. Empty when unknown.
    pub morph: String,
    /// Dependency label relative to `head`.
    pub dep: String,
    /// Index of the syntactic head within the sentence. The root points at itself.
    pub head: usize,
    /// Sentence-relative index of this token.
    pub i: usize,
    /// Start byte offset in the source text (inclusive).
    pub start_char: usize,
    /// End byte offset in the source text (exclusive).
    pub end_char: usize,
    pub is_punct: bool,
}

/// Parser output for one input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc {
    pub text: String,
    pub tokens: Vec<Token>,
}

/// Per-token annotation used to build a [`Doc`] whose offsets are not known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAnnotation {
    pub form: String,
    pub lemma: String,
    pub pos: String,
    pub tag: String,
    pub morph: String,
    pub dep: String,
    pub head: usize,
}

impl TokenAnnotation {
    pub fn new(
        form: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        tag: impl Into<String>,
        dep: impl Into<String>,
        head: usize,
    ) -> Self {
        TokenAnnotation {
            form: form.into(),
            lemma: lemma.into(),
            pos: pos.into(),
            tag: tag.into(),
            morph: String::new(),
            dep: dep.into(),
            head,
        }
    }

    /// Attach a morphological feature string.
    pub fn with_morph(mut self, morph: impl Into<String>) -> Self {
        self.morph = morph.into();
        self
    }
}

impl Doc {
    /// Build a document from tokens that already carry offsets.
    ///
    /// Each token's `i` is reset to its position in `tokens`.
    pub fn new(text: impl Into<String>, mut tokens: Vec<Token>) -> Self {
        for (idx, token) in tokens.iter_mut().enumerate() {
            token.i = idx;
        }
        Doc { text: text.into(), tokens }
    }

    /// Build a document by locating each annotated form in `text`, left to right.
    ///
    /// Whitespace between forms is skipped; any other gap is allowed as long as
    /// the next form is found further on. Punctuation is flagged from `pos == "PUNCT"`.
    ///
    /// ```text
    /// text:   "The rapid fox"
    /// forms:  The   rapid   fox
    /// spans:  0..3  4..9    10..13
    /// ```
    pub fn align(text: impl Into<String>, annotations: Vec<TokenAnnotation>) -> Result<Self, AlignError> {
        let text = text.into();
        let mut tokens = Vec::with_capacity(annotations.len());
        let mut cursor = 0;

        for (i, ann) in annotations.into_iter().enumerate() {
            let offset = text[cursor..].find(ann.form.as_str()).ok_or_else(|| AlignError {
                form: ann.form.clone(),
                index: i,
                offset: cursor,
            })?;
            let start_char = cursor + offset;
            let end_char = start_char + ann.form.len();
            cursor = end_char;

            tokens.push(Token {
                is_punct: ann.pos == "PUNCT",
                text: ann.form,
                lemma: ann.lemma,
                pos: ann.pos,
                tag: ann.tag,
                morph: ann.morph,
                dep: ann.dep,
                head: ann.head,
                i,
                start_char,
                end_char,
            });
        }

        Ok(Doc { text, tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Head of the token at position `idx`, or `None` for the root and
    /// out-of-range heads.
    pub fn head_of(&self, idx: usize) -> Option<&Token> {
        let head = self.tokens.get(idx)?.head;
        if head == idx {
            return None;
        }
        self.tokens.get(head)
    }

    /// Verbatim source text covering tokens `start..end` (end exclusive).
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        match (self.tokens.get(start), end.checked_sub(1).and_then(|last| self.tokens.get(last))) {
            (Some(first), Some(last)) if start < end => {
                self.text.get(first.start_char..last.end_char).unwrap_or("")
            }
            _ => "",
        }
    }
}

/// A parsed text paired with the caller's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<I = String> {
    pub id: I,
    pub doc: Doc,
}

impl<I> Sentence<I> {
    pub fn new(id: I, doc: Doc) -> Self {
        Sentence { id, doc }
    }
}

#[cfg(test)]
pub(crate) mod fixtures;

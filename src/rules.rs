//! Rule definitions.
//!
//! A [`Rule`] is a label plus one or more alternative [`Pattern`]s. A pattern is
//! a fixed-length sequence of [`Step`]s, and a step is a set of attribute
//! [`Constraint`]s that a single token must satisfy all at once.
//!
//! ```text
//! Rule "ADJ-NOUN"
//!   pattern #0: [ {POS=ADJ} , {POS=NOUN} ]
//!   pattern #1: [ {POS=ADJ} , {POS=PROPN} ]
//!                  step 0      step 1
//! ```
//!
//! Rules are validated when they are built and never change afterwards. A
//! [`RuleSet`] wraps them with a precompiled pattern index behind an `Arc`, so
//! cloning it is cheap and it can be shared by concurrent extraction runs.

#[path = "rules/loader.rs"]
mod loader;
#[path = "rules/source.rs"]
mod source;

pub use source::{Language, RuleSource, UnknownLanguage};

use crate::engine::{CompiledRules, label_marks_verb};
use crate::{ConfigError, Token};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

// --- Attributes -------------------------------------------------------------

/// Token attribute a constraint can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    /// Verbatim token text (`ORTH` or `TEXT`).
    Orth,
    /// Lower-cased token text.
    Lower,
    Lemma,
    /// Coarse part-of-speech tag.
    Pos,
    /// Fine-grained tag.
    Tag,
    Dep,
    /// Whole morphological feature string.
    Morph,
    IsPunct,
}

impl Attr {
    /// Resolve a configuration key (case-insensitive).
    pub fn from_key(key: &str) -> Option<Attr> {
        let attr = match key.to_ascii_uppercase().as_str() {
            "ORTH" | "TEXT" => Attr::Orth,
            "LOWER" => Attr::Lower,
            "LEMMA" => Attr::Lemma,
            "POS" => Attr::Pos,
            "TAG" => Attr::Tag,
            "DEP" => Attr::Dep,
            "MORPH" => Attr::Morph,
            "IS_PUNCT" => Attr::IsPunct,
            _ => return None,
        };
        Some(attr)
    }

    /// Canonical configuration key.
    pub fn name(self) -> &'static str {
        match self {
            Attr::Orth => "ORTH",
            Attr::Lower => "LOWER",
            Attr::Lemma => "LEMMA",
            Attr::Pos => "POS",
            Attr::Tag => "TAG",
            Attr::Dep => "DEP",
            Attr::Morph => "MORPH",
            Attr::IsPunct => "IS_PUNCT",
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, Attr::IsPunct)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

// --- Constraints, steps, patterns --------------------------------------------

/// `attr == value`, tested against one token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub attr: Attr,
    pub value: AttrValue,
}

impl Constraint {
    pub fn new(attr: Attr, value: impl Into<AttrValue>) -> Self {
        Constraint { attr, value: value.into() }
    }

    /// Exact comparison. A value of the wrong kind for `attr` never matches.
    pub fn matches(&self, token: &Token) -> bool {
        match (self.attr, &self.value) {
            (Attr::IsPunct, AttrValue::Bool(expected)) => token.is_punct == *expected,
            (Attr::IsPunct, AttrValue::Str(_)) | (_, AttrValue::Bool(_)) => false,
            (Attr::Lower, AttrValue::Str(expected)) => token.text.to_lowercase() == *expected,
            (Attr::Orth, AttrValue::Str(expected)) => token.text == *expected,
            (Attr::Lemma, AttrValue::Str(expected)) => token.lemma == *expected,
            (Attr::Pos, AttrValue::Str(expected)) => token.pos == *expected,
            (Attr::Tag, AttrValue::Str(expected)) => token.tag == *expected,
            (Attr::Dep, AttrValue::Str(expected)) => token.dep == *expected,
            (Attr::Morph, AttrValue::Str(expected)) => token.morph == *expected,
        }
    }
}

/// Constraints for a single token position. An empty step accepts any token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Step {
    constraints: Vec<Constraint>,
}

impl Step {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Step { constraints }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn matches(&self, token: &Token) -> bool {
        self.constraints.iter().all(|c| c.matches(token))
    }

    /// Required coarse POS, if the step pins one.
    pub(crate) fn required_pos(&self) -> Option<&str> {
        self.constraints.iter().find_map(|c| match (c.attr, &c.value) {
            (Attr::Pos, AttrValue::Str(pos)) => Some(pos.as_str()),
            _ => None,
        })
    }
}

/// Fixed-length positional pattern. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    steps: Vec<Step>,
}

impl Pattern {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of tokens a match of this pattern spans.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `tokens` matches iff it has exactly `len()` tokens and each satisfies its step.
    pub fn matches(&self, tokens: &[Token]) -> bool {
        tokens.len() == self.steps.len() && self.steps.iter().zip(tokens).all(|(step, token)| step.matches(token))
    }
}

/// A labelled set of alternative patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    label: String,
    patterns: Vec<Pattern>,
    verb_bearing: bool,
}

impl Rule {
    /// Build a rule, rejecting an empty pattern list or any pattern without steps.
    pub fn try_new(label: impl Into<String>, patterns: Vec<Vec<Step>>) -> Result<Self, ConfigError> {
        let label = label.into();
        if patterns.is_empty() {
            return Err(ConfigError::EmptyPatterns { label });
        }
        if let Some(pattern) = patterns.iter().position(|steps| steps.is_empty()) {
            return Err(ConfigError::EmptyPattern { label, pattern });
        }

        let verb_bearing = label_marks_verb(&label);
        let patterns = patterns.into_iter().map(|steps| Pattern { steps }).collect();
        Ok(Rule { label, patterns, verb_bearing })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Whether the label names a verb category (e.g. `VERB-NOUN`), which
    /// subjects its matches to the verb-form check in anchored mode.
    pub fn is_verb_bearing(&self) -> bool {
        self.verb_bearing
    }
}

// --- RuleSet ----------------------------------------------------------------

#[derive(Debug)]
struct RuleSetInner {
    rules: Vec<Rule>,
    compiled: CompiledRules,
}

/// Immutable, shareable collection of rules in declaration order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    inner: Arc<RuleSetInner>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        let compiled = CompiledRules::new(&rules);
        tracing::info!(rules = rules.len(), patterns = compiled.pattern_count(), "rule set ready");
        RuleSet { inner: Arc::new(RuleSetInner { rules, compiled }) }
    }

    /// Parse rules from a JSON document (see [`RuleSet::from_path`] for the schema).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        loader::from_str(json).map(RuleSet::new)
    }

    /// Load rules from a JSON file:
    ///
    /// ```json
    /// [
    ///   {"label": "ADJ-NOUN", "pattern": [[{"POS": "ADJ"}, {"POS": "NOUN"}]]},
    ///   {"label": "ADJ-ADJ-NOUN", "pattern": [[{"POS": "ADJ"}, {"POS": "ADJ"}, {"POS": "NOUN"}]]}
    /// ]
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        loader::from_path(path.as_ref()).map(RuleSet::new)
    }

    /// The rule asset shipped for `language`.
    pub fn bundled(language: Language) -> Result<Self, ConfigError> {
        Self::from_json_str(language.bundled_rules())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.inner.rules
    }

    pub fn len(&self) -> usize {
        self.inner.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.rules.is_empty()
    }

    pub(crate) fn compiled(&self) -> &CompiledRules {
        &self.inner.compiled
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSet::new(rules)
    }
}

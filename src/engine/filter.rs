//! Inclusion policy.
//!
//! With [`InclusionMode::Subtree`] every match found in an anchor's window is
//! kept. [`InclusionMode::Anchored`] keeps a match only if
//!
//! 1. its token range contains the anchor, and
//! 2. for rules whose label names a verb category, at least one token in the
//!    range is a gerund or past participle (see [`VerbForm`]).

use crate::{Doc, Rule, Token};

bitflags::bitflags! {
    /// Nominalized verb forms recognised from a token's fine tag or features.
    ///
    /// ```text
    /// tag  VBG                          -> GERUND
    /// tag  VBN                          -> PAST_PARTICIPLE
    /// feat VerbForm=Ger | VerbForm=Conv -> GERUND
    /// feat VerbForm=Part + Tense=Past   -> PAST_PARTICIPLE
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VerbForm: u8 {
        const GERUND          = 1 << 0;
        const PAST_PARTICIPLE = 1 << 1;
    }
}

impl VerbForm {
    pub fn of(token: &Token) -> VerbForm {
        let mut form = match token.tag.as_str() {
            "VBG" => VerbForm::GERUND,
            "VBN" => VerbForm::PAST_PARTICIPLE,
            _ => VerbForm::empty(),
        };

        let mut participle = false;
        let mut past = false;
        for (name, value) in token.morph.split('|').filter_map(|feat| feat.split_once('=')) {
            match (name, value) {
                ("VerbForm", "Ger" | "Conv") => form |= VerbForm::GERUND,
                ("VerbForm", "Part") => participle = true,
                ("Tense", "Past") => past = true,
                _ => {}
            }
        }
        if participle && past {
            form |= VerbForm::PAST_PARTICIPLE;
        }
        form
    }
}

/// Whether a label names a verb category: `VERB` as a whole word, any case.
pub(crate) fn label_marks_verb(label: &str) -> bool {
    regex!(r"(?i)(?:^|[^\p{L}])verb(?:$|[^\p{L}])").is_match(label)
}

/// Inclusion toggle applied to every candidate match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InclusionMode {
    /// Keep every match inside the anchor's subtree.
    #[default]
    Subtree,
    /// Keep only matches that contain the anchor, with the verb-form check for
    /// verb-bearing rules.
    Anchored,
}

impl From<bool> for InclusionMode {
    fn from(anchored: bool) -> Self {
        if anchored { InclusionMode::Anchored } else { InclusionMode::Subtree }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Accept,
    MissingAnchor,
    MissingVerbForm,
}

pub(crate) fn judge(mode: InclusionMode, rule: &Rule, doc: &Doc, start: usize, end: usize, anchor: usize) -> Verdict {
    if mode == InclusionMode::Subtree {
        return Verdict::Accept;
    }
    if !(start..end).contains(&anchor) {
        return Verdict::MissingAnchor;
    }
    if rule.is_verb_bearing() && !doc.tokens[start..end].iter().any(|t| !VerbForm::of(t).is_empty()) {
        return Verdict::MissingVerbForm;
    }
    Verdict::Accept
}

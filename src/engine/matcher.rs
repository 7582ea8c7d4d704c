//! Positional pattern matching inside a window.
//!
//! For every start position in the window, every candidate pattern (see
//! `compiled_rules.rs`) is tried against the run of tokens of the pattern's
//! length. Matching is exact and fixed-length: no quantifiers, no
//! backtracking, no deduplication of overlapping runs.
//!
//! Enumeration order is what downstream consumers see:
//!
//! ```text
//! window:      [ w0  w1  w2  w3 ]
//! start = w0:  rule 0 / pattern 0, rule 0 / pattern 1, rule 1 / pattern 0, …
//! start = w1:  rule 0 / pattern 0, …
//! ```
//!
//! i.e. ascending start, then declaration order. A pattern that would run past
//! the window's right edge is not tried.

use super::compiled_rules::PatternId;
use super::subtree::Window;
use crate::{Doc, RuleSet};

/// A run of tokens matching one alternative pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub rule: usize,
    pub pattern: usize,
    pub start: usize,
    pub end: usize,
}

/// Resumable scan over one window. Holds positions only, so it can live next
/// to the document it reads.
#[derive(Debug, Clone)]
pub(crate) struct WindowMatcher {
    /// Start position whose candidates are loaded.
    start: usize,
    /// Next start position to load.
    next_start: usize,
    /// Exclusive bound for match ends.
    limit: usize,
    candidates: Vec<PatternId>,
    cursor: usize,
}

impl WindowMatcher {
    pub(crate) fn new(window: Window, doc_len: usize) -> Self {
        WindowMatcher {
            start: window.left,
            next_start: window.left,
            limit: window.end().min(doc_len),
            candidates: Vec::new(),
            cursor: 0,
        }
    }

    pub(crate) fn next_candidate(&mut self, doc: &Doc, rules: &RuleSet) -> Option<Candidate> {
        let compiled = rules.compiled();
        loop {
            while let Some(&id) = self.candidates.get(self.cursor) {
                self.cursor += 1;
                let entry = compiled.entry(id);
                let pattern = &rules.rules()[entry.rule].patterns()[entry.pattern];
                let end = self.start + pattern.len();
                if end <= self.limit && pattern.matches(&doc.tokens[self.start..end]) {
                    return Some(Candidate { rule: entry.rule, pattern: entry.pattern, start: self.start, end });
                }
            }

            if self.next_start >= self.limit {
                return None;
            }
            self.start = self.next_start;
            self.next_start += 1;
            self.cursor = 0;
            compiled.candidates_into(&doc.tokens[self.start].pos, &mut self.candidates);
        }
    }
}

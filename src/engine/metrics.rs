//! Extraction run counters.
//!
//! Collected unconditionally: every field is a counter bumped on a path the
//! engine walks anyway, so there is nothing to opt into. The CLI report reads
//! them to explain why a run produced few (or no) phrases.

use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Sentences pulled from the source (parsed or pre-parsed).
    pub sentences: usize,
    /// Subject anchors located.
    pub anchors: usize,
    /// Pattern matches found inside anchor windows, before filtering.
    pub candidates: usize,
    /// Matches that passed the inclusion policy.
    pub accepted: usize,
    /// Rejected in anchored mode: the match does not contain its anchor.
    pub rejected_missing_anchor: usize,
    /// Rejected in anchored mode: verb-bearing rule without a gerund/participle.
    pub rejected_missing_verb_form: usize,
    /// Wall time spent inside the iterator, parser calls included.
    pub elapsed: Duration,
}

impl ExtractionStats {
    pub fn rejected(&self) -> usize {
        self.rejected_missing_anchor + self.rejected_missing_verb_form
    }
}

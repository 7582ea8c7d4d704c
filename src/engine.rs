//! Phrase extraction engine.
//!
//! This module is the matching core. It knows nothing about parsers or record
//! streams; it takes one parsed [`Doc`] and a [`RuleSet`] and produces accepted
//! matches. `api.rs` wraps it into the lazy, multi-sentence surface.
//!
//! ## How the parts work together
//!
//! ```text
//! rules (all)  ──┐
//!                │  CompiledRules::new                 (compiled_rules.rs)
//!                └──────────────┬─────────────
//!                               │
//! Doc ── AnchorCursor ──────────┼─ nsubj/nsubjpass with VERB head  (anchor.rs)
//!                               │
//!                               v
//!                DependencyTree::window                (subtree.rs)
//!                  - leftmost/rightmost descendant
//!                               │
//!                               v
//!                WindowMatcher::next_candidate         (matcher.rs)
//!                  - every start, every candidate pattern
//!                               │
//!                               v
//!                judge                                 (filter.rs)
//!                  - inclusion mode, anchor, verb form
//!                               │
//!                               v
//!                Match ──▶ KeyPhrase                   (record.rs)
//! ```
//!
//! `scan.rs` strings these together per sentence and `metrics.rs` counts what
//! happened along the way.
//!
//! ## Determinism
//!
//! Given the same document, rules and mode, the sequence of matches is fixed:
//! anchors in token order, then ascending match start, then rule/pattern
//! declaration order. Overlapping matches are all reported.
//!
//! ## Debugging
//!
//! Run with `KEYNP_LOG=keynp=trace` to see every anchor window and every
//! rejected candidate.

#[path = "engine/anchor.rs"]
mod anchor;
#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/filter.rs"]
mod filter;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/record.rs"]
mod record;
#[path = "engine/scan.rs"]
mod scan;
#[path = "engine/subtree.rs"]
mod subtree;


pub(crate) use compiled_rules::CompiledRules;
pub use filter::{InclusionMode, VerbForm};
pub(crate) use filter::label_marks_verb;
pub use metrics::ExtractionStats;
pub use record::{KeyPhrase, Match};
pub(crate) use record::build as build_record;
pub(crate) use scan::SentenceScan;

use crate::{Doc, RuleSet};

/// Accepted matches for a single document, lazily, in emission order.
///
/// This is the core without identifiers or text copying; use
/// [`sentence_phrases`](crate::sentence_phrases) for finished records.
pub fn find_matches<'a>(rules: &'a RuleSet, doc: &'a Doc, mode: InclusionMode) -> impl Iterator<Item = Match> + 'a {
    let mut scan = SentenceScan::new();
    let mut stats = ExtractionStats::default();
    std::iter::from_fn(move || scan.next_match(doc, rules, mode, &mut stats))
}

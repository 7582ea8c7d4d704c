//! Per-sentence driver.
//!
//! `SentenceScan` chains the stages for one document and hands back accepted
//! matches one at a time:
//!
//! ```text
//! AnchorCursor ──anchor──▶ DependencyTree::window ──▶ WindowMatcher
//!      ▲                                                  │ candidate
//!      └──────── window exhausted ◀── judge ◀─────────────┘
//!                                      │ Accept
//!                                      ▼
//!                                    Match
//! ```
//!
//! The scan stores positions only, never references into the document, so an
//! owner can keep the scan next to the sentence it walks and resume it across
//! iterator calls.

use super::anchor::AnchorCursor;
use super::filter::{InclusionMode, Verdict, judge};
use super::matcher::WindowMatcher;
use super::metrics::ExtractionStats;
use super::record::{Match, byte_span};
use super::subtree::DependencyTree;
use crate::{Doc, RuleSet};

#[derive(Debug)]
struct ActiveWindow {
    anchor: usize,
    matcher: WindowMatcher,
}

#[derive(Debug, Default)]
pub(crate) struct SentenceScan {
    anchors: AnchorCursor,
    tree: Option<DependencyTree>,
    active: Option<ActiveWindow>,
}

impl SentenceScan {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_match(
        &mut self,
        doc: &Doc,
        rules: &RuleSet,
        mode: InclusionMode,
        stats: &mut ExtractionStats,
    ) -> Option<Match> {
        loop {
            if let Some(active) = self.active.as_mut() {
                while let Some(candidate) = active.matcher.next_candidate(doc, rules) {
                    stats.candidates += 1;
                    let rule = &rules.rules()[candidate.rule];
                    match judge(mode, rule, doc, candidate.start, candidate.end, active.anchor) {
                        Verdict::Accept => {
                            stats.accepted += 1;
                            let (start_byte, end_byte) = byte_span(doc, candidate.start, candidate.end);
                            return Some(Match {
                                rule: candidate.rule,
                                pattern: candidate.pattern,
                                start: candidate.start,
                                end: candidate.end,
                                anchor: active.anchor,
                                start_byte,
                                end_byte,
                            });
                        }
                        Verdict::MissingAnchor => {
                            stats.rejected_missing_anchor += 1;
                            tracing::trace!(label = rule.label(), start = candidate.start, end = candidate.end, anchor = active.anchor, "rejected: anchor outside match");
                        }
                        Verdict::MissingVerbForm => {
                            stats.rejected_missing_verb_form += 1;
                            tracing::trace!(label = rule.label(), start = candidate.start, end = candidate.end, "rejected: no gerund or participle");
                        }
                    }
                }
                self.active = None;
            }

            let anchor = self.anchors.next_anchor(doc)?;
            stats.anchors += 1;
            let window = self.tree.get_or_insert_with(|| DependencyTree::new(doc)).window(anchor);
            debug_assert!(window.contains(anchor));
            tracing::debug!(anchor, left = window.left, right = window.right, "anchor window");
            self.active = Some(ActiveWindow { anchor, matcher: WindowMatcher::new(window, doc.len()) });
        }
    }
}

//! Subject location.
//!
//! An *anchor* is a nominal subject (active or passive) whose syntactic head is
//! tagged `VERB`. Anchors are yielded in sentence order; a sentence can have
//! none (imperatives, copular clauses with an adjectival root) or several
//! (coordinated clauses).

use crate::Doc;

/// Dependency labels counted as nominal subjects. `nsubj:pass` is the UD v2
/// spelling of `nsubjpass`.
const SUBJECT_DEPS: &[&str] = &["nsubj", "nsubjpass", "nsubj:pass"];

const VERB: &str = "VERB";

pub(crate) fn is_subject_dep(dep: &str) -> bool {
    SUBJECT_DEPS.contains(&dep)
}

/// Whether the token at position `idx` is an anchor.
pub(crate) fn is_anchor(doc: &Doc, idx: usize) -> bool {
    let token = &doc.tokens[idx];
    if !is_subject_dep(&token.dep) {
        return false;
    }
    if token.head >= doc.len() {
        tracing::warn!(token = idx, head = token.head, len = doc.len(), "subject head out of range; skipped");
        return false;
    }
    doc.head_of(idx).is_some_and(|head| head.pos == VERB)
}

/// Forward-only cursor over the anchors of one document.
///
/// Holds only a position so the caller can keep it next to the document it
/// scans.
#[derive(Debug, Clone, Default)]
pub(crate) struct AnchorCursor {
    next: usize,
}

impl AnchorCursor {
    pub(crate) fn next_anchor(&mut self, doc: &Doc) -> Option<usize> {
        while self.next < doc.len() {
            let idx = self.next;
            self.next += 1;
            if is_anchor(doc, idx) {
                return Some(idx);
            }
        }
        None
    }
}

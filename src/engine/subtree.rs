//! Subtree windows.
//!
//! The search window for an anchor is the span from the leftmost to the
//! rightmost token reachable from it along dependency edges:
//!
//! ```text
//! The old man with the broken umbrella sleeps .
//!  0   1   2    3   4    5       6       7    8
//!          ▲ anchor
//! children(2) = {0, 1, 3}   children(3) = {6}   children(6) = {4, 5}
//! window      = 0..=6
//! ```
//!
//! Projective trees make this span contiguous. The edges are derived from the
//! head relation alone, so a parser only needs to supply `head`.

use crate::Doc;

/// Inclusive token range `[left, right]` governed by an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub left: usize,
    pub right: usize,
}

impl Window {
    pub fn contains(&self, idx: usize) -> bool {
        self.left <= idx && idx <= self.right
    }

    /// Exclusive upper bound, for slicing.
    pub fn end(&self) -> usize {
        self.right + 1
    }
}

/// Child lists built from the head relation, computed once per document.
#[derive(Debug, Clone)]
pub(crate) struct DependencyTree {
    children: Vec<Vec<usize>>,
}

impl DependencyTree {
    pub(crate) fn new(doc: &Doc) -> Self {
        let mut children = vec![Vec::new(); doc.len()];
        for (idx, token) in doc.tokens.iter().enumerate() {
            if token.head != idx && token.head < doc.len() {
                children[token.head].push(idx);
            }
        }
        DependencyTree { children }
    }

    /// Leftmost and rightmost descendants of `anchor`, including itself.
    ///
    /// Visits each token at most once, so a malformed (cyclic) head relation
    /// still terminates.
    pub(crate) fn window(&self, anchor: usize) -> Window {
        let mut window = Window { left: anchor, right: anchor };
        let mut visited = vec![false; self.children.len()];
        let mut stack = vec![anchor];

        while let Some(idx) = stack.pop() {
            if std::mem::replace(&mut visited[idx], true) {
                continue;
            }
            window.left = window.left.min(idx);
            window.right = window.right.max(idx);
            stack.extend(self.children[idx].iter().copied().filter(|&c| !visited[c]));
        }

        window
    }
}

//! Pattern compilation and indexing.
//!
//! This module holds the *static* side of the engine: structures derived once
//! from the rule list that make each window scan cheaper without changing its
//! result.
//!
//! Every alternative pattern of every rule is flattened into one entry list in
//! declaration order, so a `PatternId` sorts exactly like `(rule, pattern)`:
//!
//! ```text
//! rules:    ADJ-NOUN { #0, #1 }   VERB-NOUN { #0 }   ANY-NOUN { #0 }
//! entries:  0=(0,0)  1=(0,1)      2=(1,0)            3=(2,0)
//! ```
//!
//! The index keys entries by the coarse POS their first step requires.
//! Entries whose first step leaves POS open are *always on*.
//!
//! ```text
//! by_pos["ADJ"]  = [0, 1]
//! by_pos["VERB"] = [2]
//! always_on      = [3]
//! ```
//!
//! ## Invariants
//!
//! - Every id list is strictly ascending, so merging `by_pos[pos]` with
//!   `always_on` yields candidates in declaration order. The matcher relies on
//!   this for its tie-break ordering.
//! - The index only narrows the candidates; the full pattern is still checked
//!   against the tokens.

use crate::Rule;
use std::collections::HashMap;

/// Index into `CompiledRules::entries`.
pub(crate) type PatternId = usize;

/// Position of one alternative pattern within the rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PatternRef {
    pub rule: usize,
    pub pattern: usize,
}

#[derive(Debug, Default)]
pub(crate) struct PatternIndex {
    pub always_on: Vec<PatternId>,
    pub by_pos: HashMap<String, Vec<PatternId>>,
}

/// Flattened, indexed view of a rule list.
#[derive(Debug, Default)]
pub(crate) struct CompiledRules {
    entries: Vec<PatternRef>,
    index: PatternIndex,
}

impl CompiledRules {
    pub(crate) fn new(rules: &[Rule]) -> Self {
        let mut entries = Vec::new();
        let mut index = PatternIndex::default();

        for (rule_idx, rule) in rules.iter().enumerate() {
            for (pattern_idx, pattern) in rule.patterns().iter().enumerate() {
                let id = entries.len();
                entries.push(PatternRef { rule: rule_idx, pattern: pattern_idx });

                match pattern.steps().first().and_then(|step| step.required_pos()) {
                    Some(pos) => index.by_pos.entry(pos.to_string()).or_default().push(id),
                    None => index.always_on.push(id),
                }
            }
        }

        CompiledRules { entries, index }
    }

    pub(crate) fn pattern_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, id: PatternId) -> PatternRef {
        self.entries[id]
    }

    /// Fill `out` with the candidate patterns for a run starting at a token
    /// tagged `pos`, in declaration order.
    pub(crate) fn candidates_into(&self, pos: &str, out: &mut Vec<PatternId>) {
        out.clear();
        let keyed: &[PatternId] = self.index.by_pos.get(pos).map(Vec::as_slice).unwrap_or(&[]);
        let always = self.index.always_on.as_slice();

        let (mut a, mut b) = (0, 0);
        while a < keyed.len() && b < always.len() {
            if keyed[a] < always[b] {
                out.push(keyed[a]);
                a += 1;
            } else {
                out.push(always[b]);
                b += 1;
            }
        }
        out.extend_from_slice(&keyed[a..]);
        out.extend_from_slice(&always[b..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<Rule> {
        vec![
            rule!("ADJ-NOUN", [[{ Pos: "ADJ" }, { Pos: "NOUN" }], [{ Pos: "ADJ" }, { Pos: "PROPN" }]]),
            rule!("VERB-NOUN", [[{ Pos: "VERB" }, { Pos: "NOUN" }]]),
            rule!("ANY-NOUN", [[{ IsPunct: false }, { Pos: "NOUN" }]]),
            rule!("ADJ", [[{ Pos: "ADJ", Lemma: "rapid" }]]),
        ]
    }

    #[test]
    fn flattens_in_declaration_order() {
        let compiled = CompiledRules::new(&rules());
        assert_eq!(compiled.pattern_count(), 5);
        assert_eq!(compiled.entry(1), PatternRef { rule: 0, pattern: 1 });
        assert_eq!(compiled.entry(4), PatternRef { rule: 3, pattern: 0 });
    }

    #[test]
    fn candidates_merge_keyed_and_always_on() {
        let compiled = CompiledRules::new(&rules());
        let mut out = Vec::new();

        compiled.candidates_into("ADJ", &mut out);
        assert_eq!(out, vec![0, 1, 3, 4]);

        compiled.candidates_into("VERB", &mut out);
        assert_eq!(out, vec![2, 3]);

        compiled.candidates_into("X", &mut out);
        assert_eq!(out, vec![3]);
    }
}

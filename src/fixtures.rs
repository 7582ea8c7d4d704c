//! Hand-annotated sentences shared by the unit tests.

use crate::{Doc, Sentence, TokenAnnotation};

fn tok(form: &str, lemma: &str, pos: &str, tag: &str, dep: &str, head: usize) -> TokenAnnotation {
    TokenAnnotation::new(form, lemma, pos, tag, dep, head)
}

/// "The rapid fox runs"
///
/// ```text
/// The(det) rapid(amod) fox(nsubj) runs(ROOT)
///   └──────────┴─────────► fox ──────► runs
/// ```
pub(crate) fn rapid_fox() -> Doc {
    Doc::align(
        "The rapid fox runs",
        vec![
            tok("The", "the", "DET", "DT", "det", 2),
            tok("rapid", "rapid", "ADJ", "JJ", "amod", 2),
            tok("fox", "fox", "NOUN", "NN", "nsubj", 3),
            tok("runs", "run", "VERB", "VBZ", "ROOT", 3),
        ],
    )
    .unwrap()
}

/// "The old man with the broken umbrella sleeps."
///
/// Subject `man` (2) governs `The old man with the broken umbrella` (0..=6).
/// `broken umbrella` lies in the subtree but does not contain `man`.
pub(crate) fn broken_umbrella() -> Doc {
    Doc::align(
        "The old man with the broken umbrella sleeps.",
        vec![
            tok("The", "the", "DET", "DT", "det", 2),
            tok("old", "old", "ADJ", "JJ", "amod", 2),
            tok("man", "man", "NOUN", "NN", "nsubj", 7),
            tok("with", "with", "ADP", "IN", "prep", 2),
            tok("the", "the", "DET", "DT", "det", 6),
            tok("broken", "broken", "ADJ", "JJ", "amod", 6),
            tok("umbrella", "umbrella", "NOUN", "NN", "pobj", 3),
            tok("sleeps", "sleep", "VERB", "VBZ", "ROOT", 7),
            tok(".", ".", "PUNCT", ".", "punct", 7),
        ],
    )
    .unwrap()
}

/// "Sleeping cats dream, and barking dogs wake."
///
/// Two clauses with one subject each: `cats` (1, head `dream`) and `dogs`
/// (6, head `wake`). `Sleeping` and `barking` are tagged `VBG`.
pub(crate) fn two_clauses() -> Doc {
    Doc::align(
        "Sleeping cats dream, and barking dogs wake.",
        vec![
            tok("Sleeping", "sleep", "VERB", "VBG", "amod", 1),
            tok("cats", "cat", "NOUN", "NNS", "nsubj", 2),
            tok("dream", "dream", "VERB", "VBP", "ROOT", 2),
            tok(",", ",", "PUNCT", ",", "punct", 2),
            tok("and", "and", "CCONJ", "CC", "cc", 2),
            tok("barking", "bark", "VERB", "VBG", "amod", 6),
            tok("dogs", "dog", "NOUN", "NNS", "nsubj", 7),
            tok("wake", "wake", "VERB", "VBP", "conj", 2),
            tok(".", ".", "PUNCT", ".", "punct", 2),
        ],
    )
    .unwrap()
}

/// "Dogs chase cats"
///
/// The subject is a single token; `chase cats` (VERB NOUN) sits outside its
/// subtree.
pub(crate) fn dogs_chase_cats() -> Doc {
    Doc::align(
        "Dogs chase cats",
        vec![
            tok("Dogs", "dog", "NOUN", "NNS", "nsubj", 1),
            tok("chase", "chase", "VERB", "VBP", "ROOT", 1),
            tok("cats", "cat", "NOUN", "NNS", "dobj", 1),
        ],
    )
    .unwrap()
}

/// "Run fast !": no nominal subject at all.
pub(crate) fn no_subject() -> Doc {
    Doc::align(
        "Run fast !",
        vec![
            tok("Run", "run", "VERB", "VB", "ROOT", 0),
            tok("fast", "fast", "ADV", "RB", "advmod", 0),
            tok("!", "!", "PUNCT", ".", "punct", 0),
        ],
    )
    .unwrap()
}

/// "The bridge was built ." with a passive subject under a VERB head and a
/// noun subject under a non-verb head in the copular "Peace is good".
pub(crate) fn passive_and_copula() -> Doc {
    Doc::align(
        "The bridge was built . Peace is good",
        vec![
            tok("The", "the", "DET", "DT", "det", 1),
            tok("bridge", "bridge", "NOUN", "NN", "nsubjpass", 3),
            tok("was", "be", "AUX", "VBD", "auxpass", 3),
            tok("built", "build", "VERB", "VBN", "ROOT", 3),
            tok(".", ".", "PUNCT", ".", "punct", 3),
            tok("Peace", "peace", "NOUN", "NN", "nsubj", 7),
            tok("is", "be", "AUX", "VBZ", "cop", 7),
            tok("good", "good", "ADJ", "JJ", "ROOT", 7),
        ],
    )
    .unwrap()
}

pub(crate) fn sentence<I>(id: I, doc: Doc) -> Sentence<I> {
    Sentence::new(id, doc)
}

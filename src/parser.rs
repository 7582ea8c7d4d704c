//! Parser collaborator.
//!
//! The engine never tags or parses text itself. It asks a [`DependencyParser`]
//! for one [`Doc`] per input text and trusts whatever comes back.
//!
//! [`Pipe`] feeds `(text, id)` pairs through a parser in batches and yields
//! parsed sentences in input order:
//!
//! ```text
//! inputs ──take(batch_size)──▶ parse_batch ──▶ VecDeque<Sentence> ──▶ next()
//!    ▲                                                      │ empty
//!    └──────────────────────────────────────────────────────┘
//! ```
//!
//! The batch size is only a buffering hint: it changes how often the parser
//! is called, never what is yielded. A batch that does not come back with
//! exactly one document per text cannot be paired with its identifiers and
//! ends the pipe with [`ParseError::BatchMismatch`].

use crate::{Doc, ParseError, Sentence};
use std::collections::{HashMap, VecDeque};

/// Something that turns texts into dependency-parsed documents.
pub trait DependencyParser {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parse `texts`, returning exactly one document per text, in order.
    fn parse_batch(&mut self, texts: &[&str]) -> Result<Vec<Doc>, Self::Error>;
}

impl<P: DependencyParser + ?Sized> DependencyParser for &mut P {
    type Error = P::Error;

    fn parse_batch(&mut self, texts: &[&str]) -> Result<Vec<Doc>, Self::Error> {
        (**self).parse_batch(texts)
    }
}

impl<P: DependencyParser + ?Sized> DependencyParser for Box<P> {
    type Error = P::Error;

    fn parse_batch(&mut self, texts: &[&str]) -> Result<Vec<Doc>, Self::Error> {
        (**self).parse_batch(texts)
    }
}

// --- Pipe -------------------------------------------------------------------

/// Lazily parses `(text, id)` pairs in batches.
///
/// After the parser fails once, the error is yielded and the pipe ends.
/// Sentences of earlier batches have already been yielded by then.
pub struct Pipe<'p, P, S, I> {
    parser: &'p mut P,
    inputs: S,
    batch_size: usize,
    buffer: VecDeque<Sentence<I>>,
    done: bool,
}

impl<'p, P, S, T, I> Pipe<'p, P, S, I>
where
    P: DependencyParser,
    S: Iterator<Item = (T, I)>,
    T: AsRef<str>,
{
    /// `batch_size` 0 is treated as 1.
    pub fn new(parser: &'p mut P, inputs: S, batch_size: usize) -> Self {
        Pipe { parser, inputs, batch_size: batch_size.max(1), buffer: VecDeque::new(), done: false }
    }

    fn fill(&mut self) -> Result<(), ParseError<P::Error>> {
        let batch: Vec<(T, I)> = self.inputs.by_ref().take(self.batch_size).collect();
        if batch.is_empty() {
            self.done = true;
            return Ok(());
        }

        let texts: Vec<&str> = batch.iter().map(|(text, _)| text.as_ref()).collect();
        let docs = self.parser.parse_batch(&texts).map_err(ParseError::Parser)?;
        if docs.len() != batch.len() {
            tracing::warn!(expected = batch.len(), got = docs.len(), "parser returned a batch of the wrong size");
            return Err(ParseError::BatchMismatch { expected: batch.len(), got: docs.len() });
        }
        tracing::debug!(texts = batch.len(), "parsed batch");

        self.buffer.extend(batch.into_iter().zip(docs).map(|((_, id), doc)| Sentence::new(id, doc)));
        Ok(())
    }
}

impl<P, S, T, I> Iterator for Pipe<'_, P, S, I>
where
    P: DependencyParser,
    S: Iterator<Item = (T, I)>,
    T: AsRef<str>,
{
    type Item = Result<Sentence<I>, ParseError<P::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(sentence) = self.buffer.pop_front() {
                return Some(Ok(sentence));
            }
            if self.done {
                return None;
            }
            if let Err(err) = self.fill() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}

// --- PretaggedParser --------------------------------------------------------

/// A text the [`PretaggedParser`] holds no annotation for.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no annotation registered for text {0:?}")]
pub struct UnknownText(pub String);

/// Deterministic parser backed by a fixed text → document table.
///
/// Useful for tests and for callers that already hold annotations from an
/// external tagger.
#[derive(Debug, Clone, Default)]
pub struct PretaggedParser {
    docs: HashMap<String, Doc>,
    calls: usize,
}

impl PretaggedParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `doc` under its own text.
    pub fn insert(&mut self, doc: Doc) {
        self.docs.insert(doc.text.clone(), doc);
    }

    pub fn with(mut self, doc: Doc) -> Self {
        self.insert(doc);
        self
    }

    /// Number of `parse_batch` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl FromIterator<Doc> for PretaggedParser {
    fn from_iter<T: IntoIterator<Item = Doc>>(iter: T) -> Self {
        let mut parser = PretaggedParser::new();
        iter.into_iter().for_each(|doc| parser.insert(doc));
        parser
    }
}

impl DependencyParser for PretaggedParser {
    type Error = UnknownText;

    fn parse_batch(&mut self, texts: &[&str]) -> Result<Vec<Doc>, Self::Error> {
        self.calls += 1;
        texts.iter().map(|text| self.docs.get(*text).cloned().ok_or_else(|| UnknownText(text.to_string()))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn parser() -> PretaggedParser {
        [fixtures::rapid_fox(), fixtures::dogs_chase_cats(), fixtures::no_subject()].into_iter().collect()
    }

    #[test]
    fn pipe_keeps_input_order_and_ids() {
        let mut parser = parser();
        let inputs = vec![("Dogs chase cats", 1), ("The rapid fox runs", 2), ("Run fast !", 3)];

        let sentences: Vec<Sentence<i32>> = Pipe::new(&mut parser, inputs.into_iter(), 2).map(Result::unwrap).collect();

        let ids: Vec<i32> = sentences.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(sentences[1].doc, fixtures::rapid_fox());
        assert_eq!(parser.calls(), 2);
    }

    #[test]
    fn zero_batch_size_means_one() {
        let mut parser = parser();
        let inputs = vec![("Dogs chase cats", "a"), ("Run fast !", "b")];
        assert_eq!(Pipe::new(&mut parser, inputs.into_iter(), 0).count(), 2);
        assert_eq!(parser.calls(), 2);
    }

    #[test]
    fn pipe_stops_after_parser_error() {
        let mut parser = parser();
        let inputs = vec![("Dogs chase cats", 1), ("unknown", 2), ("Run fast !", 3)];
        let mut pipe = Pipe::new(&mut parser, inputs.into_iter(), 1);

        assert!(pipe.next().unwrap().is_ok());
        assert_eq!(pipe.next().unwrap().unwrap_err(), ParseError::Parser(UnknownText("unknown".to_string())));
        assert!(pipe.next().is_none());
    }

    /// Loses the document for "Run fast !".
    struct Lossy(PretaggedParser);

    impl DependencyParser for Lossy {
        type Error = UnknownText;

        fn parse_batch(&mut self, texts: &[&str]) -> Result<Vec<Doc>, Self::Error> {
            let mut docs = self.0.parse_batch(texts)?;
            docs.retain(|doc| doc.text != "Run fast !");
            Ok(docs)
        }
    }

    #[test]
    fn short_batch_is_an_error() {
        let mut parser = Lossy(parser());
        let inputs = vec![("Run fast !", 1), ("Dogs chase cats", 2)];
        let results: Vec<_> = Pipe::new(&mut parser, inputs.into_iter(), 2).collect();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap_err(), &ParseError::BatchMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn batches_before_a_mismatch_are_still_yielded() {
        let mut parser = Lossy(parser());
        let inputs = vec![("Dogs chase cats", 1), ("The rapid fox runs", 2), ("Run fast !", 3), ("Dogs chase cats", 4)];
        let results: Vec<_> = Pipe::new(&mut parser, inputs.into_iter(), 2).collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().id, 1);
        assert_eq!(results[1].as_ref().unwrap().id, 2);
        assert_eq!(results[2].as_ref().unwrap_err(), &ParseError::BatchMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn pipe_does_not_parse_ahead_of_consumer() {
        let mut parser = parser();
        let inputs = vec![("Dogs chase cats", 1), ("The rapid fox runs", 2), ("Run fast !", 3)];
        {
            let mut pipe = Pipe::new(&mut parser, inputs.into_iter(), 1);
            pipe.next();
        }
        assert_eq!(parser.calls(), 1);
    }
}

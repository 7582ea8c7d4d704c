use crate::engine::{ExtractionStats, InclusionMode, KeyPhrase, SentenceScan, build_record};
use crate::parser::{DependencyParser, Pipe};
use crate::{ConfigError, ParseError, RuleSet, RuleSource, Sentence};
use serde::Serialize;
use std::iter::FusedIterator;
use std::time::Instant;

/// Extraction knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Texts handed to the parser per call. Does not affect results. 0 acts as 1.
    pub batch_size: usize,
    pub inclusion: InclusionMode,
}

impl Default for Options {
    fn default() -> Self {
        Options { batch_size: 25, inclusion: InclusionMode::Subtree }
    }
}

// --- Matcher ----------------------------------------------------------------

/// Key noun phrase extractor: a parser plus an immutable rule set.
///
/// Each matcher owns its parser session; share the [`RuleSet`] (a cheap clone)
/// to run several matchers concurrently.
///
/// # Example
/// ```
/// use keynp::{Doc, KeyPhraseMatcher, PretaggedParser, RuleSet, TokenAnnotation};
///
/// let doc = Doc::align("Dogs sleep", vec![
///     TokenAnnotation::new("Dogs", "dog", "NOUN", "NNS", "nsubj", 1),
///     TokenAnnotation::new("sleep", "sleep", "VERB", "VBP", "ROOT", 1),
/// ])
/// .unwrap();
/// let rules = RuleSet::from_json_str(r#"[{"label": "NOUN", "pattern": [[{"POS": "NOUN"}]]}]"#).unwrap();
/// let mut matcher = KeyPhraseMatcher::new(PretaggedParser::new().with(doc), rules);
///
/// let found: Vec<_> = matcher.extract([("Dogs sleep", "a")], 25, true).collect::<Result<_, _>>().unwrap();
/// assert_eq!(found[0].phrase_normalized, "dog");
/// ```
#[derive(Debug, Clone)]
pub struct KeyPhraseMatcher<P> {
    parser: P,
    rules: RuleSet,
}

impl<P: DependencyParser> KeyPhraseMatcher<P> {
    pub fn new(parser: P, rules: RuleSet) -> Self {
        KeyPhraseMatcher { parser, rules }
    }

    /// Resolve `source` once and build a matcher around it.
    pub fn from_source(parser: P, source: &RuleSource) -> Result<Self, ConfigError> {
        Ok(Self::new(parser, source.load()?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn into_parser(self) -> P {
        self.parser
    }

    /// Lazily extract key phrases from `(text, identifier)` pairs.
    ///
    /// Nothing is parsed until the returned iterator is pulled. A parser error,
    /// or a batch the parser answers with the wrong number of documents, is
    /// yielded once and ends the sequence; records yielded before it stay
    /// valid.
    pub fn extract<S, T, I>(
        &mut self,
        sentences: S,
        batch_size: usize,
        inclusion: impl Into<InclusionMode>,
    ) -> Extraction<'_, P, S::IntoIter, I>
    where
        S: IntoIterator<Item = (T, I)>,
        T: AsRef<str>,
        I: Clone,
    {
        let pipe = Pipe::new(&mut self.parser, sentences.into_iter(), batch_size);
        Phrases::new(self.rules.clone(), pipe, inclusion.into())
    }

    pub fn extract_with<S, T, I>(&mut self, sentences: S, options: &Options) -> Extraction<'_, P, S::IntoIter, I>
    where
        S: IntoIterator<Item = (T, I)>,
        T: AsRef<str>,
        I: Clone,
    {
        self.extract(sentences, options.batch_size, options.inclusion)
    }

    /// Collect every record into a column-oriented table.
    pub fn extract_to_table<S, T, I>(
        &mut self,
        sentences: S,
        batch_size: usize,
        inclusion: impl Into<InclusionMode>,
    ) -> Result<PhraseTable<I>, ParseError<P::Error>>
    where
        S: IntoIterator<Item = (T, I)>,
        T: AsRef<str>,
        I: Clone,
    {
        self.extract(sentences, batch_size, inclusion).collect()
    }
}

// --- Lazy record streams ----------------------------------------------------

/// Record stream produced by [`KeyPhraseMatcher::extract`].
pub type Extraction<'p, P, S, I> = Phrases<Pipe<'p, P, S, I>, I>;

/// Lazy, forward-only stream of [`KeyPhrase`]s over a stream of parsed
/// sentences. Not restartable; ends after the source ends or fails.
pub struct Phrases<S, I> {
    source: S,
    rules: RuleSet,
    mode: InclusionMode,
    current: Option<(Sentence<I>, SentenceScan)>,
    stats: ExtractionStats,
    done: bool,
}

impl<S, I> Phrases<S, I> {
    fn new(rules: RuleSet, source: S, mode: InclusionMode) -> Self {
        Phrases { source, rules, mode, current: None, stats: ExtractionStats::default(), done: false }
    }

    /// Counters for the work done so far.
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }
}

impl<S, I, E> Phrases<S, I>
where
    S: Iterator<Item = Result<Sentence<I>, E>>,
    I: Clone,
{
    fn advance(&mut self) -> Option<Result<KeyPhrase<I>, E>> {
        loop {
            if let Some((sentence, scan)) = self.current.as_mut() {
                if let Some(m) = scan.next_match(&sentence.doc, &self.rules, self.mode, &mut self.stats) {
                    return Some(Ok(build_record(sentence, &self.rules, &m)));
                }
                self.current = None;
            }
            if self.done {
                return None;
            }

            match self.source.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                Some(Ok(sentence)) => {
                    self.stats.sentences += 1;
                    tracing::debug!(tokens = sentence.doc.len(), "sentence");
                    self.current = Some((sentence, SentenceScan::new()));
                }
            }
        }
    }
}

impl<S, I, E> Iterator for Phrases<S, I>
where
    S: Iterator<Item = Result<Sentence<I>, E>>,
    I: Clone,
{
    type Item = Result<KeyPhrase<I>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let started = Instant::now();
        let item = self.advance();
        self.stats.elapsed += started.elapsed();
        item
    }
}

impl<S, I, E> FusedIterator for Phrases<S, I>
where
    S: Iterator<Item = Result<Sentence<I>, E>>,
    I: Clone,
{
}

/// Run the engine over sentences that are already parsed.
pub fn extract_parsed<S, I, E>(rules: &RuleSet, sentences: S, inclusion: impl Into<InclusionMode>) -> Phrases<S::IntoIter, I>
where
    S: IntoIterator<Item = Result<Sentence<I>, E>>,
    I: Clone,
{
    Phrases::new(rules.clone(), sentences.into_iter(), inclusion.into())
}

/// Records for a single parsed sentence.
pub struct SentencePhrases<'a, I> {
    sentence: &'a Sentence<I>,
    rules: &'a RuleSet,
    mode: InclusionMode,
    scan: SentenceScan,
    stats: ExtractionStats,
}

impl<I> SentencePhrases<'_, I> {
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }
}

impl<I: Clone> Iterator for SentencePhrases<'_, I> {
    type Item = KeyPhrase<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.scan.next_match(&self.sentence.doc, self.rules, self.mode, &mut self.stats)?;
        Some(build_record(self.sentence, self.rules, &m))
    }
}

pub fn sentence_phrases<'a, I: Clone>(
    rules: &'a RuleSet,
    sentence: &'a Sentence<I>,
    inclusion: impl Into<InclusionMode>,
) -> SentencePhrases<'a, I> {
    let stats = ExtractionStats { sentences: 1, ..ExtractionStats::default() };
    SentencePhrases { sentence, rules, mode: inclusion.into(), scan: SentenceScan::new(), stats }
}

// --- Tabular materialization ------------------------------------------------

/// Column-oriented collection of records, one `Vec` per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseTable<I = String> {
    pub identifier: Vec<I>,
    pub label: Vec<String>,
    pub phrase: Vec<String>,
    pub phrase_normalized: Vec<String>,
    pub span_start: Vec<usize>,
    pub span_end: Vec<usize>,
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseTableRow<'a, I> {
    pub identifier: &'a I,
    pub label: &'a str,
    pub phrase: &'a str,
    pub phrase_normalized: &'a str,
    pub span: (usize, usize),
}

impl<I> Default for PhraseTable<I> {
    fn default() -> Self {
        PhraseTable {
            identifier: Vec::new(),
            label: Vec::new(),
            phrase: Vec::new(),
            phrase_normalized: Vec::new(),
            span_start: Vec::new(),
            span_end: Vec::new(),
        }
    }
}

impl<I> PhraseTable<I> {
    pub fn push(&mut self, record: KeyPhrase<I>) {
        self.identifier.push(record.identifier);
        self.label.push(record.label);
        self.phrase.push(record.phrase);
        self.phrase_normalized.push(record.phrase_normalized);
        self.span_start.push(record.span.0);
        self.span_end.push(record.span.1);
    }

    pub fn len(&self) -> usize {
        self.identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<PhraseTableRow<'_, I>> {
        Some(PhraseTableRow {
            identifier: self.identifier.get(idx)?,
            label: self.label.get(idx)?,
            phrase: self.phrase.get(idx)?,
            phrase_normalized: self.phrase_normalized.get(idx)?,
            span: (*self.span_start.get(idx)?, *self.span_end.get(idx)?),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = PhraseTableRow<'_, I>> {
        (0..self.len()).filter_map(|idx| self.row(idx))
    }
}

impl<I> Extend<KeyPhrase<I>> for PhraseTable<I> {
    fn extend<T: IntoIterator<Item = KeyPhrase<I>>>(&mut self, iter: T) {
        iter.into_iter().for_each(|record| self.push(record));
    }
}

impl<I> FromIterator<KeyPhrase<I>> for PhraseTable<I> {
    fn from_iter<T: IntoIterator<Item = KeyPhrase<I>>>(iter: T) -> Self {
        let mut table = PhraseTable::default();
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Doc, PretaggedParser, UnknownText, fixtures};

    fn rules() -> RuleSet {
        RuleSet::from_json_str(
            r#"[
                {"label": "ADJ-NOUN", "pattern": [[{"POS": "ADJ"}, {"POS": "NOUN"}]]},
                {"label": "VERB-NOUN", "pattern": [[{"POS": "VERB"}, {"POS": "NOUN"}]]}
            ]"#,
        )
        .unwrap()
    }

    fn matcher() -> KeyPhraseMatcher<PretaggedParser> {
        let parser = [fixtures::rapid_fox(), fixtures::broken_umbrella(), fixtures::two_clauses(), fixtures::no_subject()]
            .into_iter()
            .collect();
        KeyPhraseMatcher::new(parser, rules())
    }

    #[test]
    fn default_options() {
        let options = Options::default();
        assert_eq!(options.batch_size, 25);
        assert_eq!(options.inclusion, InclusionMode::Subtree);
    }

    #[test]
    fn extract_streams_records_in_input_order() {
        let mut matcher = matcher();
        let inputs = [
            ("The old man with the broken umbrella sleeps.", "u1"),
            ("Run fast !", "u2"),
            ("The rapid fox runs", "u3"),
        ];

        let records: Vec<KeyPhrase<&str>> =
            matcher.extract(inputs, 2, false).collect::<Result<_, ParseError<UnknownText>>>().unwrap();
        let rows: Vec<(&str, &str, &str)> =
            records.iter().map(|r| (r.identifier, r.label.as_str(), r.phrase.as_str())).collect();

        assert_eq!(
            rows,
            vec![("u1", "ADJ-NOUN", "old man"), ("u1", "ADJ-NOUN", "broken umbrella"), ("u3", "ADJ-NOUN", "rapid fox")]
        );
    }

    #[test]
    fn batch_size_does_not_change_results() {
        let inputs = [
            ("The old man with the broken umbrella sleeps.", 1),
            ("Sleeping cats dream, and barking dogs wake.", 2),
            ("The rapid fox runs", 3),
        ];
        let mut reference = None;
        for batch_size in [0, 1, 2, 25] {
            let mut matcher = matcher();
            let records: Vec<KeyPhrase<i32>> =
                matcher.extract(inputs, batch_size, true).collect::<Result<_, _>>().unwrap();
            match &reference {
                None => reference = Some(records),
                Some(expected) => assert_eq!(&records, expected, "batch_size {batch_size}"),
            }
        }
    }

    #[test]
    fn parser_error_ends_stream_after_earlier_records() {
        let mut matcher = matcher();
        let inputs = [("The rapid fox runs", 1), ("never registered", 2), ("The rapid fox runs", 3)];
        let results: Vec<Result<KeyPhrase<i32>, ParseError<UnknownText>>> = matcher.extract(inputs, 1, false).collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().phrase, "rapid fox");
        assert_eq!(results[1], Err(ParseError::Parser(UnknownText("never registered".to_string()))));
    }

    #[test]
    fn extract_with_applies_options() {
        let inputs = [("The old man with the broken umbrella sleeps.", "u1"), ("The rapid fox runs", "u2")];
        let options = Options { batch_size: 1, inclusion: InclusionMode::Anchored };

        let mut anchored = matcher();
        let records: Vec<KeyPhrase<&str>> = anchored.extract_with(inputs, &options).collect::<Result<_, _>>().unwrap();
        let phrases: Vec<&str> = records.iter().map(|r| r.phrase.as_str()).collect();
        assert_eq!(phrases, vec!["old man", "rapid fox"]);
        assert_eq!(anchored.parser().calls(), 2);

        let mut defaults = matcher();
        let all: Vec<KeyPhrase<&str>> =
            defaults.extract_with(inputs, &Options::default()).collect::<Result<_, _>>().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(defaults.parser().calls(), 1);
    }

    #[test]
    fn into_parser_returns_the_session() {
        let mut session = matcher();
        let _ = session.extract([("The rapid fox runs", 1), ("Run fast !", 2)], 1, false).count();

        let mut parser = session.into_parser();
        assert_eq!(parser.calls(), 2);
        assert!(parser.parse_batch(&["The rapid fox runs"]).is_ok());
        assert_eq!(parser.calls(), 3);
    }

    #[test]
    fn table_reports_short_parser_batches() {
        struct Empty;

        impl DependencyParser for Empty {
            type Error = UnknownText;

            fn parse_batch(&mut self, _texts: &[&str]) -> Result<Vec<Doc>, Self::Error> {
                Ok(Vec::new())
            }
        }

        let mut matcher = KeyPhraseMatcher::new(Empty, rules());
        let result = matcher.extract_to_table([("The rapid fox runs", 1)], 25, false);
        assert_eq!(result, Err(ParseError::BatchMismatch { expected: 1, got: 0 }));
    }

    #[test]
    fn early_stop_leaves_remaining_inputs_unparsed() {
        let mut matcher = matcher();
        let inputs = [("The rapid fox runs", 1), ("Run fast !", 2), ("The rapid fox runs", 3)];
        let first = matcher.extract(inputs, 1, false).next();

        assert!(first.is_some());
        assert_eq!(matcher.parser().calls(), 1);
    }

    #[test]
    fn stats_track_rejections() {
        let mut matcher = matcher();
        let mut extraction = matcher.extract([("The old man with the broken umbrella sleeps.", 1)], 25, true);
        let records: Vec<_> = extraction.by_ref().collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(records.len(), 1);
        let stats = extraction.stats();
        assert_eq!(stats.sentences, 1);
        assert_eq!(stats.anchors, 1);
        assert_eq!(stats.candidates, 2);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected_missing_anchor, 1);
        assert_eq!(stats.rejected(), 1);
    }

    #[test]
    fn table_materializes_columns() {
        let mut matcher = matcher();
        let table = matcher
            .extract_to_table([("The old man with the broken umbrella sleeps.", "u1"), ("The rapid fox runs", "u2")], 25, false)
            .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.identifier, vec!["u1", "u1", "u2"]);
        assert_eq!(table.phrase_normalized, vec!["old man", "broken umbrella", "rapid fox"]);
        assert_eq!((table.span_start[2], table.span_end[2]), (4, 13));

        let row = table.row(1).unwrap();
        assert_eq!((row.label, row.phrase, row.span), ("ADJ-NOUN", "broken umbrella", (21, 36)));
        assert_eq!(table.rows().count(), 3);
        assert!(table.row(3).is_none());
    }

    #[test]
    fn extract_parsed_passes_source_errors_through() {
        let sentences: Vec<Result<Sentence<u8>, &str>> =
            vec![Ok(fixtures::sentence(1, fixtures::rapid_fox())), Err("broken input"), Ok(fixtures::sentence(2, fixtures::rapid_fox()))];

        let results: Vec<_> = extract_parsed(&rules(), sentences, InclusionMode::Subtree).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().identifier, 1);
        assert_eq!(results[1], Err("broken input"));
    }

    #[test]
    fn from_source_loads_bundled_rules() {
        let matcher = KeyPhraseMatcher::from_source(PretaggedParser::new(), &RuleSource::default()).unwrap();
        assert!(!matcher.rules().is_empty());
    }
}

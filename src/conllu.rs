//! Pre-parsed input in CoNLL-U format.
//!
//! [`ConlluReader`] streams sentences from any `BufRead`, one blank-line
//! separated block at a time, so large treebanks are never held in memory:
//!
//! ```text
//! # sent_id = s1
//! # text = The rapid fox runs
//! 1  The    the    DET   DT   _  3  det    _  _
//! 2  rapid  rapid  ADJ   JJ   _  3  amod   _  _
//! 3  fox    fox    NOUN  NN   _  4  nsubj  _  _
//! 4  runs   run    VERB  VBZ  _  0  root   _  _
//! ```
//!
//! Columns are tab separated. Multiword ranges (`1-2`) and empty nodes (`1.1`)
//! are skipped. `HEAD = 0` marks the root, which points at itself in the
//! resulting [`Doc`]. Without a `# text` comment the text is rebuilt from the
//! forms, honouring `SpaceAfter=No`. Sentences without `# sent_id` are numbered
//! from 1.

use crate::{ConlluError, Doc, Sentence, TokenAnnotation};
use std::io::BufRead;

const COLUMNS: usize = 10;

pub struct ConlluReader<R> {
    reader: R,
    line_no: usize,
    ordinal: usize,
    done: bool,
}

#[derive(Debug, Default)]
struct Block {
    id: Option<String>,
    text: Option<String>,
    rows: Vec<Row>,
}

#[derive(Debug)]
struct Row {
    annotation: TokenAnnotation,
    space_after: bool,
}

impl<R: BufRead> ConlluReader<R> {
    pub fn new(reader: R) -> Self {
        ConlluReader { reader, line_no: 0, ordinal: 0, done: false }
    }

    /// Read lines up to the end of the next block with token rows. Blocks
    /// without rows (comments only, or only ranges and empty nodes) are
    /// skipped. `None` only at end of input.
    fn read_block(&mut self) -> Result<Option<Block>, ConlluError> {
        let mut block = Block::default();
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            self.line_no += 1;
            let trimmed = line.trim_end_matches(['\n', '\r']);

            if trimmed.trim().is_empty() {
                if block.rows.is_empty() {
                    if block.id.is_some() || block.text.is_some() {
                        tracing::debug!(line = self.line_no, id = ?block.id, "skipping block without tokens");
                    }
                    block = Block::default();
                    continue;
                }
                break;
            }
            if let Some(comment) = trimmed.strip_prefix('#') {
                read_comment(comment, &mut block);
                continue;
            }
            if let Some(row) = self.read_row(trimmed)? {
                block.rows.push(row);
            }
        }

        if block.rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(block))
    }

    fn read_row(&self, line: &str) -> Result<Option<Row>, ConlluError> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() != COLUMNS {
            return Err(self.syntax(format!("expected {COLUMNS} tab-separated columns, found {}", cols.len())));
        }
        if cols[0].contains('-') || cols[0].contains('.') {
            return Ok(None);
        }

        let id: usize = cols[0].parse().map_err(|_| self.syntax(format!("invalid token id '{}'", cols[0])))?;
        let head: usize = cols[6].parse().map_err(|_| self.syntax(format!("invalid head '{}'", cols[6])))?;
        if id == 0 {
            return Err(self.syntax("token ids start at 1".to_string()));
        }

        // CoNLL-U ids and heads are 1-based with 0 for the root.
        let head = if head == 0 { id - 1 } else { head - 1 };
        let annotation = TokenAnnotation::new(cols[1], cols[2], cols[3], underscore_empty(cols[4]), cols[7], head)
            .with_morph(underscore_empty(cols[5]));
        let space_after = !cols[9].split('|').any(|misc| misc == "SpaceAfter=No");

        Ok(Some(Row { annotation, space_after }))
    }

    fn syntax(&self, message: String) -> ConlluError {
        ConlluError::Syntax { line: self.line_no, message }
    }

    fn build(&mut self, block: Block) -> Result<Sentence<String>, ConlluError> {
        self.ordinal += 1;
        let id = block.id.unwrap_or_else(|| self.ordinal.to_string());
        let text = block.text.unwrap_or_else(|| rebuild_text(&block.rows));
        let annotations = block.rows.into_iter().map(|row| row.annotation).collect();

        let doc = Doc::align(text, annotations).map_err(|source| ConlluError::Align { line: self.line_no, source })?;
        Ok(Sentence::new(id, doc))
    }
}

fn read_comment(comment: &str, block: &mut Block) {
    let Some((key, value)) = comment.split_once('=') else {
        return;
    };
    match key.trim() {
        "sent_id" => block.id = Some(value.trim().to_string()),
        "text" => block.text = Some(value.trim().to_string()),
        _ => {}
    }
}

fn underscore_empty(value: &str) -> &str {
    if value == "_" { "" } else { value }
}

fn rebuild_text(rows: &[Row]) -> String {
    let mut text = String::new();
    for (i, row) in rows.iter().enumerate() {
        text.push_str(&row.annotation.form);
        if row.space_after && i + 1 < rows.len() {
            text.push(' ');
        }
    }
    text
}

impl<R: BufRead> Iterator for ConlluReader<R> {
    type Item = Result<Sentence<String>, ConlluError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.read_block() {
            Ok(Some(block)) => self.build(block),
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(err) => Err(err),
        };
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "# sent_id = s1\n\
        # text = The rapid fox runs.\n\
        1\tThe\tthe\tDET\tDT\t_\t3\tdet\t_\t_\n\
        2\trapid\trapid\tADJ\tJJ\tDegree=Pos\t3\tamod\t_\t_\n\
        3\tfox\tfox\tNOUN\tNN\tNumber=Sing\t4\tnsubj\t_\t_\n\
        4\truns\trun\tVERB\tVBZ\t_\t0\troot\t_\tSpaceAfter=No\n\
        5\t.\t.\tPUNCT\t.\t_\t4\tpunct\t_\t_\n\
        \n";

    fn read_all(input: &str) -> Vec<Result<Sentence<String>, ConlluError>> {
        ConlluReader::new(input.as_bytes()).collect()
    }

    #[test]
    fn reads_sentence_with_metadata() {
        let sentences = read_all(FOX);
        assert_eq!(sentences.len(), 1);
        let sentence = sentences.into_iter().next().unwrap().unwrap();

        assert_eq!(sentence.id, "s1");
        assert_eq!(sentence.doc.text, "The rapid fox runs.");
        let fox = &sentence.doc.tokens[2];
        assert_eq!((fox.head, fox.dep.as_str(), fox.morph.as_str()), (3, "nsubj", "Number=Sing"));
        let runs = &sentence.doc.tokens[3];
        assert_eq!(runs.head, 3);
        assert!(runs.morph.is_empty());
        assert!(sentence.doc.tokens[4].is_punct);
        assert_eq!((sentence.doc.tokens[4].start_char, sentence.doc.tokens[4].end_char), (18, 19));
    }

    #[test]
    fn rebuilds_text_and_numbers_sentences() {
        let input = "1\tDogs\tdog\tNOUN\tNNS\t_\t2\tnsubj\t_\t_\n\
            2\tbark\tbark\tVERB\tVBP\t_\t0\troot\t_\tSpaceAfter=No\n\
            3\t!\t!\tPUNCT\t.\t_\t2\tpunct\t_\t_\n\
            \n\n\
            1-2\tdon't\t_\t_\t_\t_\t_\t_\t_\t_\n\
            1\tdo\tdo\tAUX\tVBP\t_\t3\taux\t_\t_\n\
            2\tn't\tnot\tPART\tRB\t_\t3\tneg\t_\t_\n\
            3\tgo\tgo\tVERB\tVB\t_\t0\troot\t_\t_\n";
        let sentences: Vec<Sentence<String>> = read_all(input).into_iter().map(Result::unwrap).collect();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].id, "1");
        assert_eq!(sentences[0].doc.text, "Dogs bark!");
        assert_eq!(sentences[1].id, "2");
        assert_eq!(sentences[1].doc.text, "do n't go");
        assert_eq!(sentences[1].doc.len(), 3);
    }

    #[test]
    fn reports_bad_column_count_with_line() {
        let results = read_all("# sent_id = x\n1\tDogs\tdog\n");
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ConlluError::Syntax { line: 2, .. })));
    }

    #[test]
    fn reports_text_mismatch() {
        let input = "# text = Cats sleep\n1\tDogs\tdog\tNOUN\tNNS\t_\t2\tnsubj\t_\t_\n2\tbark\tbark\tVERB\tVBP\t_\t0\troot\t_\t_\n";
        let results = read_all(input);
        assert!(matches!(results[0], Err(ConlluError::Align { .. })));
    }

    #[test]
    fn blocks_without_tokens_do_not_end_the_stream() {
        let input = "# sent_id = header\n\
            \n\
            1-2\tdon't\t_\t_\t_\t_\t_\t_\t_\t_\n\
            \n\
            # sent_id = s1\n\
            1\tDogs\tdog\tNOUN\tNNS\t_\t2\tnsubj\t_\t_\n\
            2\tbark\tbark\tVERB\tVBP\t_\t0\troot\t_\t_\n\
            \n\
            # text = trailing comment only\n";
        let sentences: Vec<Sentence<String>> = read_all(input).into_iter().map(Result::unwrap).collect();

        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].id, "s1");
        assert_eq!(sentences[0].doc.text, "Dogs bark");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(read_all("").is_empty());
        assert!(read_all("\n\n").is_empty());
    }
}

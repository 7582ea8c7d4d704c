use keynp::{ExtractionStats, InclusionMode, KeyPhrase, PhraseTable};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(source: &str, mode: InclusionMode, records: &[KeyPhrase], stats: &ExtractionStats, color: bool) {
    let palette = ansi::Palette::new(color);
    let mode = match mode {
        InclusionMode::Subtree => "subtree",
        InclusionMode::Anchored => "anchored",
    };
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Extracting: {source} ({mode})"), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Scan ━━━", ansi::GRAY));
    print_scan(stats, &palette);

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if records.is_empty() {
        println!("{}", palette.dim("  No key phrases"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No nsubj/nsubjpass token with a VERB head");
        println!("  • No pattern matched inside the subject subtrees");
        println!("  • Inclusion mode rejected every candidate");
        println!("\n{}", palette.dim("  Tip: Set KEYNP_LOG=keynp=trace to see every window and rejection"));
    } else {
        print_results(records, &palette);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", stats.elapsed), ansi::GREEN));
    println!();
}

fn print_scan(stats: &ExtractionStats, palette: &ansi::Palette) {
    println!(
        "  {} {}  {} {}  {} {}",
        palette.paint("Sentences:", ansi::BLUE),
        stats.sentences,
        palette.paint("Anchors:", ansi::BLUE),
        stats.anchors,
        palette.paint("Candidates:", ansi::BLUE),
        stats.candidates,
    );
    println!(
        "  {} {}  {} {}",
        palette.paint("Accepted:", ansi::BLUE),
        if stats.accepted > 0 {
            palette.paint(format!("✓ {}", stats.accepted), ansi::GREEN)
        } else {
            palette.dim(format!("✗ {}", stats.accepted))
        },
        palette.paint("Rejected:", ansi::BLUE),
        palette.dim(format!(
            "{} (anchor outside: {}, no verb form: {})",
            stats.rejected(),
            stats.rejected_missing_anchor,
            stats.rejected_missing_verb_form
        )),
    );
}

fn print_results(records: &[KeyPhrase], palette: &ansi::Palette) {
    let mut current: Option<&str> = None;
    for (idx, record) in records.iter().enumerate() {
        if current != Some(record.identifier.as_str()) {
            println!("  {}", palette.bold(palette.paint(format!("# {}", record.identifier), ansi::CYAN)));
            current = Some(record.identifier.as_str());
        }
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(&record.phrase, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("span {}..{}", record.span.0, record.span.1), ansi::YELLOW),
        );
        println!(
            "      {} {}  {} {}",
            palette.dim("rule:"),
            palette.paint(&record.label, ansi::BLUE),
            palette.dim("│ normalized:"),
            palette.paint(&record.phrase_normalized, ansi::CYAN)
        );
    }
}

/// Column-aligned table, one row per record.
pub fn print_table(table: &PhraseTable, color: bool) {
    let palette = ansi::Palette::new(color);
    let header = ["identifier", "label", "phrase", "phrase_normalized", "span_start", "span_end"];
    let rows: Vec<[String; 6]> = table
        .rows()
        .map(|row| {
            [
                row.identifier.clone(),
                row.label.to_string(),
                row.phrase.to_string(),
                row.phrase_normalized.to_string(),
                row.span.0.to_string(),
                row.span.1.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells.iter().zip(widths).map(|(cell, width)| pad(cell, width)).collect::<Vec<_>>().join("  ").trim_end().to_string()
    };
    println!("{}", palette.bold(line(&header.map(str::to_string))));
    for row in &rows {
        println!("{}", line(row));
    }
    println!("{}", palette.dim(format!("({} rows)", rows.len())));
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

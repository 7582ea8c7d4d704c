mod debug_report;

use keynp::{ConlluReader, InclusionMode, KeyPhrase, Language, PhraseTable, RuleSource, extract_parsed};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "KEYNP_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(io::stderr).init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Jsonl,
    Table,
    Report,
}

struct CliConfig {
    input: Option<PathBuf>,
    rules: RuleSource,
    inclusion: InclusionMode,
    format: Format,
    color: bool,
}

fn run(config: &CliConfig) -> Result<(), String> {
    let rules = config.rules.load().map_err(|err| format!("error: {err}"))?;
    let reader: Box<dyn BufRead> = match &config.input {
        Some(path) => {
            let file = File::open(path).map_err(|err| format!("error: cannot open {}: {err}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let source = config.input.as_ref().map_or_else(|| "<stdin>".to_string(), |path| path.display().to_string());

    let mut phrases = extract_parsed(&rules, ConlluReader::new(reader), config.inclusion);
    match config.format {
        Format::Jsonl => {
            let mut out = BufWriter::new(io::stdout().lock());
            for record in phrases.by_ref() {
                let record = record.map_err(|err| format!("error: {err}"))?;
                let line = serde_json::to_string(&record).map_err(|err| format!("error: {err}"))?;
                writeln!(out, "{line}").map_err(write_error)?;
            }
            out.flush().map_err(write_error)?;
        }
        Format::Table => {
            let table: PhraseTable = phrases.by_ref().collect::<Result<_, _>>().map_err(|err| format!("error: {err}"))?;
            debug_report::print_table(&table, config.color);
        }
        Format::Report => {
            let records: Vec<KeyPhrase> =
                phrases.by_ref().collect::<Result<_, _>>().map_err(|err| format!("error: {err}"))?;
            debug_report::print_run(&source, config.inclusion, &records, phrases.stats(), config.color);
        }
    }

    let stats = phrases.stats();
    tracing::info!(
        sentences = stats.sentences,
        anchors = stats.anchors,
        accepted = stats.accepted,
        rejected = stats.rejected(),
        elapsed = ?stats.elapsed,
        "extraction finished"
    );
    Ok(())
}

fn write_error(err: io::Error) -> String {
    format!("error: failed to write output: {err}")
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<PathBuf> = None;
    let mut rules_path: Option<PathBuf> = None;
    let mut language = Language::default();
    let mut inclusion = InclusionMode::Subtree;
    let mut format = Format::Jsonl;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("keynp {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--inclusion" => inclusion = InclusionMode::Anchored,
            "--rules" => {
                let value = args.next().ok_or_else(|| "error: --rules expects a path".to_string())?;
                rules_path = Some(PathBuf::from(value));
            }
            "--lang" => {
                let value = args.next().ok_or_else(|| "error: --lang expects a value".to_string())?;
                language = parse_language(&value)?;
            }
            "--format" => {
                let value = args.next().ok_or_else(|| "error: --format expects a value".to_string())?;
                format = parse_format(&value)?;
            }
            "-" => set_input(&mut input, PathBuf::new())?,
            _ if arg.starts_with("--rules=") => rules_path = Some(PathBuf::from(arg.trim_start_matches("--rules="))),
            _ if arg.starts_with("--lang=") => language = parse_language(arg.trim_start_matches("--lang="))?,
            _ if arg.starts_with("--format=") => format = parse_format(arg.trim_start_matches("--format="))?,
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => set_input(&mut input, PathBuf::from(arg))?,
        }
    }

    if input.is_none() && io::stdin().is_terminal() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }
    // An explicit `-` reads stdin even from a terminal.
    let input = input.filter(|path| !path.as_os_str().is_empty());

    let rules = match rules_path {
        Some(path) => RuleSource::File(path),
        None => RuleSource::Bundled(language),
    };

    Ok(CliConfig { input, rules, inclusion, format, color })
}

fn set_input(input: &mut Option<PathBuf>, value: PathBuf) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse().map_err(|err| format!("error: invalid --lang: {err}"))
}

fn parse_format(value: &str) -> Result<Format, String> {
    match value {
        "jsonl" | "json" => Ok(Format::Jsonl),
        "table" => Ok(Format::Table),
        "report" => Ok(Format::Report),
        _ => Err(format!("error: invalid --format '{value}' (expected jsonl, table or report)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "keynp {version}

Extract key noun phrases from dependency-parsed sentences.

Usage:
  keynp [OPTIONS] [FILE]

Reads CoNLL-U from FILE, or from stdin when FILE is omitted or '-'.

Options:
  --rules <path>             Rule file (JSON list of {{label, pattern}}).
                             Overrides --lang.
  --lang <en|ru>             Bundled rule set. Default: en
  --inclusion                Keep only phrases containing the subject; verb
                             rules also need a gerund or past participle.
  --format <jsonl|table|report>
                             Output format. Default: jsonl
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                  Log filter, e.g. keynp=debug. Default: warn

Exit codes:
  0  Success.
  1  Rule, input or output error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}

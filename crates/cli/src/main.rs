use std::path::PathBuf;

use anyhow::{Context, Result};
use argslot::{
    ParseOutcome, Parser, Repeat, SlotInfo, convert, default_text, implicit, name, pattern,
    positional, predicate_labeled, repeatable, required,
};
use tracing_subscriber::{EnvFilter, fmt};

/// Everything the demo's command line can set.
#[derive(Debug)]
struct DemoArgs {
    count: i32,
    numbers: Vec<i32>,
    letter: Option<char>,
    word: Option<String>,
    file: PathBuf,
    size: u64,
    level: u8,
    verbose: bool,
    schema: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            count: 1,
            numbers: Vec::new(),
            letter: None,
            word: None,
            file: PathBuf::new(),
            size: 0,
            level: 0,
            verbose: false,
            schema: false,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let mut args = DemoArgs::default();
    let (outcome, slots) = bind(&mut args, std::env::args())?;

    if let ParseOutcome::Help(text) = outcome {
        print!("{text}");
        return Ok(());
    }
    tracing::debug!(?args, "command line bound");

    if args.schema {
        let json = serde_json::to_string_pretty(&slots).context("failed to serialize slots")?;
        println!("{json}");
        return Ok(());
    }

    print_args(&args);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Register every demo slot and parse `argv` into `args`.
fn bind<I>(args: &mut DemoArgs, argv: I) -> Result<(ParseOutcome, Vec<SlotInfo>)>
where
    I: IntoIterator<Item = String>,
{
    let mut p = Parser::new();
    p.program("argslot-demo")
        .about("Bind a command line into typed values");
    p.help(('h', "--help"))?;
    p.arg_with(
        &mut args.count,
        ('n', "--count"),
        "How many times",
        [name("count"), default_text(None)],
    )?;
    p.arg_with(
        &mut args.numbers,
        ('b', "--numbers"),
        "Numbers to collect",
        [name("numbers"), repeatable(Repeat::Times(4)), positional(2)],
    )?;
    p.arg_with(&mut args.letter, 'c', "Single letter", [name("letter")])?;
    p.arg_with(
        &mut args.word,
        predicate_labeled("t*", |s| s.starts_with('t')),
        "Word starting with 't'",
        [name("word")],
    )?;
    p.arg_with(
        &mut args.file,
        pattern(r".*\.txt").case_insensitive(true),
        "Text file",
        [name("file"), required()],
    )?;
    p.arg_with(
        &mut args.size,
        ('s', "--size"),
        "Size with optional k/m suffix",
        [name("size"), convert(parse_size)],
    )?;
    p.arg_with(
        &mut args.level,
        "--level",
        "Detail level, 3 when given without a value",
        [name("level"), implicit(3u8)],
    )?;
    p.arg_with(
        &mut args.verbose,
        ('v', "--verbose"),
        "Verbose output",
        [name("verbose")],
    )?;
    p.arg_with(
        &mut args.schema,
        "--schema",
        "Print the argument schema as JSON",
        [name("schema")],
    )?;

    tracing::debug!(slots = p.registry().len(), "registered demo arguments");

    let outcome = match p.parse(argv) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(subject = err.subject(), "command line rejected");
            return Err(err.into());
        }
    };
    Ok((outcome, p.describe()))
}

fn parse_size(raw: &str) -> Result<u64, String> {
    let (digits, factor) = match raw.as_bytes().last() {
        Some(b'k' | b'K') => (&raw[..raw.len() - 1], 1024),
        Some(b'm' | b'M') => (&raw[..raw.len() - 1], 1024 * 1024),
        _ => (raw, 1),
    };
    let n: u64 = digits.parse().map_err(|e| format!("{e}"))?;
    n.checked_mul(factor)
        .ok_or_else(|| "size overflows u64".to_string())
}

fn print_args(args: &DemoArgs) {
    println!("count: {}", args.count);
    println!("numbers: {:?}", args.numbers);
    if let Some(letter) = args.letter {
        println!("letter: {letter}");
    }
    if let Some(word) = &args.word {
        println!("word: {word}");
    }
    println!("file: {}", args.file.display());
    println!("size: {}", args.size);
    println!("level: {}", args.level);
    println!("verbose: {}", args.verbose);
}

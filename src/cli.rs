use std::io::{self, BufWriter};
use std::process;

use getopts::{Matches, Options};

use crate::counters;
use crate::diagnostics::{self, LogDiagnostics};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::interleave;
use crate::mapped::MappedText;
use crate::relabel;

/// Runs `tool` with the process arguments and exits non-zero on failure.
pub fn main(tool: fn(&[String]) -> Result<()>) {
    diagnostics::init_logging();
    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = tool(&args) {
        log::error!("{}", err);
        process::exit(1);
    }
}

// `None` means help was requested and printed.
fn parse(args: &[String], usage: &str) -> Result<Option<Matches>> {
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help and exit");
    let matches = opts.parse(args.iter().skip(1)).map_err(|err| Error::Usage(format!("{}\n{}", err, opts.short_usage(usage))))?;
    if matches.opt_present("h") {
        eprint!("{}", opts.usage(&format!("usage: {}", usage)));
        return Ok(None);
    }
    Ok(Some(matches))
}

fn program(args: &[String], default: &str) -> String {
    args.first().cloned().unwrap_or_else(|| default.to_owned())
}

/// `normalize_gplus [INPUT]` and `normalize_snap [INPUT]`: relabel an edge list
/// from INPUT or stdin onto stdout.
pub fn normalize(args: &[String], dialect: Dialect) -> Result<()> {
    let usage = format!("{} [INPUT]", program(args, "normalize"));
    let matches = match parse(args, &usage)? {
        Some(matches) => matches,
        None => return Ok(()),
    };

    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());
    let mut diagnostics = LogDiagnostics::new();
    match matches.free.as_slice() {
        [] => {
            let stdin = io::stdin();
            relabel::normalize(stdin.lock(), output, dialect, &mut diagnostics)?;
        }
        [path] => {
            let mapped = MappedText::open(path)?;
            relabel::normalize(&mapped[..], output, dialect, &mut diagnostics)?;
        }
        _ => return Err(Error::Usage(format!("too many arguments\nusage: {}", usage))),
    }
    Ok(())
}

/// `papi_pair FILE...`: interleave counter and measurement lines of each FILE.
pub fn pair(args: &[String]) -> Result<()> {
    let usage = format!("{} FILE...", program(args, "papi_pair"));
    let matches = match parse(args, &usage)? {
        Some(matches) => matches,
        None => return Ok(()),
    };
    for path in &matches.free {
        interleave::interleave_file(path)?;
    }
    Ok(())
}

/// `papi_transform`: one CSV row per run from the log on stdin.
pub fn transform(args: &[String]) -> Result<()> {
    let usage = program(args, "papi_transform");
    let matches = match parse(args, &usage)? {
        Some(matches) => matches,
        None => return Ok(()),
    };
    if !matches.free.is_empty() {
        return Err(Error::Usage(format!("unexpected arguments\nusage: {}", usage)));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    counters::transform(stdin.lock(), BufWriter::new(stdout.lock()))?;
    Ok(())
}

#[cfg(test)]
fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn help_and_usage_errors() {
    assert!(pair(&args(&["papi_pair", "--help"])).is_ok());
    assert!(transform(&args(&["papi_transform", "-h"])).is_ok());
    assert!(normalize(&args(&["normalize_snap", "-h"]), Dialect::Sparse).is_ok());

    match normalize(&args(&["normalize_gplus", "a", "b"]), Dialect::Dense) {
        Err(Error::Usage(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    match transform(&args(&["papi_transform", "--bogus"])) {
        Err(Error::Usage(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn pair_files() {
    let dir = ::tempdir::TempDir::new("pair_files").unwrap();
    let first = dir.path().join("a.log");
    let second = dir.path().join("b.log");
    std::fs::write(&first, "x\nPAPI,1\n").unwrap();
    std::fs::write(&second, "PAPI,2\ny\n").unwrap();

    let list = vec!["papi_pair".to_owned(), first.display().to_string(), second.display().to_string()];
    pair(&list).unwrap();
    assert_eq!(std::fs::read_to_string(&first).unwrap(), "PAPI,1\nx\n");
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "PAPI,2\ny\n");
}

#[test]
fn normalize_missing_file() {
    let dir = ::tempdir::TempDir::new("normalize_missing_file").unwrap();
    let missing = dir.path().join("absent.txt").display().to_string();
    match normalize(&args(&["normalize_snap", &missing]), Dialect::Sparse) {
        Err(Error::Io(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

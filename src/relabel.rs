use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, Write};

use crate::diagnostics::Diagnostics;
use crate::dialect::{strip_terminator, Dialect};
use crate::error::{Error, Result};

/// Accepted edges between two progress ticks.
pub const PROGRESS_EVERY: usize = 100_000;

/// Vertex and edge counts of a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub vertices: usize,
    pub edges: usize,
}

impl Summary {
    /// The two lines a consumer expects at the top of the edge list.
    pub fn header(&self) -> String {
        format!("# Comment\n{} {}\n", self.vertices, self.edges)
    }
}

/// A relabeled edge, printed with its unit weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} 1", self.source, self.target)
    }
}

/// Maps raw vertex identifiers onto `0..vertices()` in order of first appearance.
#[derive(Debug, Default)]
pub struct Relabeler {
    labels: HashMap<u64, usize>,
    edges: usize,
}

impl Relabeler {
    pub fn new() -> Relabeler { Relabeler::default() }

    /// Returns the label of `raw`, assigning the next free one if it is new.
    pub fn label(&mut self, raw: u64) -> usize {
        let next = self.labels.len();
        *self.labels.entry(raw).or_insert(next)
    }

    /// Translates both endpoints (source first) and counts the edge if the
    /// dialect accepts it. Labels are assigned even for a dropped self-loop.
    pub fn push(&mut self, source: u64, target: u64, dialect: Dialect) -> Option<Edge> {
        let edge = Edge { source: self.label(source), target: self.label(target) };
        if edge.source == edge.target && !dialect.keeps_self_loops() {
            return None;
        }
        self.edges += 1;
        Some(edge)
    }

    pub fn vertices(&self) -> usize { self.labels.len() }
    pub fn edges(&self) -> usize { self.edges }

    pub fn summary(&self) -> Summary {
        Summary { vertices: self.vertices(), edges: self.edges() }
    }
}

/// Relabels the edge list read from `input`, writing `"<src> <dst> 1"` lines to
/// `output`. Progress and the closing summary go to `diagnostics` only.
pub fn normalize<R, W, D>(mut input: R, mut output: W, dialect: Dialect, diagnostics: &mut D) -> Result<Summary>
where R: BufRead, W: Write, D: Diagnostics
{
    let mut relabeler = Relabeler::new();

    // lines are bytes: comments may hold anything, edges are checked as ASCII
    let mut line = Vec::new();
    let mut number = 0;
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        number += 1;
        if dialect.is_comment(&line) {
            continue;
        }

        let (source, target) = dialect.parse(&line).ok_or_else(|| Error::MalformedLine {
            line: number,
            text: String::from_utf8_lossy(strip_terminator(&line)).into_owned(),
        })?;
        log::trace!("{} {}", source, target);

        if let Some(edge) = relabeler.push(source, target, dialect) {
            writeln!(output, "{}", edge)?;
            if relabeler.edges() % PROGRESS_EVERY == 0 {
                diagnostics.progress(relabeler.edges() / PROGRESS_EVERY);
            }
        }
    }
    output.flush()?;

    let summary = relabeler.summary();
    diagnostics.finished(&summary);
    Ok(summary)
}

#[cfg(test)]
fn run(input: &str, dialect: Dialect) -> (String, Summary, Vec<usize>) {
    let mut output = Vec::new();
    let mut recorder = crate::diagnostics::Recorder::default();
    let summary = normalize(input.as_bytes(), &mut output, dialect, &mut recorder).unwrap();
    assert_eq!(recorder.finished, vec![summary]);
    (String::from_utf8(output).unwrap(), summary, recorder.ticks)
}

#[test]
fn label_first_seen() {
    let mut relabeler = Relabeler::new();
    assert_eq!(relabeler.label(42), 0);
    assert_eq!(relabeler.label(7), 1);
    assert_eq!(relabeler.label(42), 0);
    assert_eq!(relabeler.label(0), 2);
    assert_eq!(relabeler.vertices(), 3);
    assert_eq!(relabeler.edges(), 0);
}

#[test]
fn dense_scenario() {
    let (output, summary, ticks) = run("0 1\n1 2\n0 2\n", Dialect::Dense);
    assert_eq!(output, "0 1 1\n1 2 1\n0 2 1\n");
    assert_eq!(summary, Summary { vertices: 3, edges: 3 });
    assert!(ticks.is_empty());
}

#[test]
fn dense_keeps_self_loops() {
    let (output, summary, _) = run("5 5\n5 9\n", Dialect::Dense);
    assert_eq!(output, "0 0 1\n0 1 1\n");
    assert_eq!(summary, Summary { vertices: 2, edges: 2 });
}

#[test]
fn sparse_drops_self_loops() {
    let (output, summary, _) = run("1\t1\n1\t2\n", Dialect::Sparse);
    assert_eq!(output, "0 1 1\n");
    assert_eq!(summary, Summary { vertices: 2, edges: 1 });
}

#[test]
fn sparse_dropped_loop_still_labels() {
    let (output, summary, _) = run("9\t9\n3\t9\n", Dialect::Sparse);
    assert_eq!(output, "1 0 1\n");
    assert_eq!(summary, Summary { vertices: 2, edges: 1 });
}

#[test]
fn sparse_comments_and_reversed_edges() {
    let (output, summary, _) = run("# header\n10\t20\n20\t10\n", Dialect::Sparse);
    assert_eq!(output, "0 1 1\n1 0 1\n");
    assert_eq!(summary, Summary { vertices: 2, edges: 2 });

    let (output, summary, _) = run("# 5\t6\n", Dialect::Sparse);
    assert_eq!(output, "");
    assert_eq!(summary, Summary::default());
}

#[test]
fn empty_input() {
    for &dialect in &[Dialect::Dense, Dialect::Sparse] {
        let (output, summary, ticks) = run("", dialect);
        assert_eq!(output, "");
        assert_eq!(summary, Summary { vertices: 0, edges: 0 });
        assert!(ticks.is_empty());
    }
}

#[test]
fn malformed_line_aborts() {
    let mut output = Vec::new();
    let mut recorder = crate::diagnostics::Recorder::default();
    let result = normalize(&b"0 1\n1\t2\n2 3\n"[..], &mut output, Dialect::Dense, &mut recorder);
    match result {
        Err(Error::MalformedLine { line, text }) => {
            assert_eq!(line, 2);
            assert_eq!(text, "1\t2");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(recorder.finished.is_empty());

    // comment lines still count towards line numbers
    let result = normalize(&b"# c\n1\t2\n\n"[..], Vec::new(), Dialect::Sparse, &mut recorder);
    match result {
        Err(Error::MalformedLine { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn non_utf8_input() {
    let mut output = Vec::new();
    let mut recorder = crate::diagnostics::Recorder::default();
    let summary = normalize(&b"# Author: Jos\xe9\n1\t2\n"[..], &mut output, Dialect::Sparse, &mut recorder).unwrap();
    assert_eq!(output, b"0 1 1\n");
    assert_eq!(summary, Summary { vertices: 2, edges: 1 });

    let result = normalize(&b"1 2\n3 \xff\n"[..], Vec::new(), Dialect::Dense, &mut recorder);
    match result {
        Err(Error::MalformedLine { line, text }) => {
            assert_eq!(line, 2);
            assert_eq!(text, "3 \u{fffd}");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn progress_ticks() {
    let mut input = String::new();
    for i in 0..(2 * PROGRESS_EVERY + 17) {
        input.push_str(&format!("{}\t{}\n", i, i + 1));
        // self-loops are not accepted and must not move the counter
        if i % 1000 == 0 {
            input.push_str(&format!("{}\t{}\n", i, i));
        }
    }
    let (_, summary, ticks) = run(&input, Dialect::Sparse);
    assert_eq!(summary.edges, 2 * PROGRESS_EVERY + 17);
    assert_eq!(ticks, vec![1, 2]);
}

#[test]
fn summary_header() {
    assert_eq!(Summary { vertices: 3, edges: 2 }.header(), "# Comment\n3 2\n");
}

#[test]
fn random_lists_are_relabeled_densely() {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::HashSet;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..20 {
        let dialect = if round % 2 == 0 { Dialect::Dense } else { Dialect::Sparse };
        let mut input = String::new();
        let mut raw = Vec::new();
        let mut accepted = 0;
        for _ in 0..rng.gen_range(0..500) {
            let (s, d) = (rng.gen_range(0..100_000u64), rng.gen_range(0..100_000u64));
            let (s, d) = if rng.gen_bool(0.1) { (s, s) } else { (s, d) };
            input.push_str(&format!("{}{}{}\n", s, dialect.separator(), d));
            raw.push(s);
            raw.push(d);
            if s != d || dialect.keeps_self_loops() {
                accepted += 1;
            }
        }

        let (output, summary, _) = run(&input, dialect);
        assert_eq!(run(&input, dialect).0, output);

        // first appearance order, over all endpoints including dropped loops
        let mut seen = HashSet::new();
        let first: Vec<u64> = raw.iter().cloned().filter(|x| seen.insert(*x)).collect();
        assert_eq!(summary.vertices, first.len());
        assert_eq!(summary.edges, accepted);

        let position = |x: u64| first.iter().position(|&y| y == x).unwrap();
        let expected: Vec<String> = raw
            .chunks(2)
            .filter(|pair| pair[0] != pair[1] || dialect.keeps_self_loops())
            .map(|pair| format!("{} {} 1", position(pair[0]), position(pair[1])))
            .collect();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, expected);
    }
}

// Experiment logs look like
//
//     PAPI,<c1>,<c2>,...      counter rows of one run
//     PAPI,<c1>,<c2>,...
//     /scratch/<path>,<params>   names the run the rows above belong to
//
// interleaved with scheduler chatter. Each run becomes one CSV row holding the
// run's name followed by the column-wise maxima of its counters.

use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Starts the name of a run.
pub const MARKER: &str = "/scratch";
/// Lines containing any of these are dropped before anything else.
pub const NOISE: [&str; 3] = ["slurm", "srun", "[unset]"];
/// Width of the empty row printed for a run without counters.
pub const COUNTER_COLUMNS: usize = 8;

/// One run: its name and the counter rows logged before it.
#[derive(Debug, PartialEq)]
pub struct Block<'a> {
    pub header: &'a str,
    pub rows: Vec<&'a str>,
}

/// Splits `text` into blocks. Rows after the last marker belong to no run and
/// are dropped.
pub fn blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut rows = Vec::new();

    for line in text.lines().filter(|line| !NOISE.iter().any(|noise| line.contains(noise))) {
        match line.find(MARKER).filter(|&at| at + MARKER.len() < line.len()) {
            Some(at) => {
                let (before, header) = line.split_at(at);
                push_row(&mut rows, before);
                blocks.push(Block { header: header.trim(), rows: std::mem::take(&mut rows) });
            }
            None => push_row(&mut rows, line),
        }
    }

    blocks
}

fn push_row<'a>(rows: &mut Vec<&'a str>, line: &'a str) {
    let line = line.trim();
    if !line.is_empty() {
        rows.push(line);
    }
}

impl<'a> Block<'a> {
    /// Column-wise maxima of the counter rows, `None` if there are no rows.
    pub fn maxima(&self) -> Result<Option<Vec<f64>>> {
        let mut maxima: Option<Vec<f64>> = None;
        for row in &self.rows {
            let values = self.parse_row(row)?;
            maxima = Some(match maxima {
                None => values,
                Some(current) => {
                    if current.len() != values.len() {
                        return Err(Error::RaggedBlock { header: self.header.to_owned() });
                    }
                    current.iter().zip(values.iter()).map(|(a, b)| a.max(*b)).collect()
                }
            });
        }
        Ok(maxima)
    }

    fn parse_row(&self, row: &str) -> Result<Vec<f64>> {
        let row = row.replacen("PAPI,", "", 1);
        let row = row.trim_end_matches(',');
        if row.is_empty() {
            return Ok(Vec::new());
        }
        row.split(',')
           .map(|field| field.trim().parse::<f64>().map_err(|_| Error::MalformedCounter {
               header: self.header.to_owned(),
               field: field.to_owned(),
           }))
           .collect()
    }

    /// The CSV row for this run.
    pub fn to_csv(&self) -> Result<String> {
        let name = self.header.replace("stoer-wagner,", "0,stoer-wagner,");
        Ok(match self.maxima()? {
            Some(maxima) => {
                let fields: Vec<String> = maxima.iter().map(|&x| format_counter(x)).collect();
                format!("{},{}", name, fields.join(","))
            }
            None => format!("{},{}", name, ",".repeat(COUNTER_COLUMNS - 1)),
        })
    }
}

/// Prints a counter as the collecting scripts did: shortest round-trip digits,
/// integral values keep a trailing `.0`, and magnitudes from 1e16 up or below
/// 1e-4 switch to `1.0e+16` / `1.0e-05` exponent form.
pub fn format_counter(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        return format!("{}", value);
    }
    if magnitude != 0.0 && (magnitude >= 1e16 || magnitude < 1e-4) {
        let text = format!("{:e}", value);
        if let Some((mantissa, exponent)) = text.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", with_point(mantissa), sign, exponent.abs());
            }
        }
        return text;
    }
    with_point(&format!("{}", value))
}

fn with_point(digits: &str) -> String {
    if digits.contains('.') { digits.to_owned() } else { format!("{}.0", digits) }
}

/// Reads a whole log from `input` and writes one CSV row per run to `output`.
pub fn transform<R: Read, W: Write>(mut input: R, mut output: W) -> Result<usize> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let blocks = blocks(&text);
    for block in &blocks {
        writeln!(output, "{}", block.to_csv()?)?;
    }
    output.flush()?;

    log::debug!("{} runs summarized", blocks.len());
    Ok(blocks.len())
}

#[test]
fn split_into_blocks() {
    let text = "\
PAPI,1,5
srun: job started
PAPI,3,2
/scratch/u/bin/karger_stein,g.txt,4
[unset]
extra /scratch/u/bin/stoer-wagner,h.txt,1
PAPI,7,7
";
    assert_eq!(blocks(text), vec![
        Block { header: "/scratch/u/bin/karger_stein,g.txt,4", rows: vec!["PAPI,1,5", "PAPI,3,2"] },
        Block { header: "/scratch/u/bin/stoer-wagner,h.txt,1", rows: vec!["extra"] },
    ]);
}

#[test]
fn bare_marker_is_data() {
    assert_eq!(blocks("/scratch\n/scratch/x\n"), vec![
        Block { header: "/scratch/x", rows: vec!["/scratch"] },
    ]);
}

#[test]
fn column_maxima() {
    let block = Block { header: "/scratch/a,stoer-wagner,3", rows: vec!["PAPI,1,5,2.5", "PAPI,3,2,0.5"] };
    assert_eq!(block.maxima().unwrap(), Some(vec![3.0, 5.0, 2.5]));
    assert_eq!(block.to_csv().unwrap(), "/scratch/a,0,stoer-wagner,3,3.0,5.0,2.5");
}

#[test]
fn empty_block() {
    let block = Block { header: "/scratch/a,2", rows: vec![] };
    assert_eq!(block.to_csv().unwrap(), "/scratch/a,2,,,,,,,,");
}

#[test]
fn malformed_and_ragged() {
    let block = Block { header: "/scratch/a", rows: vec!["PAPI,1,x"] };
    match block.to_csv() {
        Err(Error::MalformedCounter { field, .. }) => assert_eq!(field, "x"),
        other => panic!("unexpected result: {:?}", other),
    }

    let block = Block { header: "/scratch/a", rows: vec!["PAPI,1,2", "PAPI,1"] };
    match block.to_csv() {
        Err(Error::RaggedBlock { header }) => assert_eq!(header, "/scratch/a"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn transform_log() {
    let log = "\
/scratch/bin/metis,empty
PAPI,10,20
PAPI,30,5
slurmstepd: cancelled
/scratch/bin/stoer-wagner,g,2
PAPI,1,1
";
    let mut output = Vec::new();
    assert_eq!(transform(log.as_bytes(), &mut output).unwrap(), 2);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "/scratch/bin/metis,empty,,,,,,,,\n/scratch/bin/0,stoer-wagner,g,2,30.0,20.0\n"
    );
    assert_eq!(format_counter(1.5), "1.5");
}

#[test]
fn counter_notation() {
    assert_eq!(format_counter(0.0), "0.0");
    assert_eq!(format_counter(12.0), "12.0");
    assert_eq!(format_counter(0.0001), "0.0001");
    assert_eq!(format_counter(9999999999999998.0), "9999999999999998.0");
    assert_eq!(format_counter(1e16), "1.0e+16");
    assert_eq!(format_counter(1.234e20), "1.234e+20");
    assert_eq!(format_counter(0.00001), "1.0e-05");
    assert_eq!(format_counter(-2.5e-7), "-2.5e-07");
}

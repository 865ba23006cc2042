use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Lines carrying this are never kept.
pub const UNSET: &str = "[unset]";
/// Counter lines start with this; everything else is a measurement.
pub const COUNTER_PREFIX: &str = "PAPI";

/// Pairs each counter line with the measurement line of the same rank,
/// counter first. Both groups keep their relative order.
pub fn interleave(text: &str) -> Result<String> {
    let (counters, measurements): (Vec<&str>, Vec<&str>) = text
        .lines()
        .filter(|line| !line.contains(UNSET))
        .partition(|line| line.starts_with(COUNTER_PREFIX));

    if counters.len() != measurements.len() {
        return Err(Error::UnpairedLines { counters: counters.len(), measurements: measurements.len() });
    }

    let mut result = String::with_capacity(text.len());
    for (counter, measurement) in counters.iter().zip(measurements.iter()) {
        result.push_str(counter);
        result.push('\n');
        result.push_str(measurement);
        result.push('\n');
    }
    Ok(result)
}

/// Rewrites `path` in place. The file is untouched if it does not pair up.
pub fn interleave_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let result = interleave(&text)?;
    fs::write(path, result)?;
    log::debug!("interleaved {}", path.display());
    Ok(())
}

#[test]
fn pairs_in_order() {
    let text = "\
PAPI,1,2
PAPI,3,4
run a 0.5
[unset] noise
run b 0.7
";
    assert_eq!(interleave(text).unwrap(), "PAPI,1,2\nrun a 0.5\nPAPI,3,4\nrun b 0.7\n");
}

#[test]
fn unterminated_last_line() {
    assert_eq!(interleave("m\nPAPI,1").unwrap(), "PAPI,1\nm\n");
    assert_eq!(interleave("").unwrap(), "");
}

#[test]
fn unpaired_lines() {
    match interleave("PAPI,1\nPAPI,2\nm\n") {
        Err(Error::UnpairedLines { counters, measurements }) => {
            assert_eq!(counters, 2);
            assert_eq!(measurements, 1);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn rewrite_in_place() {
    let dir = ::tempdir::TempDir::new("rewrite_in_place").unwrap();

    let good = dir.path().join("good.log");
    fs::write(&good, "PAPI,9\nPAPI,8\nfirst\nsecond\n").unwrap();
    interleave_file(&good).unwrap();
    assert_eq!(fs::read_to_string(&good).unwrap(), "PAPI,9\nfirst\nPAPI,8\nsecond\n");

    let bad = dir.path().join("bad.log");
    fs::write(&bad, "PAPI,9\n").unwrap();
    assert!(interleave_file(&bad).is_err());
    assert_eq!(fs::read_to_string(&bad).unwrap(), "PAPI,9\n");
}

use std::fs::File;
use std::ops;
use std::path::Path;

use memmap::Mmap;

use crate::error::Result;

/// A read-only view of a whole text file. `&mapped[..]` implements `BufRead`.
pub struct MappedText {
    map: Option<Mmap>,      // None for empty files, which cannot be mapped
}

impl MappedText {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<MappedText> {
        let file = File::open(path)?;
        let map = if file.metadata()?.len() == 0 {
            None
        } else {
            // the file is only read, and only for the lifetime of the run
            Some(unsafe { Mmap::map(&file)? })
        };
        Ok(MappedText { map })
    }
}

impl ops::Index<ops::RangeFull> for MappedText {
    type Output = [u8];
    #[inline]
    fn index(&self, _index: ops::RangeFull) -> &[u8] {
        match self.map {
            Some(ref map) => &map[..],
            None => &[],
        }
    }
}

#[test]
fn map_and_normalize() {
    use std::io::Write;
    use crate::dialect::Dialect;
    use crate::relabel::{normalize, Summary};

    let dir = ::tempdir::TempDir::new("map_and_normalize").unwrap();
    let path = dir.path().join("edges.txt");
    File::create(&path).unwrap().write_all(b"# snap\n7\t3\n3\t3\n3\t8\n").unwrap();

    let mapped = MappedText::open(&path).unwrap();
    let mut output = Vec::new();
    let mut recorder = crate::diagnostics::Recorder::default();
    let summary = normalize(&mapped[..], &mut output, Dialect::Sparse, &mut recorder).unwrap();
    assert_eq!(output, b"0 1 1\n1 2 1\n");
    assert_eq!(summary, Summary { vertices: 3, edges: 2 });
}

#[test]
fn map_empty_file() {
    let dir = ::tempdir::TempDir::new("map_empty_file").unwrap();
    let path = dir.path().join("empty.txt");
    File::create(&path).unwrap();
    assert!(MappedText::open(&path).unwrap()[..].is_empty());
}

#[test]
fn map_missing_file() {
    let dir = ::tempdir::TempDir::new("map_missing_file").unwrap();
    match MappedText::open(dir.path().join("absent.txt")) {
        Err(crate::error::Error::Io(_)) => {}
        _ => panic!("expected an I/O error"),
    }
}

// Two flavours of plain-text edge list:
//
//     Dense:   "<src> <dst>"   every line is an edge, self-loops kept.
//     Sparse:  "<src>\t<dst>"  '#' lines are comments, self-loops dropped.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Dense,
    Sparse,
}

impl Dialect {
    pub fn separator(self) -> char {
        match self {
            Dialect::Dense => ' ',
            Dialect::Sparse => '\t',
        }
    }

    pub fn is_comment(self, line: &[u8]) -> bool {
        self == Dialect::Sparse && line.starts_with(b"#")
    }

    pub fn keeps_self_loops(self) -> bool { self == Dialect::Dense }

    /// Parses one edge line, terminator included or not. Both endpoints must be
    /// bare decimal digits fitting a `u64`, split by exactly one separator.
    pub fn parse(self, line: &[u8]) -> Option<(u64, u64)> {
        let line = strip_terminator(line);
        let at = line.iter().position(|&b| b == self.separator() as u8)?;
        let source = parse_id(&line[..at])?;
        let target = parse_id(&line[at + 1..])?;
        Some((source, target))
    }
}

/// `line` without its trailing `\n` or `\r\n`.
pub fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(&b"\n"[..]).unwrap_or(line);
    line.strip_suffix(&b"\r"[..]).unwrap_or(line)
}

fn parse_id(field: &[u8]) -> Option<u64> {
    if field.is_empty() || !field.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}

#[test]
fn parse_dense() {
    assert_eq!(Dialect::Dense.parse(b"0 1"), Some((0, 1)));
    assert_eq!(Dialect::Dense.parse(b"12 7\n"), Some((12, 7)));
    assert_eq!(Dialect::Dense.parse(b"12 7\r\n"), Some((12, 7)));
    assert_eq!(Dialect::Dense.parse(b"18446744073709551615 0"), Some((u64::MAX, 0)));

    assert_eq!(Dialect::Dense.parse(b""), None);
    assert_eq!(Dialect::Dense.parse(b"3"), None);
    assert_eq!(Dialect::Dense.parse(b"3\t4"), None);
    assert_eq!(Dialect::Dense.parse(b"3  4"), None);
    assert_eq!(Dialect::Dense.parse(b"3 4 1"), None);
    assert_eq!(Dialect::Dense.parse(b"+3 4"), None);
    assert_eq!(Dialect::Dense.parse(b"-3 4"), None);
    assert_eq!(Dialect::Dense.parse(b"18446744073709551616 0"), None);
}

#[test]
fn parse_sparse() {
    assert_eq!(Dialect::Sparse.parse(b"10\t20"), Some((10, 20)));
    assert_eq!(Dialect::Sparse.parse(b"10\t20\n"), Some((10, 20)));
    assert_eq!(Dialect::Sparse.parse(b"10 20"), None);
    assert_eq!(Dialect::Sparse.parse(b"10\t"), None);
    assert_eq!(Dialect::Sparse.parse(b"\t20"), None);
}

#[test]
fn comments_and_loops() {
    assert!(Dialect::Sparse.is_comment(b"# FromNodeId\tToNodeId"));
    assert!(!Dialect::Sparse.is_comment(b"1\t2"));
    assert!(!Dialect::Dense.is_comment(b"# 1 2"));

    assert!(Dialect::Dense.keeps_self_loops());
    assert!(!Dialect::Sparse.keeps_self_loops());
}

#[test]
fn parse_non_utf8() {
    assert_eq!(Dialect::Dense.parse(b"3 \xff"), None);
    assert_eq!(Dialect::Sparse.parse(b"\xe93\t4"), None);
    assert!(Dialect::Sparse.is_comment(b"# Author: Jos\xe9"));
    assert_eq!(strip_terminator(b"1 2\r\n"), b"1 2");
}

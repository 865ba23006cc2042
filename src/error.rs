use std::io;

use derive_more::Display;

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "line {}: expected two unsigned integers, found {:?}", line, text)]
    MalformedLine { line: usize, text: String },
    #[display(fmt = "block {:?}: cannot parse counter {:?}", header, field)]
    MalformedCounter { header: String, field: String },
    #[display(fmt = "block {:?}: counter rows have different widths", header)]
    RaggedBlock { header: String },
    #[display(fmt = "{} counter lines but {} measurement lines", counters, measurements)]
    UnpairedLines { counters: usize, measurements: usize },
    #[display(fmt = "{}", _0)]
    Usage(String),
    #[display(fmt = "{}", _0)]
    Io(io::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error { Error::Io(err) }
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected} columns, found {found}")]
    Length {
        line: u8,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: contains non-ASCII characters")]
    NonAscii { line: u8 },
    #[error("line {line}: expected line number '{line}' in column 1")]
    LineNumber { line: u8 },
    #[error("line {line}: checksum mismatch (expected {expected}, computed {computed})")]
    Checksum {
        line: u8,
        expected: u32,
        computed: u32,
    },
    #[error("catalog number mismatch: line 1 has '{line1}', line 2 has '{line2}'")]
    CatalogMismatch { line1: String, line2: String },
    #[error("line {line}: invalid {field} field '{value}'")]
    Field {
        line: u8,
        field: &'static str,
        value: String,
    },
    #[error("rejected by propagator: {0}")]
    Elements(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("TLE path not found: {0}")]
    NotFound(String),
    #[error("TLE file read error: {0}")]
    Io(#[from] std::io::Error),
}

use std::ops::Range;

use serde::Serialize;
use utoipa::ToSchema;

use crate::elements::error::ParseError;

pub const LINE_LENGTH: usize = 69;

const CATALOG: Range<usize> = 2..7;
const EPOCH: Range<usize> = 18..32;
const INCLINATION: Range<usize> = 8..16;
const RIGHT_ASCENSION: Range<usize> = 17..25;
const ECCENTRICITY: Range<usize> = 26..33;
const ARGUMENT_OF_PERIGEE: Range<usize> = 34..42;
const MEAN_ANOMALY: Range<usize> = 43..51;
const MEAN_MOTION: Range<usize> = 52..63;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ElementRecord {
    name: String,
    line1: String,
    line2: String,
}

impl ElementRecord {
    pub fn parse(name: &str, line1: &str, line2: &str) -> Result<Self, ParseError> {
        let line1 = line1.trim();
        let line2 = line2.trim();

        check_line(line1, 1)?;
        check_line(line2, 2)?;

        let catalog1 = line1[CATALOG].trim();
        let catalog2 = line2[CATALOG].trim();
        if catalog1 != catalog2 {
            return Err(ParseError::CatalogMismatch {
                line1: catalog1.to_string(),
                line2: catalog2.to_string(),
            });
        }

        numeric_field(line1, 1, "epoch", EPOCH)?;
        numeric_field(line2, 2, "inclination", INCLINATION)?;
        numeric_field(line2, 2, "right ascension", RIGHT_ASCENSION)?;
        eccentricity_field(line2)?;
        numeric_field(line2, 2, "argument of perigee", ARGUMENT_OF_PERIGEE)?;
        numeric_field(line2, 2, "mean anomaly", MEAN_ANOMALY)?;
        let mean_motion = numeric_field(line2, 2, "mean motion", MEAN_MOTION)?;
        if mean_motion <= 0.0 {
            return Err(ParseError::Field {
                line: 2,
                field: "mean motion",
                value: line2[MEAN_MOTION].trim().to_string(),
            });
        }

        let name = name.trim();
        let name = if name.is_empty() {
            format!("NORAD {}", catalog1)
        } else {
            name.to_string()
        };

        Ok(Self {
            name,
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// Catalog number as written in columns 3-7 (may be Alpha-5).
    pub fn catalog_number(&self) -> &str {
        self.line1[CATALOG].trim()
    }
}

/// Modulo-10 sum of the first 68 columns; digits count their value, '-' counts 1.
pub fn checksum(line: &str) -> u32 {
    line.bytes()
        .take(LINE_LENGTH - 1)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum::<u32>()
        % 10
}

fn check_line(line: &str, number: u8) -> Result<(), ParseError> {
    if !line.is_ascii() {
        return Err(ParseError::NonAscii { line: number });
    }
    if line.len() != LINE_LENGTH {
        return Err(ParseError::Length {
            line: number,
            expected: LINE_LENGTH,
            found: line.len(),
        });
    }

    let bytes = line.as_bytes();
    if bytes[0] != b'0' + number || bytes[1] != b' ' {
        return Err(ParseError::LineNumber { line: number });
    }

    let expected = match bytes[LINE_LENGTH - 1] {
        b @ b'0'..=b'9' => (b - b'0') as u32,
        _ => {
            return Err(ParseError::Field {
                line: number,
                field: "checksum",
                value: line[LINE_LENGTH - 1..].to_string(),
            })
        }
    };
    let computed = checksum(line);
    if computed != expected {
        return Err(ParseError::Checksum {
            line: number,
            expected,
            computed,
        });
    }

    Ok(())
}

fn numeric_field(
    line: &str,
    number: u8,
    field: &'static str,
    columns: Range<usize>,
) -> Result<f64, ParseError> {
    let raw = line[columns].trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::Field {
            line: number,
            field,
            value: raw.to_string(),
        })
}

// Eccentricity carries an implied leading decimal point.
fn eccentricity_field(line: &str) -> Result<f64, ParseError> {
    let raw = line[ECCENTRICITY].trim();
    let invalid = || ParseError::Field {
        line: 2,
        field: "eccentricity",
        value: raw.to_string(),
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    format!("0.{}", raw).parse::<f64>().map_err(|_| invalid())
}

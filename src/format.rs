//! Flat text formats for point-sets and multiplicity vectors.
//!
//! Point-sets are written one point per line as `x,y,id`, newline-terminated,
//! with no header. The reader also accepts whitespace as the separator, which
//! is how older dumps were laid out.
//!
//! Multiplicity rows are comma-separated non-negative integers; entry `i`
//! (1-based) counts the parts of size `i`.

use crate::point::{Coord, Point, PointId};
use crate::point_set::PointSet;
use std::fmt;
use std::io::{self, BufRead, Write};

/// Error type for malformed text input.
#[derive(Debug)]
pub enum FormatError {
    /// Reading from the underlying source failed.
    Io(io::Error),
    /// A point line did not hold exactly three integer fields.
    MalformedPoint {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// A multiplicity entry was not a non-negative integer.
    MalformedMultiplicity {
        /// 1-based line number.
        line: usize,
        /// Offending field.
        field: String,
    },
    /// The source ended before the requested number of rows.
    MissingRows {
        /// Rows requested.
        expected: usize,
        /// Rows found.
        found: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Io(err) => write!(f, "i/o error: {}", err),
            FormatError::MalformedPoint { line, text } => {
                write!(f, "line {}: expected `x,y,id`, found {:?}", line, text)
            }
            FormatError::MalformedMultiplicity { line, field } => {
                write!(f, "line {}: invalid multiplicity {:?}", line, field)
            }
            FormatError::MissingRows { expected, found } => {
                write!(f, "expected {} multiplicity rows, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        FormatError::Io(err)
    }
}

/// Writes `points` in the canonical `x,y,id` layout.
pub fn write_point_set<W: Write>(mut writer: W, points: &PointSet) -> io::Result<()> {
    for point in points {
        writeln!(writer, "{}", point)?;
    }
    writer.flush()
}

/// Parses one point line. Blank lines yield `None`.
fn parse_point(line_no: usize, line: &str) -> Result<Option<Point>, FormatError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let malformed = || FormatError::MalformedPoint {
        line: line_no,
        text: trimmed.to_string(),
    };
    let fields: Vec<&str> = if trimmed.contains(',') {
        trimmed.split(',').map(str::trim).collect()
    } else {
        trimmed.split_whitespace().collect()
    };
    if fields.len() != 3 {
        return Err(malformed());
    }
    let x: Coord = fields[0].parse().map_err(|_| malformed())?;
    let y: Coord = fields[1].parse().map_err(|_| malformed())?;
    let id: u64 = fields[2].parse().map_err(|_| malformed())?;
    Ok(Some(Point::new(x, y, PointId::new(id))))
}

/// Reads a point-set written by [`write_point_set`].
pub fn read_point_set<R: BufRead>(reader: R) -> Result<PointSet, FormatError> {
    let mut out = PointSet::new();
    for (index, line) in reader.lines().enumerate() {
        if let Some(point) = parse_point(index + 1, &line?)? {
            out.push(point);
        }
    }
    Ok(out)
}

/// Reads `line_count` multiplicity rows and expands each into a Ferrers diagram.
///
/// Each row contributes its first `line_length` fields; shorter rows are
/// padded with zeros. Ids restart at 1 for every diagram.
pub fn read_multiplicities<R: BufRead>(
    reader: R,
    line_length: usize,
    line_count: usize,
) -> Result<Vec<PointSet>, FormatError> {
    let mut diagrams = Vec::with_capacity(line_count);
    for (index, line) in reader.lines().enumerate() {
        if diagrams.len() == line_count {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut multiplicities = vec![0usize; line_length];
        for (slot, field) in multiplicities
            .iter_mut()
            .zip(line.split(',').map(str::trim).filter(|f| !f.is_empty()))
        {
            *slot = field
                .parse()
                .map_err(|_| FormatError::MalformedMultiplicity {
                    line: index + 1,
                    field: field.to_string(),
                })?;
        }
        diagrams.push(PointSet::from_multiplicities(&multiplicities));
    }
    if diagrams.len() < line_count {
        return Err(FormatError::MissingRows {
            expected: line_count,
            found: diagrams.len(),
        });
    }
    Ok(diagrams)
}

//! io::errors — failures while reading or writing numeric text tables.
//!
//! Every variant carries the offending path as a `String` so the enum stays
//! `Clone + PartialEq` and can be compared directly in tests.

pub type IoResult<T> = Result<T, IoError>;

/// IoError — table I/O failures.
///
/// Variants
/// --------
/// - `Read { path, reason }`: the file could not be opened or read.
/// - `Parse { path, line, token }`: a token is not a floating-point number.
/// - `Ragged { path, line, expected, found }`: a row has a different number
///   of columns than the first data row.
/// - `Empty { path }`: no data rows after stripping comments and blanks.
/// - `Write { path, reason }`: the output file could not be written.
#[derive(Debug, Clone, PartialEq)]
pub enum IoError {
    Read { path: String, reason: String },
    Parse { path: String, line: usize, token: String },
    Ragged { path: String, line: usize, expected: usize, found: usize },
    Empty { path: String },
    Write { path: String, reason: String },
}

impl std::error::Error for IoError {}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::Read { path, reason } => write!(f, "Cannot read '{path}': {reason}"),
            IoError::Parse { path, line, token } => {
                write!(f, "'{path}' line {line}: cannot parse '{token}' as a number")
            }
            IoError::Ragged { path, line, expected, found } => write!(
                f,
                "'{path}' line {line}: expected {expected} columns, found {found}"
            ),
            IoError::Empty { path } => write!(f, "'{path}' contains no data rows"),
            IoError::Write { path, reason } => write!(f, "Cannot write '{path}': {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Messages name the file and the location of the problem.
    //
    // Given
    // -----
    // - A `Parse` and a `Ragged` error.
    //
    // Expect
    // ------
    // - Both messages contain the path and the line number.
    fn display_names_path_and_line() {
        // Arrange
        let parse = IoError::Parse { path: "ref.dat".into(), line: 3, token: "x1".into() };
        let ragged =
            IoError::Ragged { path: "ref.dat".into(), line: 4, expected: 2, found: 1 };

        // Act
        let (p, r) = (parse.to_string(), ragged.to_string());

        // Assert
        assert!(p.contains("ref.dat") && p.contains("line 3") && p.contains("x1"));
        assert!(r.contains("line 4") && r.contains("expected 2"));
    }
}

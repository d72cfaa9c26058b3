//! Plain-text numeric tables.
//!
//! Reference histograms, bin edges, trajectories and fitted parameters are
//! exchanged as whitespace- or comma-separated columns of floats. Lines
//! starting with `#` (after leading whitespace) and blank lines are skipped;
//! a trailing `# ...` on a data line is ignored as well.
use std::{fs, path::Path};

use ndarray::{Array1, Array2};

use crate::io::errors::{IoError, IoResult};

/// Read a rectangular table of floats.
///
/// A file holding a single column yields an `(n, 1)` array.
///
/// # Errors
/// - [`IoError::Read`] if the file cannot be read.
/// - [`IoError::Parse`] on a non-numeric token (1-based line number).
/// - [`IoError::Ragged`] if rows differ in width.
/// - [`IoError::Empty`] if no data rows remain.
pub fn load_table<P: AsRef<Path>>(path: P) -> IoResult<Array2<f64>> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::Read { path: display.clone(), reason: e.to_string() })?;
    parse_table(&text, &display)
}

/// Read a table and flatten it in row-major order.
///
/// Both a single column and a single row give the same vector.
///
/// # Errors
/// - Same as [`load_table`].
pub fn load_vector<P: AsRef<Path>>(path: P) -> IoResult<Array1<f64>> {
    let table = load_table(path)?;
    Ok(table.iter().copied().collect())
}

/// Write fitted parameters, one per line, after a leading `1.0`.
///
/// The leading entry is the normalization slot downstream simulation
/// packages expect in front of the tunable epsilons. Values use 18 digits
/// of scientific notation.
///
/// # Errors
/// - [`IoError::Write`] if the file cannot be written.
pub fn write_params<P: AsRef<Path>>(path: P, epsilons: &Array1<f64>) -> IoResult<()> {
    let path = path.as_ref();
    let mut out = String::with_capacity(26 * (epsilons.len() + 1));
    for value in std::iter::once(1.0).chain(epsilons.iter().copied()) {
        out.push_str(&format!("{value:.18e}\n"));
    }
    fs::write(path, out)
        .map_err(|e| IoError::Write { path: path.display().to_string(), reason: e.to_string() })
}

fn parse_table(text: &str, path: &str) -> IoResult<Array2<f64>> {
    let mut values: Vec<f64> = Vec::new();
    let mut ncols: Option<usize> = None;
    let mut nrows = 0usize;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| IoError::Parse {
                    path: path.to_string(),
                    line: idx + 1,
                    token: tok.to_string(),
                })
            })
            .collect::<IoResult<Vec<f64>>>()?;
        match ncols {
            None => ncols = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(IoError::Ragged {
                    path: path.to_string(),
                    line: idx + 1,
                    expected,
                    found: row.len(),
                });
            }
            Some(_) => {}
        }
        values.extend(row);
        nrows += 1;
    }

    let ncols = ncols.ok_or_else(|| IoError::Empty { path: path.to_string() })?;
    Array2::from_shape_vec((nrows, ncols), values)
        .map_err(|e| IoError::Read { path: path.to_string(), reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file should be created");
        file.write_all(contents.as_bytes()).expect("temp file should be writable");
        file
    }

    #[test]
    // Purpose
    // -------
    // Mixed separators, comments and blank lines parse into a rectangle.
    //
    // Given
    // -----
    // - A two-column file with a header comment, a blank line, comma and
    //   whitespace separators and a trailing comment.
    //
    // Expect
    // ------
    // - A 3×2 array with the listed values.
    fn load_table_handles_comments_and_separators() {
        // Arrange
        let file = temp_with("# value error\n2.0 0.5\n\n4.0,1.0\n  3.0\t0.75 # tail\n");

        // Act
        let table = load_table(file.path()).expect("table should parse");

        // Assert
        assert_eq!(table, array![[2.0, 0.5], [4.0, 1.0], [3.0, 0.75]]);
    }

    #[test]
    // Purpose
    // -------
    // Malformed files are reported with their location.
    //
    // Given
    // -----
    // - A ragged file, a file with a bad token, a comment-only file and a
    //   missing path.
    //
    // Expect
    // ------
    // - `Ragged` at line 2, `Parse` at line 1, `Empty`, and `Read`.
    fn load_table_reports_malformed_input() {
        // Arrange
        let ragged = temp_with("1 2\n3\n");
        let bad = temp_with("1 abc\n");
        let empty = temp_with("# nothing\n\n");

        // Act / Assert
        assert!(matches!(
            load_table(ragged.path()),
            Err(IoError::Ragged { line: 2, expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            load_table(bad.path()),
            Err(IoError::Parse { line: 1, ref token, .. }) if token == "abc"
        ));
        assert!(matches!(load_table(empty.path()), Err(IoError::Empty { .. })));
        assert!(matches!(
            load_table("/nonexistent/odem/table.dat"),
            Err(IoError::Read { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Parameter files start with the 1.0 slot and read back exactly.
    //
    // Given
    // -----
    // - ε = (0.9, 1.1) written to a temporary path.
    //
    // Expect
    // ------
    // - Three lines; `load_vector` returns (1.0, 0.9, 1.1) bit-for-bit.
    fn write_params_prepends_unit_entry() {
        // Arrange
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("params");

        // Act
        write_params(&path, &array![0.9, 1.1]).expect("write should succeed");
        let text = std::fs::read_to_string(&path).expect("file should exist");
        let back = load_vector(&path).expect("file should parse");

        // Assert
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("1.000000000000000000e0"));
        assert_eq!(back, array![1.0, 0.9, 1.1]);
    }
}

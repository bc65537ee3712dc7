//! Delimited text matrices.
//!
//! One sample per line, fields separated by a delimiter string:
//!
//! ```text
//! 1.0,1.0
//! 5.5,6.25
//! ```
//!
//! Fields are trimmed before parsing and blank lines are skipped. Every row
//! must have the width of the first.

use std::io::{BufRead, Write};

use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

/// Read a delimited `n × d` matrix.
pub fn read_matrix<R: BufRead>(reader: R, delimiter: &str) -> Result<Array2<f64>> {
    if delimiter.is_empty() {
        return Err(Error::InvalidParameter {
            name: "delimiter",
            message: "must not be empty",
        });
    }

    let mut values = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let before = values.len();
        for field in line.split(delimiter) {
            let value = field.trim().parse::<f64>().map_err(|e| Error::Parse {
                line: idx + 1,
                message: format!("{e}: {:?}", field.trim()),
            })?;
            values.push(value);
        }

        let found = values.len() - before;
        match width {
            None => width = Some(found),
            Some(expected) if expected != found => {
                return Err(Error::DimensionMismatch { expected, found });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let width = width.ok_or(Error::EmptyInput)?;
    Array2::from_shape_vec((rows, width), values).map_err(|e| Error::Other(e.to_string()))
}

/// Write a matrix, one row per line.
pub fn write_matrix<W: Write>(mut writer: W, matrix: ArrayView2<'_, f64>, delimiter: &str) -> Result<()> {
    for row in matrix.rows() {
        for (j, value) in row.iter().enumerate() {
            if j != 0 {
                writer.write_all(delimiter.as_bytes())?;
            }
            write!(writer, "{value}")?;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write labels, one per line.
pub fn write_labels<W: Write>(mut writer: W, labels: &[usize]) -> Result<()> {
    for label in labels {
        writeln!(writer, "{label}")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_read_matrix() {
        let input = "1,1\n1, 0\n\n0.5,-2e-1\n";
        let m = read_matrix(input.as_bytes(), ",").unwrap();
        assert_eq!(m, array![[1.0, 1.0], [1.0, 0.0], [0.5, -0.2]]);
    }

    #[test]
    fn test_read_matrix_custom_delimiter() {
        let m = read_matrix("1\t2\t3\n4\t5\t6".as_bytes(), "\t").unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m[[1, 2]], 6.0);
    }

    #[test]
    fn test_read_matrix_ragged() {
        let err = read_matrix("1,2\n3\n".as_bytes(), ",").unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_read_matrix_bad_field_reports_line() {
        let err = read_matrix("1,2\n3,x\n".as_bytes(), ",").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_read_matrix_empty() {
        assert_eq!(read_matrix("\n\n".as_bytes(), ","), Err(Error::EmptyInput));
    }

    #[test]
    fn test_write_matrix_then_read_back() {
        let m = array![[0.5, 5.5], [-1.25, 3.0]];
        let mut out = Vec::new();
        write_matrix(&mut out, m.view(), ";").unwrap();

        assert_eq!(String::from_utf8(out.clone()).unwrap(), "0.5;5.5\n-1.25;3\n");
        assert_eq!(read_matrix(out.as_slice(), ";").unwrap(), m);
    }

    #[test]
    fn test_write_labels() {
        let mut out = Vec::new();
        write_labels(&mut out, &[0, 1, 1]).unwrap();
        assert_eq!(out, b"0\n1\n1\n");
    }
}

//! CSV decode/encode for one file, the plain stdin reader, and the stdout rendering.

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::cancel::CancelToken;
use crate::{FileContent, Result, Row, SortError};

fn decode_error(path: &Path, err: csv::Error) -> SortError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => SortError::io(path, e),
        _ => SortError::Decode {
            origin: path.display().to_string(),
            reason,
        },
    }
}

/// Decode one file into rows, preserving on-disk order.
///
/// No header handling: every line is a row. A row whose field count differs from the
/// first row of the same file is a [`SortError::Decode`].
pub fn read_csv_file(path: &Path) -> Result<FileContent> {
    let file = File::open(path).map_err(|e| SortError::io(path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(file);
    let mut content = FileContent::new();
    for record in rdr.records() {
        let record = record.map_err(|e| decode_error(path, e))?;
        content.push(record.iter().map(str::to_owned).collect());
    }
    Ok(content)
}

/// Encode rows into a new file at `path` (truncating). Standard CSV quoting.
pub fn write_csv_file(path: &Path, rows: &[Row]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| decode_error(path, e))?;
    for row in rows {
        wtr.write_record(row).map_err(|e| decode_error(path, e))?;
    }
    wtr.flush().map_err(|e| SortError::io(path, e))?;
    Ok(())
}

/// Read comma-split lines until EOF or the first empty line. No quoting rules apply.
///
/// Arity is fixed by the first line; any later line with a different count is a decode error.
/// Once `cancel` fires, reading stops at the next line boundary and the rows so far are returned.
pub fn read_delimited_lines<R: BufRead>(
    reader: R,
    origin: &str,
    cancel: &CancelToken,
) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    let mut arity = 0_usize;
    for line in reader.lines() {
        if cancel.is_cancelled() {
            break;
        }
        let line = line.map_err(|e| SortError::io(origin, e))?;
        if line.is_empty() {
            break;
        }
        let row: Row = line.split(',').map(str::to_owned).collect();
        if arity == 0 {
            arity = row.len();
        }
        if row.len() != arity {
            return Err(SortError::Decode {
                origin: origin.to_string(),
                reason: format!(
                    "row {} has {} column(s), but must have {}",
                    rows.len() + 1,
                    row.len(),
                    arity
                ),
            });
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Render rows as `[[a b] [c d]]`, fields space-separated, rows bracketed.
pub fn format_bracketed(rows: &[Row]) -> String {
    let body = rows
        .iter()
        .map(|row| format!("[{}]", row.join(" ")))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{body}]")
}

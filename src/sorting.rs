//! Column validation and the stable text comparator.

use rayon::prelude::*;
use std::cmp::Ordering;

use crate::utils::config::PAR_SORT_THRESHOLD;
use crate::{Result, Row, SortDirective, SortError};

impl SortDirective {
    /// Check `field` against the arity of the first row. An empty buffer has nothing to sort.
    pub fn validate(&self, rows: &[Row]) -> Result<()> {
        match rows.first() {
            Some(first) if self.field >= first.len() => Err(SortError::InvalidColumn {
                field: self.field,
                columns: first.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Byte-wise comparison of the selected field. A row too short to have the field sorts
    /// before any row that has it (rows from other files may have a different arity).
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ord = a.get(self.field).cmp(&b.get(self.field));
        if self.reverse { ord.reverse() } else { ord }
    }
}

/// Validate, then stable-sort `rows` in place according to `directive`.
pub fn sort_records(rows: &mut [Row], directive: &SortDirective) -> Result<()> {
    directive.validate(rows)?;
    let body = match (directive.ignore_header, rows.len()) {
        (true, 0) => return Ok(()),
        (true, _) => &mut rows[1..],
        (false, _) => rows,
    };
    if body.len() >= PAR_SORT_THRESHOLD {
        body.par_sort_by(|a, b| directive.compare(a, b));
    } else {
        body.sort_by(|a, b| directive.compare(a, b));
    }
    Ok(())
}

use crate::data::Dataset;
use crate::error::Result;
use std::cmp::Ordering;

/// Row-level preparation applied to a dataset before charting
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Render the table exactly as loaded
    Identity,
    /// Keep the `n` rows with the largest (or smallest) value in `column`
    TopN {
        column: &'static str,
        n: usize,
        ascending: bool,
    },
}

impl Transform {
    /// Descending top-N, the only ranking the dashboard uses
    pub const fn top(column: &'static str, n: usize) -> Self {
        Transform::TopN {
            column,
            n,
            ascending: false,
        }
    }

    pub fn apply(&self, data: &Dataset) -> Result<Dataset> {
        match self {
            Transform::Identity => Ok(data.clone()),
            Transform::TopN { column, n, ascending } => select_top_n(data, column, *n, *ascending),
        }
    }
}

/// Stable sort by a numeric column, then truncate to `min(n, len)` rows.
///
/// Rows with equal keys keep their original relative order.
pub fn select_top_n(
    data: &Dataset,
    sort_column: &str,
    n: usize,
    ascending: bool,
) -> Result<Dataset> {
    let keys = data.numeric_column(sort_column)?;

    let mut order: Vec<usize> = (0..data.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| {
        let cmp = keys[a].partial_cmp(&keys[b]).unwrap_or(Ordering::Equal);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
    order.truncate(n);

    let rows = order.into_iter().map(|idx| data.rows()[idx].clone()).collect();
    Ok(data.with_rows(rows))
}

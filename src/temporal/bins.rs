use log::trace;

use crate::column::Int64Column;
use crate::error::{Error, Result};

/// ソート済みの値を区間に割り当て、各区間までの累積件数を返す
///
/// `values` and `edges` must both be sorted ascending. The result has one entry
/// per bin (`edges.len() - 1`); entry `i` is the number of values up to and
/// including bin `i`, so per-bin counts are the differences of consecutive
/// entries (see [`bin_counts`]).
///
/// With `closed_right` a value equal to an edge belongs to the bin on its left
/// (`value <= right_edge`), otherwise to the bin on its right (`value < right_edge`).
pub fn generate_bins(values: &Int64Column, edges: &Int64Column, closed_right: bool) -> Result<Vec<usize>> {
    if values.null_count() > 0 {
        return Err(Error::InvalidInput("values contain nulls".to_string()));
    }
    if edges.null_count() > 0 {
        return Err(Error::InvalidInput("bin edges contain nulls".to_string()));
    }

    let values = values.values();
    let edges = edges.values();
    let (len_values, len_edges) = (values.len(), edges.len());
    if len_values == 0 || len_edges == 0 {
        return Err(Error::EmptyInput(format!(
            "{} values and {} bin edges",
            len_values, len_edges
        )));
    }

    if values[0] < edges[0] {
        return Err(Error::ValueBeforeFirstBin {
            value: values[0],
            edge: edges[0],
        });
    }
    if values[len_values - 1] > edges[len_edges - 1] {
        return Err(Error::ValueAfterLastBin {
            value: values[len_values - 1],
            edge: edges[len_edges - 1],
        });
    }

    let mut bins = Vec::with_capacity(len_edges - 1);
    let mut j = 0;
    for &right_edge in &edges[1..] {
        while j < len_values
            && (values[j] < right_edge || (closed_right && values[j] == right_edge))
        {
            j += 1;
        }
        bins.push(j);
    }

    trace!(
        "generate_bins: {} values into {} bins, {} covered",
        len_values,
        bins.len(),
        j
    );
    Ok(bins)
}

/// Per-bin counts recovered from cumulative positions
///
/// Fails with [`Error::InvalidInput`] when the positions decrease.
pub fn bin_counts(cumulative: &[usize]) -> Result<Vec<usize>> {
    let mut previous = 0;
    cumulative
        .iter()
        .map(|&position| {
            let count = position.checked_sub(previous).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "cumulative bin positions decrease ({} after {})",
                    position, previous
                ))
            })?;
            previous = position;
            Ok(count)
        })
        .collect()
}

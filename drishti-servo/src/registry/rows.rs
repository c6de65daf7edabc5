//! Row-write primitive shared by every build.

use nalgebra::{DMatrix, DVector};

use crate::features::FeatureSample;

/// Copy `sample` into the rows starting at `row` and return the next free row.
///
/// The value goes to `vector` and the interaction rows to `matrix` when the
/// respective target is given. Current, true and desired builds all advance
/// their cursor through this function, so their row ranges stay aligned.
#[inline]
pub(crate) fn write_rows(
    row: usize,
    sample: &FeatureSample,
    vector: Option<&mut DVector<f64>>,
    matrix: Option<&mut DMatrix<f64>>,
) -> usize {
    let rows = sample.dimension();
    if rows == 0 {
        return row;
    }
    if let Some(vector) = vector {
        vector.rows_mut(row, rows).copy_from(&sample.value);
    }
    if let Some(matrix) = matrix {
        matrix.rows_mut(row, rows).copy_from(&sample.interaction);
    }
    row + rows
}

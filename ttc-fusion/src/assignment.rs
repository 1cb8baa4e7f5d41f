//! Maximum weight bipartite assignment.

use nalgebra::DMatrix;

/// Finds a one-to-one assignment of rows to columns with the largest total weight.
///
/// This is the Hungarian method with row and column potentials, running in `O(n²m)` for
/// `n` rows and `m >= n` columns. If there are more rows than columns the matrix is
/// transposed first. Every row (or column, whichever is fewer) is assigned, including
/// those whose best option has zero weight, so callers should filter the pairs they
/// consider meaningful. The pairs are returned sorted by row.
///
/// ```
/// use nalgebra::DMatrix;
/// use ttc_fusion::maximum_weight_assignment;
///
/// let weights = DMatrix::from_row_slice(2, 2, &[40, 30, 35, 0]);
/// assert_eq!(maximum_weight_assignment(&weights), vec![(0, 1), (1, 0)]);
/// ```
pub fn maximum_weight_assignment(weights: &DMatrix<usize>) -> Vec<(usize, usize)> {
    let (rows, cols) = weights.shape();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    if rows > cols {
        let mut pairs: Vec<(usize, usize)> = maximum_weight_assignment(&weights.transpose())
            .into_iter()
            .map(|(col, row)| (row, col))
            .collect();
        pairs.sort_unstable();
        return pairs;
    }

    // Maximizing weight is minimizing `max - weight`, which keeps every cost non-negative.
    let max = weights.iter().copied().max().unwrap_or(0) as i64;
    let cost = |row: usize, col: usize| max - weights[(row, col)] as i64;

    // Index 0 is a virtual column that holds the row currently being inserted.
    let mut row_potential = vec![0i64; rows + 1];
    let mut col_potential = vec![0i64; cols + 1];
    let mut owner = vec![0usize; cols + 1];
    let mut way = vec![0usize; cols + 1];

    for row in 1..=rows {
        owner[0] = row;
        let mut col0 = 0;
        let mut min_slack = vec![i64::MAX; cols + 1];
        let mut used = vec![false; cols + 1];
        loop {
            used[col0] = true;
            let row0 = owner[col0];
            let mut delta = i64::MAX;
            let mut col1 = 0;
            for col in 1..=cols {
                if used[col] {
                    continue;
                }
                let slack = cost(row0 - 1, col - 1) - row_potential[row0] - col_potential[col];
                if slack < min_slack[col] {
                    min_slack[col] = slack;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }
            for col in 0..=cols {
                if used[col] {
                    row_potential[owner[col]] += delta;
                    col_potential[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }
            col0 = col1;
            if owner[col0] == 0 {
                break;
            }
        }
        // Flip the augmenting path.
        loop {
            let col1 = way[col0];
            owner[col0] = owner[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = (1..=cols)
        .filter(|&col| owner[col] != 0)
        .map(|col| (owner[col] - 1, col - 1))
        .collect();
    pairs.sort_unstable();
    pairs
}

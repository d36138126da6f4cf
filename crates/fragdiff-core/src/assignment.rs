//! Greedy partial matching between two unordered multisets.
//!
//! Not a true minimum-cost bipartite matching (Hungarian algorithm): the
//! problem sizes here are small (declarations per file) and an approximate
//! match is good enough, as long as the tie-breaking rules below are
//! preserved so the output stays deterministic.

/// Result of [`greedy_match`].
///
/// `mat_a[r] == Some(c)` iff row `r` is matched to column `c` (and then
/// `mat_b[c] == Some(r)`); `None` marks an unmatched row/column.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub cost: i64,
    pub mat_a: Vec<Option<usize>>,
    pub mat_b: Vec<Option<usize>>,
}

/// Greedily matches rows to columns of `cost_matrix` (R x C), given a
/// per-row deletion penalty and per-column insertion penalty for leaving
/// that row/column unmatched.
///
/// Forms `M'[r][c] = M[r][c] - del_penalty(r) - ins_penalty(c)` and repeatedly
/// takes the cheapest remaining pair as long as it is strictly negative,
/// i.e. strictly cheaper than leaving both sides unmatched. Ties are broken
/// by row index, then column index.
pub fn greedy_match(
    cost_matrix: &[Vec<i64>],
    del_penalty: impl Fn(usize) -> i64,
    ins_penalty: impl Fn(usize) -> i64,
) -> Assignment {
    let rows = cost_matrix.len();
    let cols = cost_matrix.first().map_or(0, Vec::len);

    let mut adjusted = vec![vec![0i64; cols]; rows];
    for (r, row) in adjusted.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = cost_matrix[r][c] - del_penalty(r) - ins_penalty(c);
        }
    }

    let mut mat_a = vec![None; rows];
    let mut mat_b = vec![None; cols];

    loop {
        let mut pick: Option<(usize, usize, i64)> = None;
        for r in 0..rows {
            if mat_a[r].is_some() {
                continue;
            }
            for c in 0..cols {
                if mat_b[c].is_some() {
                    continue;
                }
                let v = adjusted[r][c];
                let better = match pick {
                    Some((_, _, best)) => v < best,
                    None => true,
                };
                if better {
                    pick = Some((r, c, v));
                }
            }
        }

        match pick {
            Some((r, c, v)) if v < 0 => {
                mat_a[r] = Some(c);
                mat_b[c] = Some(r);
            }
            _ => break,
        }
    }

    let mut cost = 0i64;
    for r in 0..rows {
        cost += match mat_a[r] {
            Some(c) => cost_matrix[r][c],
            None => del_penalty(r),
        };
    }
    for c in 0..cols {
        if mat_b[c].is_none() {
            cost += ins_penalty(c);
        }
    }

    Assignment { cost, mat_a, mat_b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matches_cost_zero() {
        let m = vec![vec![0, 100], vec![100, 0]];
        let a = greedy_match(&m, |_| 50, |_| 50);
        assert_eq!(a.mat_a, vec![Some(0), Some(1)]);
        assert_eq!(a.cost, 0);
    }

    #[test]
    fn never_matches_when_not_strictly_better() {
        // Matching costs exactly as much as leaving both sides unmatched:
        // M'[r][c] == 0, not < 0, so no match should be made.
        let m = vec![vec![100]];
        let a = greedy_match(&m, |_| 50, |_| 50);
        assert_eq!(a.mat_a, vec![None]);
        assert_eq!(a.cost, 100);
    }

    #[test]
    fn ties_prefer_lowest_row_then_column() {
        let m = vec![vec![0, 0], vec![0, 0]];
        let a = greedy_match(&m, |_| 10, |_| 10);
        // (0,0) is picked first; that removes row 0 and col 0 from
        // consideration, forcing (1,1).
        assert_eq!(a.mat_a, vec![Some(0), Some(1)]);
        assert_eq!(a.mat_b, vec![Some(0), Some(1)]);
    }

    #[test]
    fn empty_matrix() {
        let m: Vec<Vec<i64>> = vec![];
        let a = greedy_match(&m, |_| 0, |_| 0);
        assert_eq!(a.cost, 0);
        assert!(a.mat_a.is_empty() && a.mat_b.is_empty());
    }
}

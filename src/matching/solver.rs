//! 线性指派问题的精确求解
//!
//! 采用带势函数的最短增广路 Hungarian 算法, 最坏 O(N³)。
//! 每一轮把第 i 行接入当前匹配, 沿最短增广路翻转, 始终保持对偶可行,
//! 因此最终匹配是全局最优而不是贪心结果。
//! 同等代价的多组最优解之间按列号遍历顺序决出, 相同输入必得相同输出。

use crate::error::MatchError;
use ndarray::ArrayView2;

/// 指派结果: `columns[i]` 为第 i 行分配到的列
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub columns: Vec<usize>,
    pub total_cost: f64,
}

impl Assignment {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// 求最小总代价的完美匹配
///
/// 矩阵为空、非方阵或含 NaN/无穷时返回 [`MatchError::SolverInputInvalid`]。
pub fn solve(cost: ArrayView2<'_, f64>) -> Result<Assignment, MatchError> {
    let (rows, cols) = cost.dim();
    if rows == 0 || cols == 0 {
        return Err(MatchError::SolverInputInvalid(format!(
            "cost matrix is empty ({rows}x{cols})"
        )));
    }
    if rows != cols {
        return Err(MatchError::SolverInputInvalid(format!(
            "cost matrix is not square ({rows}x{cols})"
        )));
    }
    if let Some(((i, j), value)) = cost.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(MatchError::SolverInputInvalid(format!(
            "cost[{i}][{j}] is not finite ({value})"
        )));
    }

    let n = rows;
    // 下标 0 为虚拟列/行, 真实行列从 1 开始
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut owner = vec![0usize; n + 1]; // owner[j]: 占用第 j 列的行
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        owner[0] = i;
        let mut j0 = 0usize;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        // 1. 沿最短路扩展, 直到碰到空闲列
        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[[i0 - 1, j - 1]] - u[i0] - v[j];
                if reduced < min_slack[j] {
                    min_slack[j] = reduced;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }

            if j1 == 0 {
                return Err(MatchError::SolverInputInvalid(format!(
                    "no augmenting path found for row {}",
                    i - 1
                )));
            }

            // 2. 调整势函数, 保持对偶可行
            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // 3. 沿增广路翻转
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut columns = vec![0usize; n];
    for j in 1..=n {
        columns[owner[j] - 1] = j - 1;
    }
    let total_cost = total_cost(cost, &columns);

    tracing::debug!("指派求解完成: n={}, total_cost={}", n, total_cost);

    Ok(Assignment {
        columns,
        total_cost,
    })
}

/// 按给定排列累加代价
pub fn total_cost(cost: ArrayView2<'_, f64>, columns: &[usize]) -> f64 {
    columns
        .iter()
        .enumerate()
        .map(|(i, &j)| cost[[i, j]])
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    fn permutations(n: usize) -> Vec<Vec<usize>> {
        fn go(prefix: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
            if prefix.len() == used.len() {
                out.push(prefix.clone());
                return;
            }
            for j in 0..used.len() {
                if used[j] {
                    continue;
                }
                used[j] = true;
                prefix.push(j);
                go(prefix, used, out);
                prefix.pop();
                used[j] = false;
            }
        }

        let mut out = Vec::new();
        go(&mut Vec::new(), &mut vec![false; n], &mut out);
        out
    }

    fn brute_force_min(cost: &Array2<f64>) -> f64 {
        permutations(cost.nrows())
            .iter()
            .map(|p| total_cost(cost.view(), p))
            .fold(f64::INFINITY, f64::min)
    }

    fn is_permutation(columns: &[usize]) -> bool {
        let mut seen = vec![false; columns.len()];
        columns.iter().all(|&j| j < seen.len() && !std::mem::replace(&mut seen[j], true))
    }

    #[test]
    fn solves_identity_preference() {
        let cost = array![[0.0, 5.0, 5.0], [5.0, 0.0, 5.0], [5.0, 5.0, 0.0]];
        let result = solve(cost.view()).unwrap();
        assert_eq!(result.columns, vec![0, 1, 2]);
        assert_eq!(result.total_cost, 0.0);
    }

    #[test]
    fn beats_greedy_choice() {
        // 贪心会让第 0 行拿走第 0 列 (代价 1), 迫使第 1 行付出 100
        let cost = array![[1.0, 2.0], [2.0, 100.0]];
        let result = solve(cost.view()).unwrap();
        assert_eq!(result.columns, vec![1, 0]);
        assert_eq!(result.total_cost, 4.0);
    }

    #[test]
    fn handles_negative_costs() {
        let cost = array![[-100.0, -20.0], [-30.0, -100.0]];
        let result = solve(cost.view()).unwrap();
        assert_eq!(result.columns, vec![0, 1]);
        assert_eq!(result.total_cost, -200.0);
    }

    #[test]
    fn single_cell_matrix() {
        let cost = array![[42.0]];
        let result = solve(cost.view()).unwrap();
        assert_eq!(result.columns, vec![0]);
        assert_eq!(result.total_cost, 42.0);
    }

    #[test]
    fn rejects_empty_matrix() {
        let cost = Array2::<f64>::zeros((0, 0));
        assert!(matches!(
            solve(cost.view()),
            Err(MatchError::SolverInputInvalid(_))
        ));
    }

    #[test]
    fn rejects_non_square_matrix() {
        let cost = Array2::<f64>::zeros((2, 3));
        let err = solve(cost.view()).unwrap_err();
        assert!(matches!(err, MatchError::SolverInputInvalid(ref m) if m.contains("2x3")));
    }

    #[test]
    fn rejects_non_finite_entries() {
        let cost = array![[0.0, f64::NAN], [1.0, 0.0]];
        assert!(matches!(
            solve(cost.view()),
            Err(MatchError::SolverInputInvalid(_))
        ));

        let cost = array![[0.0, 1.0], [f64::INFINITY, 0.0]];
        assert!(matches!(
            solve(cost.view()),
            Err(MatchError::SolverInputInvalid(_))
        ));
    }

    #[test]
    fn ties_are_broken_reproducibly() {
        let cost = Array2::<f64>::from_elem((5, 5), -50.0);
        let first = solve(cost.view()).unwrap();
        let second = solve(cost.view()).unwrap();
        assert_eq!(first, second);
        assert!(is_permutation(&first.columns));
    }

    fn square_matrix(max_n: usize) -> impl Strategy<Value = Array2<f64>> {
        (1..=max_n).prop_flat_map(|n| {
            prop::collection::vec(-100i32..=100, n * n).prop_map(move |cells| {
                Array2::from_shape_vec((n, n), cells.into_iter().map(f64::from).collect())
                    .unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn solution_is_globally_optimal(cost in square_matrix(6)) {
            let result = solve(cost.view()).unwrap();
            let best = brute_force_min(&cost);
            prop_assert!((result.total_cost - best).abs() < 1e-9,
                "solver {} vs brute force {}", result.total_cost, best);
        }

        #[test]
        fn solution_is_a_permutation(cost in square_matrix(12)) {
            let result = solve(cost.view()).unwrap();
            prop_assert_eq!(result.len(), cost.nrows());
            prop_assert!(is_permutation(&result.columns));
        }

        #[test]
        fn fractional_costs_stay_optimal(
            cells in prop::collection::vec(-100.0f64..0.0, 25),
        ) {
            let cost = Array2::from_shape_vec((5, 5), cells).unwrap();
            let result = solve(cost.view()).unwrap();
            prop_assert!(result.total_cost <= brute_force_min(&cost) + 1e-6);
        }

        #[test]
        fn solving_is_deterministic(cost in square_matrix(8)) {
            prop_assert_eq!(solve(cost.view()).unwrap(), solve(cost.view()).unwrap());
        }
    }
}

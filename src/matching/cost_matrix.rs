use super::normalize::normalize;
use super::similarity::Scorer;
use crate::error::MatchError;
use ndarray::Array2;
use rayon::prelude::*;

/// 构建代价矩阵: `cost[i][j] = -similarity(ref[i], cand[j])`
///
/// 两侧文本先归一化再评分。`parallel` 为 true 时按行并行计算, 结果与串行完全一致。
pub fn build_cost_matrix<R, C>(
    reference: &[R],
    candidates: &[C],
    scorer: Scorer,
    parallel: bool,
) -> Result<Array2<f64>, MatchError>
where
    R: AsRef<str> + Sync,
    C: AsRef<str> + Sync,
{
    let rows: Vec<String> = reference.iter().map(|r| normalize(r.as_ref())).collect();
    let cols: Vec<String> = candidates.iter().map(|c| normalize(c.as_ref())).collect();

    let score_row = |row: &String| -> Vec<f64> {
        cols.iter().map(|col| -scorer.score(row, col)).collect()
    };

    let data: Vec<f64> = if parallel {
        rows.par_iter().flat_map_iter(score_row).collect()
    } else {
        rows.iter().flat_map(score_row).collect()
    };

    tracing::debug!(
        "代价矩阵构建完成: {}x{}, scorer={:?}, parallel={}",
        rows.len(),
        cols.len(),
        scorer,
        parallel
    );

    Array2::from_shape_vec((rows.len(), cols.len()), data)
        .map_err(|e| MatchError::SolverInputInvalid(format!("cost matrix shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::similarity::MAX_SCORE;

    #[test]
    fn entries_are_negated_similarity_of_normalized_text() {
        let reference = ["Hello there!", "Goodbye, now"];
        let candidates = ["goodbye now", "HELLO THERE"];
        let cost = build_cost_matrix(&reference, &candidates, Scorer::Ratio, false).unwrap();

        assert_eq!(cost.dim(), (2, 2));
        assert_eq!(cost[[0, 1]], -MAX_SCORE);
        assert_eq!(cost[[1, 0]], -MAX_SCORE);
        assert!(cost[[0, 0]] > -MAX_SCORE);
        assert!(cost[[1, 1]] > -MAX_SCORE);
    }

    #[test]
    fn rectangular_inputs_produce_rectangular_matrix() {
        let cost = build_cost_matrix(&["a", "b", "c"], &["a", "b"], Scorer::Ratio, false).unwrap();
        assert_eq!(cost.dim(), (3, 2));
    }

    #[test]
    fn parallel_build_matches_serial_build() {
        let reference: Vec<String> = (0..17).map(|i| format!("line number {i}")).collect();
        let candidates: Vec<String> = (0..17).rev().map(|i| format!("line numbr {i}")).collect();

        for scorer in [Scorer::Ratio, Scorer::Levenshtein] {
            let serial = build_cost_matrix(&reference, &candidates, scorer, false).unwrap();
            let parallel = build_cost_matrix(&reference, &candidates, scorer, true).unwrap();
            assert_eq!(serial, parallel);
        }
    }

    #[test]
    fn build_is_deterministic() {
        let reference = ["the quick brown fox", "jumps over", "the lazy dog"];
        let candidates = ["lazy dog", "quick brown fox", "jumped over"];
        let first = build_cost_matrix(&reference, &candidates, Scorer::Ratio, false).unwrap();
        let second = build_cost_matrix(&reference, &candidates, Scorer::Ratio, false).unwrap();
        assert_eq!(first, second);
    }
}

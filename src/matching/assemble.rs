use super::normalize::normalize;
use super::solver::Assignment;
use crate::error::MatchError;
use crate::models::{CandidateText, MatchedPair, ReferenceLine};
use indexmap::IndexSet;
use ndarray::ArrayView2;

/// 数量校验: 参考台词与候选必须一一对应
pub fn validate_cardinality(reference: usize, candidates: usize) -> Result<(), MatchError> {
    if reference != candidates {
        return Err(MatchError::CardinalityMismatch {
            reference,
            candidates,
        });
    }
    Ok(())
}

/// 记录完整性校验: 候选来源标识非空且唯一, 参考台词 index 唯一
pub fn validate_records(
    reference: &[ReferenceLine],
    candidates: &[CandidateText],
) -> Result<(), MatchError> {
    let mut indexes: IndexSet<usize> = IndexSet::with_capacity(reference.len());
    for line in reference {
        if !indexes.insert(line.index) {
            return Err(MatchError::MalformedInput(format!(
                "duplicate reference line index {}",
                line.index
            )));
        }
    }

    let mut sources: IndexSet<&str> = IndexSet::with_capacity(candidates.len());
    for (pos, candidate) in candidates.iter().enumerate() {
        if candidate.source_id.trim().is_empty() {
            return Err(MatchError::MalformedInput(format!(
                "candidate #{pos} has an empty source identifier"
            )));
        }
        if !sources.insert(candidate.source_id.as_str()) {
            return Err(MatchError::MalformedInput(format!(
                "duplicate candidate source identifier '{}'",
                candidate.source_id
            )));
        }
    }

    Ok(())
}

/// 按参考台词原顺序拼装匹配结果
///
/// `cost` 为求解时使用的代价矩阵, 用于回填每对的相似度 (`-cost`)。
pub fn assemble(
    reference: &[ReferenceLine],
    candidates: &[CandidateText],
    assignment: &Assignment,
    cost: ArrayView2<'_, f64>,
) -> Result<Vec<MatchedPair>, MatchError> {
    if assignment.len() != reference.len() {
        return Err(MatchError::SolverInputInvalid(format!(
            "assignment covers {} rows but reference has {} lines",
            assignment.len(),
            reference.len()
        )));
    }

    reference
        .iter()
        .zip(&assignment.columns)
        .enumerate()
        .map(|(row, (line, &col))| {
            let candidate = candidates.get(col).ok_or_else(|| {
                MatchError::SolverInputInvalid(format!(
                    "row {row} assigned to missing candidate column {col}"
                ))
            })?;
            Ok(MatchedPair {
                reference: line.clone(),
                candidate: candidate.clone(),
                similarity: -cost[[row, col]],
                candidate_normalized: normalize(&candidate.text),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use proptest::prelude::*;

    fn candidates(n: usize) -> Vec<CandidateText> {
        (0..n)
            .map(|i| CandidateText::new(format!("{i}.wav"), format!("Text {i}!")))
            .collect()
    }

    #[test]
    fn equal_counts_pass() {
        assert!(validate_cardinality(4, 4).is_ok());
        assert!(validate_cardinality(0, 0).is_ok());
    }

    #[test]
    fn unequal_counts_report_both_sides() {
        assert_eq!(
            validate_cardinality(3, 2),
            Err(MatchError::CardinalityMismatch {
                reference: 3,
                candidates: 2
            })
        );
    }

    #[test]
    fn rejects_duplicate_source_ids() {
        let reference = ReferenceLine::from_texts(["a", "b"]);
        let candidates = vec![CandidateText::new("x.wav", "a"), CandidateText::new("x.wav", "b")];
        let err = validate_records(&reference, &candidates).unwrap_err();
        assert!(matches!(err, MatchError::MalformedInput(ref m) if m.contains("x.wav")));
    }

    #[test]
    fn rejects_blank_source_id() {
        let reference = ReferenceLine::from_texts(["a"]);
        let candidates = vec![CandidateText::new("  ", "a")];
        assert!(matches!(
            validate_records(&reference, &candidates),
            Err(MatchError::MalformedInput(_))
        ));
    }

    #[test]
    fn rejects_duplicate_reference_index() {
        let reference = vec![ReferenceLine::new(1, "a"), ReferenceLine::new(1, "b")];
        assert!(matches!(
            validate_records(&reference, &candidates(2)),
            Err(MatchError::MalformedInput(_))
        ));
    }

    #[test]
    fn assemble_fills_similarity_and_normalized_text() {
        let reference = ReferenceLine::from_texts(["one", "two"]);
        let cands = candidates(2);
        let cost = ndarray::array![[-10.0, -90.0], [-80.0, -20.0]];
        let assignment = Assignment {
            columns: vec![1, 0],
            total_cost: -170.0,
        };

        let pairs = assemble(&reference, &cands, &assignment, cost.view()).unwrap();
        assert_eq!(pairs[0].candidate.source_id, "1.wav");
        assert_eq!(pairs[0].similarity, 90.0);
        assert_eq!(pairs[0].candidate_normalized, "text 1");
        assert_eq!(pairs[1].candidate.source_id, "0.wav");
        assert_eq!(pairs[1].similarity, 80.0);
    }

    #[test]
    fn assemble_rejects_out_of_range_column() {
        let reference = ReferenceLine::from_texts(["one"]);
        let assignment = Assignment {
            columns: vec![3],
            total_cost: 0.0,
        };
        let cost = Array2::<f64>::zeros((1, 4));
        assert!(assemble(&reference, &candidates(1), &assignment, cost.view()).is_err());
    }

    proptest! {
        #[test]
        fn output_follows_reference_order(
            perm in (1usize..10).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        ) {
            let n = perm.len();
            let reference: Vec<ReferenceLine> =
                ReferenceLine::from_texts((0..n).map(|i| format!("line {i}")));
            let cands = candidates(n);
            let cost = Array2::<f64>::zeros((n, n));
            let assignment = Assignment { columns: perm.clone(), total_cost: 0.0 };

            let pairs = assemble(&reference, &cands, &assignment, cost.view()).unwrap();
            prop_assert_eq!(pairs.len(), n);
            for (i, pair) in pairs.iter().enumerate() {
                prop_assert_eq!(&pair.reference, &reference[i]);
                prop_assert_eq!(&pair.candidate, &cands[perm[i]]);
            }
        }
    }
}

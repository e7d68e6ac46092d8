//! 参考台词与转写候选的全局最优一一匹配
//!
//! 流程: 数量校验 → 记录校验 → 归一化 + 两两评分 → 代价矩阵 → Hungarian 求解 → 按参考顺序拼装。

pub mod assemble;
pub mod cost_matrix;
pub mod normalize;
pub mod similarity;
pub mod solver;

pub use assemble::{assemble, validate_cardinality, validate_records};
pub use cost_matrix::build_cost_matrix;
pub use normalize::normalize;
pub use similarity::{ratio, Scorer, MAX_SCORE};
pub use solver::{solve, Assignment};

use crate::error::MatchError;
use crate::models::{CandidateText, MatchedPair, ReferenceLine};
use serde::{Deserialize, Serialize};

/// 匹配参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    #[serde(default)]
    pub scorer: Scorer,
    /// 代价矩阵按行并行计算
    #[serde(default)]
    pub parallel: bool,
}

/// 匹配核心入口, 无内部状态
#[derive(Debug, Clone, Default)]
pub struct LineMatcher {
    options: MatchOptions,
}

impl LineMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// 计算全局最优配对, 输出顺序与 `reference` 一致
    pub fn match_lines(
        &self,
        reference: &[ReferenceLine],
        candidates: &[CandidateText],
    ) -> Result<Vec<MatchedPair>, MatchError> {
        // 1. 数量必须一致, 否则不进入评分和求解
        validate_cardinality(reference.len(), candidates.len())?;
        validate_records(reference, candidates)?;

        if reference.is_empty() {
            tracing::warn!("参考台词与候选均为空, 跳过匹配");
            return Ok(Vec::new());
        }

        tracing::info!(
            "开始匹配: {} 条台词, {} 个候选, scorer={:?}",
            reference.len(),
            candidates.len(),
            self.options.scorer
        );

        // 2. 代价矩阵
        let ref_texts: Vec<&str> = reference.iter().map(|r| r.text.as_str()).collect();
        let cand_texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        let cost = build_cost_matrix(
            &ref_texts,
            &cand_texts,
            self.options.scorer,
            self.options.parallel,
        )?;

        // 3. 最优指派
        let assignment = solve(cost.view())?;

        // 4. 拼装
        let pairs = assemble(reference, candidates, &assignment, cost.view())?;

        tracing::info!(
            "匹配完成: {} 对, 总相似度 {:.2}",
            pairs.len(),
            -assignment.total_cost
        );

        Ok(pairs)
    }
}

/// 使用默认参数匹配
pub fn match_lines(
    reference: &[ReferenceLine],
    candidates: &[CandidateText],
) -> Result<Vec<MatchedPair>, MatchError> {
    LineMatcher::default().match_lines(reference, candidates)
}

//! 基于编辑距离的相似度评分, 范围 0-100

use serde::{Deserialize, Serialize};

/// 满分 (两串完全一致)
pub const MAX_SCORE: f64 = 100.0;

/// 相似度算法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Indel 距离归一化比率 (常见的 fuzzy ratio)
    #[default]
    Ratio,
    /// Levenshtein 距离按较长串长度归一化
    Levenshtein,
}

impl Scorer {
    /// 计算两段已归一化文本的相似度
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Scorer::Ratio => ratio(a, b),
            Scorer::Levenshtein => MAX_SCORE * strsim::normalized_levenshtein(a, b),
        }
    }
}

/// `100 * (1 - indel / (len(a) + len(b)))`, 其中 indel 只计插入和删除
///
/// 两个空串视为完全一致。
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return MAX_SCORE;
    }

    let lcs = lcs_len(&a, &b);
    let indel = total - 2 * lcs;
    MAX_SCORE * (1.0 - indel as f64 / total as f64)
}

/// 最长公共子序列长度, 滚动两行 DP
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // 短串做列, 省内存
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &x in long {
        for (j, &y) in short.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

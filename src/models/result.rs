use super::{CandidateText, ReferenceLine};
use serde::{Deserialize, Serialize};

/// 匹配结果: 一条参考台词 + 唯一的候选转写
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub reference: ReferenceLine,
    pub candidate: CandidateText,
    /// 归一化后的相似度 (0-100)
    pub similarity: f64,
    /// 归一化后的候选文本, 写入 assignments.csv
    pub candidate_normalized: String,
}

/// assignments.csv 的一行 (列名与旧版导出文件保持一致)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    #[serde(rename = "OUTPUT_WAV_PATHNAME")]
    pub output_wav_pathname: String,
    #[serde(rename = "CONVERSATION_TEXT")]
    pub conversation_text: String,
    #[serde(rename = "INPUT_WAV_PATHNAME")]
    pub input_wav_pathname: String,
    #[serde(rename = "INPUT_WAV_TEXT_PROCESSED")]
    pub input_wav_text_processed: String,
}

/// 匹配统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub lines: usize,
    pub total_similarity: f64,
    pub mean_similarity: f64,
    pub min_similarity: f64,
}

impl MatchStats {
    pub fn from_pairs(pairs: &[MatchedPair]) -> Self {
        let lines = pairs.len();
        let total_similarity: f64 = pairs.iter().map(|p| p.similarity).sum();
        let min_similarity = pairs
            .iter()
            .map(|p| p.similarity)
            .fold(f64::INFINITY, f64::min);

        Self {
            lines,
            total_similarity,
            mean_similarity: if lines == 0 {
                0.0
            } else {
                total_similarity / lines as f64
            },
            min_similarity: if lines == 0 { 0.0 } else { min_similarity },
        }
    }
}

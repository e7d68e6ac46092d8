use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 候选转写文本 (无序, 通常来自一个 wav 文件)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateText {
    /// 来源标识, 一般是输入 wav 文件名
    pub source_id: String,
    pub text: String,
    /// 来源文件完整路径, 导出音频时使用
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl CandidateText {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
            source_path: None,
        }
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 参考台词 (按会话顺序排列)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub index: usize,
    pub text: String,
    /// 导出目标文件名 (OUTPUT_WAV_FILENAME)
    #[serde(default)]
    pub output_name: Option<String>,
    /// 其余列原样透传
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ReferenceLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            output_name: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// 按给定顺序生成参考台词, index 从 0 开始
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Self::new(index, text))
            .collect()
    }
}

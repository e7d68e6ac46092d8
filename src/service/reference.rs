use crate::error::{AppError, MatchError};
use crate::models::ReferenceLine;
use std::collections::BTreeMap;
use std::path::Path;

pub const TEXT_COLUMN: &str = "CONVERSATION_TEXT";
pub const OUTPUT_COLUMN: &str = "OUTPUT_WAV_FILENAME";

/// 从 CSV 读取参考台词 (无数据库时使用)
///
/// 必需列为 `CONVERSATION_TEXT` 与 `OUTPUT_WAV_FILENAME`, 其余列写入 metadata。
/// 行顺序即台词顺序。
pub fn load_reference_csv(path: &Path) -> Result<Vec<ReferenceLine>, AppError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| AppError::csv(path, e))?;
    let headers = reader.headers().map_err(|e| AppError::csv(path, e))?.clone();

    let column = |name: &str| {
        headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
            MatchError::MalformedInput(format!("{} is missing column {name}", path.display()))
        })
    };
    let text_idx = column(TEXT_COLUMN)?;
    let output_idx = column(OUTPUT_COLUMN)?;

    let mut lines = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| AppError::csv(path, e))?;

        let text = record.get(text_idx).ok_or_else(|| {
            MatchError::MalformedInput(format!("row {index}: {TEXT_COLUMN} is missing"))
        })?;
        let output_name = record
            .get(output_idx)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                MatchError::MalformedInput(format!("row {index}: {OUTPUT_COLUMN} is missing"))
            })?;

        let metadata: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(i, _)| *i != text_idx && *i != output_idx)
            .map(|(_, (h, v))| (h.to_string(), v.to_string()))
            .collect();

        let mut line = ReferenceLine::new(index, text).with_output_name(output_name);
        line.metadata = metadata;
        lines.push(line);
    }

    tracing::info!("从 {} 读取 {} 条台词", path.display(), lines.len());
    Ok(lines)
}

use crate::error::{AppError, MatchError};
use crate::models::ReferenceLine;
use futures::TryStreamExt;
use sqlx::{FromRow, PgPool};
use std::path::Path;

/// 模板中的会话名占位符
pub const CONVERSATION_PLACEHOLDER: &str = "<conversation_name>";
/// 模板中的模块 UID 占位符
pub const MODULE_PLACEHOLDER: &str = "<uid_name>";

/// 台词查询结果行
#[derive(Debug, Clone, FromRow)]
pub struct ConversationLineRow {
    pub conversation_text: Option<String>,
    pub output_wav_filename: Option<String>,
}

impl ConversationLineRow {
    /// 转换为参考台词, 缺少任一必填列视为输入错误
    pub fn into_reference_line(self, index: usize) -> Result<ReferenceLine, MatchError> {
        let text = self.conversation_text.ok_or_else(|| {
            MatchError::MalformedInput(format!("line {index}: conversation_text is NULL"))
        })?;
        let output_name = self
            .output_wav_filename
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                MatchError::MalformedInput(format!("line {index}: output_wav_filename is missing"))
            })?;

        Ok(ReferenceLine::new(index, text).with_output_name(output_name))
    }
}

/// 把 SQL 模板中的占位符替换为绑定参数 ($1 会话名, $2 模块 UID)
pub fn render_line_query(template: &str) -> String {
    template
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ")
        .replace(CONVERSATION_PLACEHOLDER, "$1")
        .replace(MODULE_PLACEHOLDER, "$2")
}

/// 读取 SQL 模板文件
pub fn load_line_query(path: &Path) -> Result<String, AppError> {
    let template = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Ok(render_line_query(&template))
}

/// 按查询顺序拉取会话台词
pub async fn list_conversation_lines(
    pool: &PgPool,
    sql: &str,
    conversation: &str,
    module_uid: &str,
) -> Result<Vec<ReferenceLine>, AppError> {
    let mut rows = sqlx::query_as::<_, ConversationLineRow>(sql)
        .bind(conversation)
        .bind(module_uid)
        .fetch(pool);

    let mut lines = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let line = row.into_reference_line(lines.len())?;
        lines.push(line);
    }

    tracing::info!(
        "会话 {} (模块 {}) 查询到 {} 条台词",
        conversation,
        module_uid,
        lines.len()
    );

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_become_bind_parameters() {
        let template = "SELECT conversation_text, output_wav_filename\n\
                        FROM lines\n\
                        WHERE conversation = <conversation_name>\n\
                          AND module_uid = <uid_name>\n\
                        ORDER BY line_order";
        let sql = render_line_query(template);
        assert!(sql.contains("conversation = $1"));
        assert!(sql.contains("module_uid = $2"));
        assert!(!sql.contains('<'));
        assert!(!sql.contains('\n'));
    }

    #[test]
    fn row_with_null_text_is_malformed() {
        let row = ConversationLineRow {
            conversation_text: None,
            output_wav_filename: Some("a.wav".into()),
        };
        assert!(matches!(
            row.into_reference_line(0),
            Err(MatchError::MalformedInput(_))
        ));
    }

    #[test]
    fn row_without_output_name_is_malformed() {
        let row = ConversationLineRow {
            conversation_text: Some("hello".into()),
            output_wav_filename: Some("  ".into()),
        };
        assert!(row.into_reference_line(2).is_err());
    }

    #[test]
    fn complete_row_keeps_index_and_output_name() {
        let row = ConversationLineRow {
            conversation_text: Some("Hello there.".into()),
            output_wav_filename: Some("npc_0001.wav".into()),
        };
        let line = row.into_reference_line(4).unwrap();
        assert_eq!(line.index, 4);
        assert_eq!(line.text, "Hello there.");
        assert_eq!(line.output_name.as_deref(), Some("npc_0001.wav"));
    }

    #[test]
    fn missing_template_file_reports_path() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("line_lookup.sql");
        let err = load_line_query(&path).unwrap_err();
        assert!(err.to_string().contains("line_lookup.sql"));
    }
}

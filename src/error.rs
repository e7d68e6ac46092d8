use std::path::PathBuf;
use thiserror::Error;

/// 匹配核心错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// 参考台词数量与候选转写数量不一致
    #[error(
        "reference has {reference} lines but {candidates} candidates were supplied; \
         the counts must be equal (usually an extra or missing wav file)"
    )]
    CardinalityMismatch { reference: usize, candidates: usize },

    /// 输入记录缺少必填字段或存在重复标识
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// 代价矩阵非方阵、为空或含非有限值
    #[error("invalid solver input: {0}")]
    SolverInputInvalid(String),
}

/// 应用层错误 (数据源、文件、导出)
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("audio error in {path}: {source}")]
    Audio {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn audio(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        Self::Audio {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinality_message_reports_both_counts() {
        let err = MatchError::CardinalityMismatch {
            reference: 3,
            candidates: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 lines"));
        assert!(msg.contains("2 candidates"));
    }

    #[test]
    fn match_error_converts_into_app_error() {
        let app: AppError = MatchError::MalformedInput("empty source id".into()).into();
        assert!(matches!(app, AppError::Match(MatchError::MalformedInput(_))));
        assert_eq!(app.to_string(), "malformed input: empty source id");
    }
}

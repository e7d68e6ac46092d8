use crate::error::MatchError;
use crate::matching::{LineMatcher, MatchOptions};
use crate::models::{CandidateText, MatchStats, MatchedPair, ReferenceLine};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 参考台词 + 转写候选
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub reference: Vec<ReferenceLine>,
    pub candidates: Vec<CandidateText>,
    /// 覆盖服务端默认匹配参数
    #[serde(default)]
    pub options: Option<MatchOptions>,
}

/// 响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub success: bool,
    pub message: String,
    pub pairs: Option<Vec<MatchedPair>>,
    pub stats: Option<MatchStats>,
}

impl MatchResponse {
    fn failure(status: StatusCode, message: String) -> Response {
        let response = Self {
            success: false,
            message,
            pairs: None,
            stats: None,
        };
        (status, Json(response)).into_response()
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 匹配接口
pub async fn match_lines(
    State(matcher): State<Arc<LineMatcher>>,
    Json(req): Json<MatchRequest>,
) -> Response {
    let matcher = match req.options {
        Some(options) => Arc::new(LineMatcher::new(options)),
        None => matcher,
    };

    let result = tokio::task::spawn_blocking(move || {
        matcher.match_lines(&req.reference, &req.candidates)
    })
    .await;

    match result {
        Ok(Ok(pairs)) => {
            let stats = MatchStats::from_pairs(&pairs);
            let response = MatchResponse {
                success: true,
                message: format!("Successfully matched {} lines", pairs.len()),
                pairs: Some(pairs),
                stats: Some(stats),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(e)) => {
            let status = match e {
                MatchError::CardinalityMismatch { .. } | MatchError::MalformedInput(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                MatchError::SolverInputInvalid(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!("匹配失败: {}", e);
            MatchResponse::failure(status, format!("Error: {}", e))
        }
        Err(e) => {
            tracing::error!("匹配任务异常退出: {}", e);
            MatchResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e))
        }
    }
}

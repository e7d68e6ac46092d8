use crate::config::AppConfig;
use crate::db::{self, queries};
use crate::error::AppError;
use crate::matching::{validate_cardinality, LineMatcher};
use crate::models::{MatchStats, ReferenceLine};
use crate::service::export::{
    export_audio, read_assignments, records_from_pairs, write_assignments,
};
use crate::service::reference::load_reference_csv;
use crate::service::transcripts::{
    list_wavs, load_candidates, ManifestTranscriber, SidecarTranscriber, Transcriber,
};
use std::path::Path;

/// 台词分配服务: 推断模式 (匹配 + 导出) 与强制模式 (按已有结果导出)
pub struct AssignmentService {
    config: AppConfig,
    matcher: LineMatcher,
}

impl AssignmentService {
    pub fn new(config: AppConfig) -> Self {
        let matcher = LineMatcher::new(config.matching);
        Self { config, matcher }
    }

    /// 从数据库读取会话台词后执行推断
    pub async fn infer_from_database(
        &self,
        conversation: &str,
        module_uid: &str,
    ) -> Result<MatchStats, AppError> {
        let sql = queries::load_line_query(&self.config.database.query_path)?;
        let pool = db::create_pool(&self.config.database).await?;
        tracing::info!("Database pool created");

        let lines = queries::list_conversation_lines(&pool, &sql, conversation, module_uid).await;
        pool.close().await;

        self.infer(lines?)
    }

    /// 从 CSV 读取会话台词后执行推断
    pub fn infer_from_csv(&self, path: &Path) -> Result<MatchStats, AppError> {
        let lines = load_reference_csv(path)?;
        self.infer(lines)
    }

    /// 推断模式: 转写候选 → 最优匹配 → 音频转码 + assignments.csv
    pub fn infer(&self, reference: Vec<ReferenceLine>) -> Result<MatchStats, AppError> {
        let paths = &self.config.paths;

        // 1. wav 数量先与台词数量对齐, 不一致时不读取转写
        let wavs = list_wavs(&paths.input_dir)?;
        validate_cardinality(reference.len(), wavs.len())?;

        // 2. 转写候选
        let manifest_path = paths.manifest_path();
        let transcriber: Box<dyn Transcriber> = if manifest_path.is_file() {
            Box::new(ManifestTranscriber::from_path(&manifest_path)?)
        } else {
            tracing::info!("未找到转写清单, 读取同名 .txt 转写");
            Box::new(SidecarTranscriber)
        };
        let candidates = load_candidates(&wavs, transcriber.as_ref())?;

        // 3. 匹配
        let pairs = self.matcher.match_lines(&reference, &candidates)?;
        let stats = MatchStats::from_pairs(&pairs);

        // 4. 导出
        let records = records_from_pairs(&pairs, paths)?;
        export_audio(&records, &self.config.audio)?;
        write_assignments(&paths.assignment_output(), &records)?;

        tracing::info!(
            "推断完成: {} 条台词, 平均相似度 {:.2}, 最低 {:.2}",
            stats.lines,
            stats.mean_similarity,
            stats.min_similarity
        );
        Ok(stats)
    }

    /// 强制模式: 按 input_dir 下已有的 assignments.csv 重新导出
    pub fn force(&self) -> Result<usize, AppError> {
        let paths = &self.config.paths;
        let input = paths.assignment_input();
        tracing::info!("Forcing assignments from {}", input.display());

        let records = read_assignments(&input)?;
        export_audio(&records, &self.config.audio)?;
        write_assignments(&paths.assignment_output(), &records)?;

        Ok(records.len())
    }
}

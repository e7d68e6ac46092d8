//! 转写候选的获取
//!
//! 语音识别在上游完成; 这里只负责发现输入 wav 并取回对应的转写文本。

use crate::error::{AppError, MatchError};
use crate::models::CandidateText;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 转写来源
pub trait Transcriber {
    /// 返回某个 wav 文件的转写文本
    fn transcribe(&self, wav: &Path) -> Result<String, AppError>;
}

/// 读取与 wav 同名的 `.txt` 文件
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarTranscriber;

impl Transcriber for SidecarTranscriber {
    fn transcribe(&self, wav: &Path) -> Result<String, AppError> {
        let sidecar = wav.with_extension("txt");
        if !sidecar.is_file() {
            return Err(MatchError::MalformedInput(format!(
                "no transcript for {} (expected {})",
                wav.display(),
                sidecar.display()
            ))
            .into());
        }
        std::fs::read_to_string(&sidecar).map_err(|e| AppError::io(&sidecar, e))
    }
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    #[serde(rename = "INPUT_WAV_FILENAME")]
    file_name: String,
    #[serde(rename = "TEXT")]
    text: String,
}

/// 从转写清单 (`INPUT_WAV_FILENAME,TEXT`) 读取
#[derive(Debug, Clone, Default)]
pub struct ManifestTranscriber {
    entries: HashMap<String, String>,
}

impl ManifestTranscriber {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| AppError::csv(path, e))?;
        let mut entries = HashMap::new();
        for row in reader.deserialize::<ManifestRow>() {
            let row = row.map_err(|e| AppError::csv(path, e))?;
            if entries.insert(row.file_name.clone(), row.text).is_some() {
                tracing::warn!("转写清单中 {} 重复出现, 使用最后一条", row.file_name);
            }
        }
        tracing::info!("转写清单 {} 共 {} 条", path.display(), entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Transcriber for ManifestTranscriber {
    fn transcribe(&self, wav: &Path) -> Result<String, AppError> {
        let name = file_name(wav);
        self.entries.get(&name).cloned().ok_or_else(|| {
            let message = format!("transcript manifest has no entry for {name}");
            MatchError::MalformedInput(message).into()
        })
    }
}

/// 列出目录下的 wav 文件, 按文件名排序
pub fn list_wavs(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir).map_err(|e| AppError::io(dir, e))?;

    let mut wavs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AppError::io(dir, e))?.path();
        let is_wav = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if is_wav && path.is_file() {
            wavs.push(path);
        }
    }
    wavs.sort_by_key(|p| file_name(p));

    tracing::info!("{} 下发现 {} 个 wav 文件", dir.display(), wavs.len());
    Ok(wavs)
}

/// 为每个 wav 取回转写, 生成候选
pub fn load_candidates(
    wavs: &[PathBuf],
    transcriber: &dyn Transcriber,
) -> Result<Vec<CandidateText>, AppError> {
    wavs.iter()
        .map(|wav| {
            let text = transcriber.transcribe(wav)?;
            Ok(CandidateText::new(file_name(wav), text).with_source_path(wav))
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

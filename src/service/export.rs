//! 匹配结果导出: 音频转码 + assignments.csv

use crate::config::{AudioConfig, PathsConfig};
use crate::error::{AppError, MatchError};
use crate::models::{AssignmentRecord, MatchedPair};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// 由匹配结果生成导出记录
///
/// 输出路径为 `output_dir/<output_name>`, 输入路径优先使用候选的完整路径。
pub fn records_from_pairs(
    pairs: &[MatchedPair],
    paths: &PathsConfig,
) -> Result<Vec<AssignmentRecord>, MatchError> {
    pairs
        .iter()
        .map(|pair| {
            let output_name = pair.reference.output_name.as_deref().ok_or_else(|| {
                MatchError::MalformedInput(format!(
                    "reference line {} has no output file name",
                    pair.reference.index
                ))
            })?;
            let input_path = pair
                .candidate
                .source_path
                .clone()
                .unwrap_or_else(|| paths.input_dir.join(&pair.candidate.source_id));

            Ok(AssignmentRecord {
                output_wav_pathname: paths.output_dir.join(output_name).display().to_string(),
                conversation_text: pair.reference.text.clone(),
                input_wav_pathname: input_path.display().to_string(),
                input_wav_text_processed: pair.candidate_normalized.clone(),
            })
        })
        .collect()
}

/// 写出 assignments.csv
pub fn write_assignments(path: &Path, records: &[AssignmentRecord]) -> Result<(), AppError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| AppError::csv(path, e))?;
    for record in records {
        writer.serialize(record).map_err(|e| AppError::csv(path, e))?;
    }
    writer.flush().map_err(|e| AppError::io(path, e))?;

    tracing::info!("写出 {} 条匹配记录到 {}", records.len(), path.display());
    Ok(())
}

/// 读取已保存的 assignments.csv
pub fn read_assignments(path: &Path) -> Result<Vec<AssignmentRecord>, AppError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| AppError::csv(path, e))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| AppError::csv(path, e)))
        .collect()
}

/// 按记录逐个转码音频
pub fn export_audio(records: &[AssignmentRecord], audio: &AudioConfig) -> Result<(), AppError> {
    audio.validate()?;
    let total = records.len();
    for (idx, record) in records.iter().enumerate() {
        transcode_wav(
            Path::new(&record.input_wav_pathname),
            Path::new(&record.output_wav_pathname),
            audio,
        )?;

        let current = idx + 1;
        if current % 50 == 0 || current == total {
            tracing::info!("音频导出进度: {}/{}", current, total);
        }
    }
    Ok(())
}

/// 转码 wav: 目标采样率与位深取自配置, 声道数保持不变
pub fn transcode_wav(input: &Path, output: &Path, audio: &AudioConfig) -> Result<(), AppError> {
    // 位深不合法时 hound 会直接 panic
    audio.validate()?;
    let mut reader = WavReader::open(input).map_err(|e| AppError::audio(input, e))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    // 统一转为 [-1, 1] 浮点
    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AppError::audio(input, e))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| AppError::audio(input, e))?
        }
    };

    let resampled = resample_linear(&samples, channels, spec.sample_rate, audio.sample_rate);

    ensure_parent(output)?;
    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: audio.bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output, out_spec).map_err(|e| AppError::audio(output, e))?;
    let peak = ((1i64 << (audio.bits_per_sample - 1)) - 1) as f32;
    for sample in resampled {
        let amplitude = (sample.clamp(-1.0, 1.0) * peak).round() as i32;
        writer
            .write_sample(amplitude)
            .map_err(|e| AppError::audio(output, e))?;
    }
    writer.finalize().map_err(|e| AppError::audio(output, e))?;

    tracing::debug!(
        "转码 {} ({}Hz/{}bit) -> {} ({}Hz/{}bit)",
        input.display(),
        spec.sample_rate,
        spec.bits_per_sample,
        output.display(),
        audio.sample_rate,
        audio.bits_per_sample
    );
    Ok(())
}

/// 线性插值重采样, `samples` 为交错排列的多声道数据
fn resample_linear(samples: &[f32], channels: usize, from: u32, to: u32) -> Vec<f32> {
    if from == to || samples.is_empty() {
        return samples.to_vec();
    }

    let in_frames = samples.len() / channels;
    let out_frames = ((in_frames as u64 * to as u64 + from as u64 / 2) / from as u64) as usize;
    let step = from as f64 / to as f64;

    let mut out = Vec::with_capacity(out_frames * channels);
    for k in 0..out_frames {
        let pos = k as f64 * step;
        let i = (pos.floor() as usize).min(in_frames - 1);
        let next = (i + 1).min(in_frames - 1);
        let frac = (pos - i as f64) as f32;
        for c in 0..channels {
            let a = samples[i * channels + c];
            let b = samples[next * channels + c];
            out.push(a + (b - a) * frac);
        }
    }
    out
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))
        }
        _ => Ok(()),
    }
}

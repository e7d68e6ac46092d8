use crate::matching::MatchOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 默认配置文件 (可选)
pub const DEFAULT_CONFIG_FILE: &str = "wav-assign.toml";
/// 环境变量前缀, 例如 `WAV_ASSIGN__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "WAV_ASSIGN";

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub paths: PathsConfig,
    pub audio: AudioConfig,
    pub matching: MatchOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    /// 台词查询 SQL 模板, 含 `<conversation_name>` 与 `<uid_name>` 占位符
    pub query_path: PathBuf,
    /// 台词查询是一次性的短查询, 连接数保持很小
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// 超过该秒数的语句以 warn 级别记录
    pub slow_statement_secs: u64,
}

impl DatabaseConfig {
    /// 隐去密码的连接串, 用于日志
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let (authority, tail) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
        match authority.rsplit_once('@') {
            Some((user_info, host)) => match user_info.split_once(':') {
                Some((user, _)) => format!("{scheme}://{user}:***@{host}{tail}"),
                None => self.url.clone(),
            },
            None => self.url.clone(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("query_path", &self.query_path)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("slow_statement_secs", &self.slow_statement_secs)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/dragonage_content".to_string(),
            query_path: PathBuf::from("line_lookup.sql"),
            max_connections: 2,
            acquire_timeout_secs: 10,
            slow_statement_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 匹配结果文件名, 输出写到 output_dir, force 模式从 input_dir 读取
    pub assignment_file: String,
    /// input_dir 下的转写清单, 不存在时读取同名 .txt
    pub transcript_manifest: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            assignment_file: "assignments.csv".to_string(),
            transcript_manifest: "transcripts.csv".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn assignment_output(&self) -> PathBuf {
        self.output_dir.join(&self.assignment_file)
    }

    pub fn assignment_input(&self) -> PathBuf {
        self.input_dir.join(&self.assignment_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.input_dir.join(&self.transcript_manifest)
    }
}

/// 导出音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            bits_per_sample: 16,
        }
    }
}

impl AudioConfig {
    /// 导出仅支持 8/16/24/32 位整数 PCM
    pub const SUPPORTED_BITS: [u16; 4] = [8, 16, 24, 32];

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.sample_rate == 0 {
            return Err(config::ConfigError::Message(
                "audio.sample_rate must be greater than 0".to_string(),
            ));
        }
        if !Self::SUPPORTED_BITS.contains(&self.bits_per_sample) {
            return Err(config::ConfigError::Message(format!(
                "audio.bits_per_sample must be one of {:?}, got {}",
                Self::SUPPORTED_BITS,
                self.bits_per_sample
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// 默认值 → 可选配置文件 → `WAV_ASSIGN__*` 环境变量 → `DATABASE_URL`
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = config::Config::builder().add_source(file_source).add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.audio.validate()?;
        Ok(config)
    }
}

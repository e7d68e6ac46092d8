use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;
use wav_assign::{api, AppConfig, AssignmentService, LineMatcher, Scorer};

#[derive(Debug, Parser)]
#[command(
    name = "wav-assign",
    version,
    about = "Assign recorded wav takes to conversation lines by transcript similarity"
)]
struct Cli {
    /// 配置文件 (默认读取 ./wav-assign.toml, 不存在则忽略)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 转写匹配并导出音频与 assignments.csv
    Infer(InferArgs),
    /// 按 input_dir 下的 assignments.csv 重新导出
    Force,
    /// 启动 HTTP 匹配服务
    Serve,
}

#[derive(Debug, Args)]
struct InferArgs {
    /// 模块 UID
    #[arg(short, long, required_unless_present = "reference_csv")]
    module: Option<String>,

    /// 会话 DLG 文件名
    #[arg(short, long, required_unless_present = "reference_csv")]
    conversation: Option<String>,

    /// 从 CSV 读取台词, 不查询数据库
    #[arg(long, conflicts_with_all = ["module", "conversation"])]
    reference_csv: Option<PathBuf>,

    #[arg(long, value_enum)]
    scorer: Option<ScorerArg>,

    /// 代价矩阵按行并行计算
    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ScorerArg {
    Ratio,
    Levenshtein,
}

impl From<ScorerArg> for Scorer {
    fn from(arg: ScorerArg) -> Self {
        match arg {
            ScorerArg::Ratio => Scorer::Ratio,
            ScorerArg::Levenshtein => Scorer::Levenshtein,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    // 加载配置, 命令行参数优先
    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = cli.input_dir {
        config.paths.input_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.paths.output_dir = dir;
    }

    match cli.command {
        Command::Infer(args) => {
            if let Some(scorer) = args.scorer {
                config.matching.scorer = scorer.into();
            }
            config.matching.parallel |= args.parallel;
            // 数据库连接串可能带密码, 不写日志
            info!(
                "Running inference: paths={:?}, matching={:?}",
                config.paths, config.matching
            );

            let service = AssignmentService::new(config);
            let stats = match (&args.reference_csv, &args.module, &args.conversation) {
                (Some(path), _, _) => service.infer_from_csv(path)?,
                (None, Some(module), Some(conversation)) => {
                    service.infer_from_database(conversation, module).await?
                }
                _ => anyhow::bail!(
                    "either --reference-csv or both --module and --conversation are required"
                ),
            };
            info!(
                "Assignments complete! {} lines, mean similarity {:.2}",
                stats.lines, stats.mean_similarity
            );
        }
        Command::Force => {
            let service = AssignmentService::new(config);
            let count = service.force()?;
            info!("Assignments complete! {} forced", count);
        }
        Command::Serve => {
            let matcher = Arc::new(LineMatcher::new(config.matching));
            let app = api::router(matcher);

            let addr = format!("{}:{}", config.server.host, config.server.port);
            info!("Server listening on {}", addr);
            info!("API Endpoints:");
            info!("  GET  /health");
            info!("  POST /api/match");

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

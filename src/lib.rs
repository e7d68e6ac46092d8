pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod matching;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::{AppError, MatchError};
pub use matching::{match_lines, LineMatcher, MatchOptions, Scorer};
pub use models::{CandidateText, MatchedPair, ReferenceLine};
pub use service::AssignmentService;

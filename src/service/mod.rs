pub mod export;
pub mod pipeline;
pub mod reference;
pub mod transcripts;

pub use pipeline::AssignmentService;
pub use transcripts::{ManifestTranscriber, SidecarTranscriber, Transcriber};

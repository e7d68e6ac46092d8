pub mod candidate;
pub mod reference;
pub mod result;

pub use candidate::CandidateText;
pub use reference::ReferenceLine;
pub use result::{AssignmentRecord, MatchStats, MatchedPair};

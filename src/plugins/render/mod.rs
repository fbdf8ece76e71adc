//! Response Renderer: decides how a message body is shown and renders it.

mod detect;
mod reveal;
mod terminal;
mod types;

pub use detect::{
    ClassificationView, ContentKind, ProbabilityRow, RenderedView, detect_kind, render,
    trim_trailing,
};
pub use reveal::{REVEAL_INTERVAL, reveal, reveal_chunks};
pub use terminal::to_terminal;
pub use types::{
    Assessment, AuditTrail, ClassificationResponse, Definition, DetailedAssessment,
    EnhancedStandard, Enhancement, FinalSummary, Keyed, PipelineStage,
    PipelineStages, StandardProbability, StandardSection, StandardsResponse,
};

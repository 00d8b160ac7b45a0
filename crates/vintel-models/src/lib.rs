//! Shared data models for the Video Intelligence CLI.
//!
//! This crate provides Serde-serializable types for:
//! - Annotation kind selection (label, shot change, explicit content)
//! - Wire-format request/response/operation payloads
//! - Flattened annotation records with typed offsets
//! - Per-kind operation progress and status

pub mod annotation;
pub mod kind;
pub mod offset;
pub mod progress;
pub mod wire;

// Re-export common types
pub use annotation::{
    Annotations, Entity, ExplicitFrame, FrameLabel, LabelAnnotation, LabelFrame, LabelSegment,
    Likelihood, Shot,
};
pub use kind::{AnnotationKind, AnnotationKindSet};
pub use offset::{format_offset, parse_offset, OffsetError};
pub use progress::{KindProgress, OperationStatus};

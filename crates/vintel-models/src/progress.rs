//! Operation status and per-kind progress tracking.
//!
//! The provider reports progress per requested feature, positionally in the
//! order the features were sent. [`OperationStatus`] keeps those entries
//! keyed by [`AnnotationKind`] and merges each poll into the previous state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotation::Annotations;
use crate::kind::{AnnotationKind, AnnotationKindSet};
use crate::offset::OffsetError;
use crate::wire;

/// Progress for a single annotation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindProgress {
    /// Whether this kind has finished (percent == 100)
    pub done: bool,
    /// Completion percentage (0-100)
    pub percent: i64,
    /// When the provider started this kind
    pub start_time: Option<DateTime<Utc>>,
    /// When the provider last updated this kind
    pub update_time: Option<DateTime<Utc>>,
}

impl KindProgress {
    fn from_wire(progress: &wire::VideoAnnotationProgress) -> Self {
        Self {
            done: progress.progress_percent == 100,
            percent: progress.progress_percent,
            start_time: parse_rfc3339(progress.start_time.as_deref()),
            update_time: parse_rfc3339(progress.update_time.as_deref()),
        }
    }
}

/// Tracked state for one long-running annotation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationStatus {
    /// Server-assigned operation name
    pub name: String,
    /// Input video URI this operation annotates
    pub uri: String,
    /// Kinds requested when the operation was submitted
    pub kinds: AnnotationKindSet,
    /// Whether the operation has completed
    pub done: bool,
    /// Per-kind progress, for kinds the provider has reported on
    pub progress: HashMap<AnnotationKind, KindProgress>,
    /// Decoded annotations, populated once the response arrives
    pub annotations: Annotations,
    /// When this status was last refreshed against the remote service,
    /// `None` until the first fetch
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl OperationStatus {
    /// Create the initial status for a freshly submitted operation.
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        kinds: AnnotationKindSet,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            kinds,
            done: false,
            progress: HashMap::with_capacity(kinds.len()),
            annotations: Annotations::default(),
            refreshed_at: None,
        }
    }

    /// Overall completion as the mean of reported per-kind percents.
    ///
    /// Returns 0.0 before the provider has reported any progress.
    pub fn percent_complete(&self) -> f64 {
        if self.progress.is_empty() {
            return 0.0;
        }
        let total: i64 = self.progress.values().map(|p| p.percent).sum();
        total as f64 / self.progress.len() as f64
    }

    /// Whether this snapshot was refreshed within `expiry`.
    ///
    /// A status that has never been fetched is always stale, so the first
    /// cached access after submission goes to the remote service.
    pub fn is_fresh(&self, expiry: std::time::Duration) -> bool {
        match self.refreshed_at {
            None => false,
            Some(at) => {
                let age = Utc::now() - at;
                age.to_std().map(|age| age < expiry).unwrap_or(true)
            }
        }
    }

    /// Merge a metadata payload into the per-kind progress map.
    ///
    /// Entries are matched to requested kinds positionally, in canonical
    /// request order. Kinds without an entry keep their previous progress.
    pub fn apply_progress(&mut self, metadata: &wire::AnnotateVideoProgress) {
        for (kind, entry) in self.kinds.iter().zip(&metadata.annotation_progress) {
            self.progress.insert(kind, KindProgress::from_wire(entry));
        }
    }

    /// Decode a response payload into flattened annotations.
    pub fn apply_response(
        &mut self,
        response: &wire::AnnotateVideoResponse,
    ) -> Result<(), OffsetError> {
        self.annotations = Annotations::from_response(response)?;
        Ok(())
    }

    /// Record a completed refresh against the remote service.
    pub fn mark_refreshed(&mut self, done: bool) {
        self.done = done;
        self.refreshed_at = Some(Utc::now());
    }
}

fn parse_rfc3339(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested_kinds() -> AnnotationKindSet {
        AnnotationKindSet::empty()
            .with(AnnotationKind::Label)
            .with(AnnotationKind::ExplicitContent)
    }

    fn metadata(percents: &[i64]) -> wire::AnnotateVideoProgress {
        wire::AnnotateVideoProgress {
            annotation_progress: percents
                .iter()
                .map(|p| wire::VideoAnnotationProgress {
                    progress_percent: *p,
                    start_time: Some("2024-01-01T00:00:00Z".to_string()),
                    update_time: Some("2024-01-01T00:00:10Z".to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_new_status() {
        let status = OperationStatus::new("op-1", "gs://bucket/v.mp4", requested_kinds());
        assert!(!status.done);
        assert!(status.progress.is_empty());
        assert_eq!(status.percent_complete(), 0.0);
        assert!(status.annotations.is_empty());
    }

    #[test]
    fn test_apply_progress_positional() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.apply_progress(&metadata(&[40, 80]));

        // Canonical order: Label first, ExplicitContent second
        assert_eq!(status.progress[&AnnotationKind::Label].percent, 40);
        assert_eq!(status.progress[&AnnotationKind::ExplicitContent].percent, 80);
        assert!(!status.progress.contains_key(&AnnotationKind::ShotChange));
    }

    #[test]
    fn test_apply_progress_partial_report_keeps_previous() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.apply_progress(&metadata(&[40, 80]));
        // Next poll reports only the first kind
        status.apply_progress(&metadata(&[60]));

        assert_eq!(status.progress[&AnnotationKind::Label].percent, 60);
        assert_eq!(status.progress[&AnnotationKind::ExplicitContent].percent, 80);
    }

    #[test]
    fn test_progress_done_at_100() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.apply_progress(&metadata(&[100, 99]));
        assert!(status.progress[&AnnotationKind::Label].done);
        assert!(!status.progress[&AnnotationKind::ExplicitContent].done);
    }

    #[test]
    fn test_percent_complete_mean() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.apply_progress(&metadata(&[40, 80]));
        assert!((status.percent_complete() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_timestamps_parse() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.apply_progress(&metadata(&[10]));
        let progress = &status.progress[&AnnotationKind::Label];
        assert!(progress.start_time.is_some());
        assert!(progress.update_time.is_some());
    }

    #[test]
    fn test_malformed_timestamp_decodes_as_none() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.apply_progress(&wire::AnnotateVideoProgress {
            annotation_progress: vec![wire::VideoAnnotationProgress {
                progress_percent: 5,
                start_time: Some("yesterday".to_string()),
                update_time: None,
            }],
        });
        let progress = &status.progress[&AnnotationKind::Label];
        assert_eq!(progress.percent, 5);
        assert!(progress.start_time.is_none());
    }

    #[test]
    fn test_never_fetched_status_is_stale() {
        let status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        assert!(status.refreshed_at.is_none());
        assert!(!status.is_fresh(std::time::Duration::from_secs(60)));
    }

    #[test]
    fn test_freshness() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.mark_refreshed(false);
        assert!(status.is_fresh(std::time::Duration::from_secs(60)));

        status.refreshed_at = Some(Utc::now() - chrono::Duration::seconds(120));
        assert!(!status.is_fresh(std::time::Duration::from_secs(60)));
    }

    #[test]
    fn test_mark_refreshed() {
        let mut status = OperationStatus::new("op-1", "gs://v", requested_kinds());
        status.refreshed_at = Some(Utc::now() - chrono::Duration::seconds(120));
        status.mark_refreshed(true);
        assert!(status.done);
        assert!(status.is_fresh(std::time::Duration::from_secs(60)));
    }
}

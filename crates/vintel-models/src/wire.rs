//! Wire-format types for the Video Intelligence REST API (v1).
//!
//! Field names follow the API's camelCase JSON. Collections default to empty
//! when omitted; offsets stay as strings here and are parsed when flattening
//! into [`crate::annotation`] records.

use serde::{Deserialize, Serialize};

/// Body for `POST /v1/videos:annotate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoRequest {
    /// Input video location, e.g. `gs://bucket/video.mp4`
    pub input_uri: String,
    /// Requested detector feature names
    pub features: Vec<String>,
}

/// A long-running operation resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Server-assigned operation name
    pub name: String,
    /// Whether the operation has completed
    #[serde(default)]
    pub done: bool,
    /// Service-specific progress metadata (decoded lazily)
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Final annotation payload, present once done
    #[serde(default)]
    pub response: Option<serde_json::Value>,
    /// Failure status, present when the operation failed
    #[serde(default)]
    pub error: Option<RpcStatus>,
}

/// `google.rpc.Status` as returned in a failed operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Operation metadata: per-feature annotation progress.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoProgress {
    #[serde(default)]
    pub annotation_progress: Vec<VideoAnnotationProgress>,
}

/// Progress for a single requested feature.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnnotationProgress {
    #[serde(default)]
    pub progress_percent: i64,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// Operation response: annotation results per input video.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoResponse {
    #[serde(default)]
    pub annotation_results: Vec<VideoAnnotationResults>,
}

/// Annotation results for one input video.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnnotationResults {
    #[serde(default)]
    pub shot_annotations: Vec<VideoSegment>,
    #[serde(default)]
    pub shot_label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    pub segment_label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    pub frame_label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    pub explicit_annotation: Option<ExplicitContentAnnotation>,
}

/// A time segment of the video.
///
/// Proto3 omits zero offsets, hence the options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSegment {
    #[serde(default)]
    pub start_time_offset: Option<String>,
    #[serde(default)]
    pub end_time_offset: Option<String>,
}

/// A detected label with its entity and where it applies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAnnotation {
    #[serde(default)]
    pub entity: Option<Entity>,
    #[serde(default)]
    pub category_entities: Vec<Entity>,
    #[serde(default)]
    pub segments: Vec<LabelSegment>,
    #[serde(default)]
    pub frames: Vec<LabelFrame>,
}

/// Knowledge Graph entity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language_code: String,
}

/// A label applied over a video segment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSegment {
    #[serde(default)]
    pub segment: Option<VideoSegment>,
    #[serde(default)]
    pub confidence: f64,
}

/// A label applied at a single frame.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelFrame {
    #[serde(default)]
    pub time_offset: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

/// Explicit content results for the whole video.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitContentAnnotation {
    #[serde(default)]
    pub frames: Vec<ExplicitContentFrame>,
}

/// Explicit content likelihood at a single frame.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitContentFrame {
    #[serde(default)]
    pub time_offset: Option<String>,
    #[serde(default)]
    pub pornography_likelihood: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_request_serializes_camel_case() {
        let request = AnnotateVideoRequest {
            input_uri: "gs://bucket/video.mp4".to_string(),
            features: vec!["LABEL_DETECTION".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputUri"], "gs://bucket/video.mp4");
        assert_eq!(json["features"][0], "LABEL_DETECTION");
    }

    #[test]
    fn test_operation_minimal() {
        let op: Operation =
            serde_json::from_str(r#"{"name":"projects/p/operations/1"}"#).unwrap();
        assert_eq!(op.name, "projects/p/operations/1");
        assert!(!op.done);
        assert!(op.metadata.is_none());
        assert!(op.response.is_none());
        assert!(op.error.is_none());
    }

    #[test]
    fn test_operation_with_error() {
        let op: Operation = serde_json::from_str(
            r#"{"name":"op","done":true,"error":{"code":3,"message":"bad uri"}}"#,
        )
        .unwrap();
        let error = op.error.unwrap();
        assert_eq!(error.code, 3);
        assert_eq!(error.message, "bad uri");
    }

    #[test]
    fn test_progress_metadata_decodes() {
        let metadata = serde_json::json!({
            "@type": "type.googleapis.com/google.cloud.videointelligence.v1.AnnotateVideoProgress",
            "annotationProgress": [
                {"progressPercent": 37, "startTime": "2024-01-01T00:00:00Z", "updateTime": "2024-01-01T00:00:10Z"},
                {"progressPercent": 100}
            ]
        });
        let progress: AnnotateVideoProgress = serde_json::from_value(metadata).unwrap();
        assert_eq!(progress.annotation_progress.len(), 2);
        assert_eq!(progress.annotation_progress[0].progress_percent, 37);
        assert_eq!(progress.annotation_progress[1].progress_percent, 100);
        assert!(progress.annotation_progress[1].start_time.is_none());
    }

    #[test]
    fn test_response_missing_collections_default_empty() {
        let response: AnnotateVideoResponse = serde_json::from_str(
            r#"{"annotationResults":[{"shotAnnotations":[{"endTimeOffset":"4.1s"}]}]}"#,
        )
        .unwrap();
        let results = &response.annotation_results[0];
        assert_eq!(results.shot_annotations.len(), 1);
        assert!(results.shot_annotations[0].start_time_offset.is_none());
        assert!(results.segment_label_annotations.is_empty());
        assert!(results.explicit_annotation.is_none());
    }

    #[test]
    fn test_label_annotation_decodes() {
        let label: LabelAnnotation = serde_json::from_str(
            r#"{
                "entity": {"entityId": "/m/01yrx", "description": "cat", "languageCode": "en-US"},
                "categoryEntities": [{"entityId": "/m/068hy", "description": "pet"}],
                "segments": [{"segment": {"startTimeOffset": "0s", "endTimeOffset": "14.8s"}, "confidence": 0.98}]
            }"#,
        )
        .unwrap();
        assert_eq!(label.entity.unwrap().description, "cat");
        assert_eq!(label.category_entities[0].language_code, "");
        assert!((label.segments[0].confidence - 0.98).abs() < 1e-9);
    }
}

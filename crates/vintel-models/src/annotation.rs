//! Flattened annotation records.
//!
//! These are the typed results handed to callers once an operation
//! completes: offsets parsed into [`Duration`], likelihood strings parsed
//! into an enum, and the per-video wire payload flattened into flat
//! collections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::offset::{parse_optional_offset, OffsetError};
use crate::wire;

/// Likelihood of explicit content at a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    #[default]
    Unspecified,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Likelihood {
    /// Parse the provider's likelihood string.
    ///
    /// Unknown values map to [`Likelihood::Unspecified`] rather than failing
    /// the decode.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "VERY_UNLIKELY" => Likelihood::VeryUnlikely,
            "UNLIKELY" => Likelihood::Unlikely,
            "POSSIBLE" => Likelihood::Possible,
            "LIKELY" => Likelihood::Likely,
            "VERY_LIKELY" => Likelihood::VeryLikely,
            _ => Likelihood::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Likelihood::Unspecified => "unspecified",
            Likelihood::VeryUnlikely => "very_unlikely",
            Likelihood::Unlikely => "unlikely",
            Likelihood::Possible => "possible",
            Likelihood::Likely => "likely",
            Likelihood::VeryLikely => "very_likely",
        }
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Knowledge Graph entity attached to a label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub description: String,
    pub language_code: String,
}

impl From<&wire::Entity> for Entity {
    fn from(entity: &wire::Entity) -> Self {
        Self {
            id: entity.entity_id.clone(),
            description: entity.description.clone(),
            language_code: entity.language_code.clone(),
        }
    }
}

/// A detected shot boundary segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    pub start: Duration,
    pub end: Duration,
}

/// A label applied over a time segment, with confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSegment {
    pub start: Duration,
    pub end: Duration,
    pub confidence: f64,
}

/// A label with its entity, categories and segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAnnotation {
    pub entity: Entity,
    pub categories: Vec<Entity>,
    pub segments: Vec<LabelSegment>,
}

/// A label detection at a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelFrame {
    pub offset: Duration,
    pub confidence: f64,
}

/// A frame-level label with its entity and frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLabel {
    pub entity: Entity,
    pub frames: Vec<LabelFrame>,
}

/// Explicit content likelihood at a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitFrame {
    pub offset: Duration,
    pub likelihood: Likelihood,
}

/// All annotations decoded from a completed operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub shots: Vec<Shot>,
    pub shot_labels: Vec<LabelAnnotation>,
    pub segment_labels: Vec<LabelAnnotation>,
    pub frame_labels: Vec<FrameLabel>,
    pub explicit_frames: Vec<ExplicitFrame>,
}

impl Annotations {
    /// Flatten a wire response into typed records.
    ///
    /// The API returns one result entry per input video; annotate calls here
    /// carry a single URI, so entries are merged in order.
    pub fn from_response(response: &wire::AnnotateVideoResponse) -> Result<Self, OffsetError> {
        let mut annotations = Self::default();
        for results in &response.annotation_results {
            annotations.merge_results(results)?;
        }
        Ok(annotations)
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
            && self.shot_labels.is_empty()
            && self.segment_labels.is_empty()
            && self.frame_labels.is_empty()
            && self.explicit_frames.is_empty()
    }

    fn merge_results(&mut self, results: &wire::VideoAnnotationResults) -> Result<(), OffsetError> {
        for segment in &results.shot_annotations {
            self.shots.push(Shot {
                start: parse_optional_offset(segment.start_time_offset.as_deref())?,
                end: parse_optional_offset(segment.end_time_offset.as_deref())?,
            });
        }

        for label in &results.shot_label_annotations {
            self.shot_labels.push(label_from_wire(label)?);
        }
        for label in &results.segment_label_annotations {
            self.segment_labels.push(label_from_wire(label)?);
        }
        for label in &results.frame_label_annotations {
            self.frame_labels.push(frame_label_from_wire(label)?);
        }

        if let Some(explicit) = &results.explicit_annotation {
            for frame in &explicit.frames {
                self.explicit_frames.push(ExplicitFrame {
                    offset: parse_optional_offset(frame.time_offset.as_deref())?,
                    likelihood: Likelihood::from_wire(&frame.pornography_likelihood),
                });
            }
        }

        Ok(())
    }
}

fn label_from_wire(label: &wire::LabelAnnotation) -> Result<LabelAnnotation, OffsetError> {
    let mut segments = Vec::with_capacity(label.segments.len());
    for segment in &label.segments {
        let (start, end) = match &segment.segment {
            Some(s) => (
                parse_optional_offset(s.start_time_offset.as_deref())?,
                parse_optional_offset(s.end_time_offset.as_deref())?,
            ),
            None => (Duration::ZERO, Duration::ZERO),
        };
        segments.push(LabelSegment {
            start,
            end,
            confidence: segment.confidence,
        });
    }

    Ok(LabelAnnotation {
        entity: label.entity.as_ref().map(Entity::from).unwrap_or_default(),
        categories: label.category_entities.iter().map(Entity::from).collect(),
        segments,
    })
}

fn frame_label_from_wire(label: &wire::LabelAnnotation) -> Result<FrameLabel, OffsetError> {
    let mut frames = Vec::with_capacity(label.frames.len());
    for frame in &label.frames {
        frames.push(LabelFrame {
            offset: parse_optional_offset(frame.time_offset.as_deref())?,
            confidence: frame.confidence,
        });
    }

    Ok(FrameLabel {
        entity: label.entity.as_ref().map(Entity::from).unwrap_or_default(),
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> wire::AnnotateVideoResponse {
        serde_json::from_value(serde_json::json!({
            "annotationResults": [{
                "shotAnnotations": [
                    {"endTimeOffset": "4.2s"},
                    {"startTimeOffset": "4.2s", "endTimeOffset": "10s"}
                ],
                "segmentLabelAnnotations": [{
                    "entity": {"entityId": "/m/01yrx", "description": "cat", "languageCode": "en-US"},
                    "categoryEntities": [{"entityId": "/m/068hy", "description": "pet", "languageCode": "en-US"}],
                    "segments": [{"segment": {"startTimeOffset": "0s", "endTimeOffset": "10s"}, "confidence": 0.91}]
                }],
                "shotLabelAnnotations": [{
                    "entity": {"entityId": "/m/0jbk", "description": "animal", "languageCode": "en-US"},
                    "segments": [{"segment": {"endTimeOffset": "4.2s"}, "confidence": 0.8}]
                }],
                "frameLabelAnnotations": [{
                    "entity": {"entityId": "/m/01yrx", "description": "cat", "languageCode": "en-US"},
                    "frames": [{"timeOffset": "0.5s", "confidence": 0.77}]
                }],
                "explicitAnnotation": {
                    "frames": [
                        {"timeOffset": "1s", "pornographyLikelihood": "VERY_UNLIKELY"},
                        {"timeOffset": "2s", "pornographyLikelihood": "POSSIBLE"}
                    ]
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_likelihood_from_wire() {
        assert_eq!(Likelihood::from_wire("VERY_LIKELY"), Likelihood::VeryLikely);
        assert_eq!(Likelihood::from_wire("POSSIBLE"), Likelihood::Possible);
        assert_eq!(
            Likelihood::from_wire("LIKELIHOOD_UNSPECIFIED"),
            Likelihood::Unspecified
        );
        // Unknown strings never fail the decode
        assert_eq!(Likelihood::from_wire("???"), Likelihood::Unspecified);
    }

    #[test]
    fn test_flatten_shots() {
        let annotations = Annotations::from_response(&sample_response()).unwrap();
        assert_eq!(annotations.shots.len(), 2);
        assert_eq!(annotations.shots[0].start, Duration::ZERO);
        assert_eq!(annotations.shots[0].end, Duration::from_millis(4200));
        assert_eq!(annotations.shots[1].start, Duration::from_millis(4200));
    }

    #[test]
    fn test_flatten_labels() {
        let annotations = Annotations::from_response(&sample_response()).unwrap();

        let segment_label = &annotations.segment_labels[0];
        assert_eq!(segment_label.entity.description, "cat");
        assert_eq!(segment_label.categories[0].description, "pet");
        assert_eq!(segment_label.segments[0].end, Duration::from_secs(10));

        let shot_label = &annotations.shot_labels[0];
        assert_eq!(shot_label.entity.id, "/m/0jbk");
        assert!(shot_label.categories.is_empty());
        assert_eq!(shot_label.segments[0].start, Duration::ZERO);
    }

    #[test]
    fn test_flatten_frame_labels() {
        let annotations = Annotations::from_response(&sample_response()).unwrap();
        let frame_label = &annotations.frame_labels[0];
        assert_eq!(frame_label.entity.description, "cat");
        assert_eq!(frame_label.frames[0].offset, Duration::from_millis(500));
    }

    #[test]
    fn test_flatten_explicit_frames() {
        let annotations = Annotations::from_response(&sample_response()).unwrap();
        assert_eq!(annotations.explicit_frames.len(), 2);
        assert_eq!(annotations.explicit_frames[0].likelihood, Likelihood::VeryUnlikely);
        assert_eq!(annotations.explicit_frames[1].offset, Duration::from_secs(2));
    }

    #[test]
    fn test_empty_response() {
        let response = wire::AnnotateVideoResponse::default();
        let annotations = Annotations::from_response(&response).unwrap();
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_bad_offset_is_an_error() {
        let response: wire::AnnotateVideoResponse = serde_json::from_value(serde_json::json!({
            "annotationResults": [{
                "shotAnnotations": [{"startTimeOffset": "not-a-duration"}]
            }]
        }))
        .unwrap();
        assert!(Annotations::from_response(&response).is_err());
    }
}

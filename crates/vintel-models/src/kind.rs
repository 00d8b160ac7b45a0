//! Annotation kind selection.
//!
//! The annotate request carries a set of detector features. The set is
//! represented as a small bitmask with a canonical iteration order, because
//! the provider reports per-feature progress positionally in the order the
//! features were requested.

use serde::{Deserialize, Serialize};

/// A single annotation detector offered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// Label detection (segment, shot and frame level)
    Label,
    /// Shot boundary detection
    ShotChange,
    /// Explicit content detection
    ExplicitContent,
}

impl AnnotationKind {
    /// All kinds, in canonical request order.
    pub const ALL: [AnnotationKind; 3] = [
        AnnotationKind::Label,
        AnnotationKind::ShotChange,
        AnnotationKind::ExplicitContent,
    ];

    /// The feature name the REST API expects for this kind.
    pub fn feature_name(&self) -> &'static str {
        match self {
            AnnotationKind::Label => "LABEL_DETECTION",
            AnnotationKind::ShotChange => "SHOT_CHANGE_DETECTION",
            AnnotationKind::ExplicitContent => "EXPLICIT_CONTENT_DETECTION",
        }
    }

    /// Get string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Label => "label",
            AnnotationKind::ShotChange => "shot_change",
            AnnotationKind::ExplicitContent => "explicit_content",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            AnnotationKind::Label => 0b001,
            AnnotationKind::ShotChange => 0b010,
            AnnotationKind::ExplicitContent => 0b100,
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of annotation kinds.
///
/// Iteration always yields kinds in [`AnnotationKind::ALL`] order regardless
/// of insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationKindSet(u8);

impl AnnotationKindSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a kind to the set.
    pub fn insert(&mut self, kind: AnnotationKind) {
        self.0 |= kind.bit();
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, kind: AnnotationKind) -> Self {
        self.insert(kind);
        self
    }

    /// Check whether a kind is in the set.
    pub fn contains(&self, kind: AnnotationKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of kinds in the set.
    pub fn len(&self) -> usize {
        AnnotationKind::ALL
            .iter()
            .filter(|k| self.contains(**k))
            .count()
    }

    /// Iterate kinds in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = AnnotationKind> + '_ {
        AnnotationKind::ALL
            .into_iter()
            .filter(move |k| self.contains(*k))
    }

    /// Feature names for the annotate request, in canonical order.
    pub fn feature_names(&self) -> Vec<String> {
        self.iter().map(|k| k.feature_name().to_string()).collect()
    }
}

impl FromIterator<AnnotationKind> for AnnotationKindSet {
    fn from_iter<I: IntoIterator<Item = AnnotationKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl std::fmt::Display for AnnotationKindSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().map(|k| k.as_str()).collect();
        write!(f, "[{}]", names.join(","))
    }
}

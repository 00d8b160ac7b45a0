//! Tabular report rendering.
//!
//! Annotation records flatten into rows of a generic column-to-value table
//! which renders as an ASCII box table once all videos have completed.

use std::collections::HashMap;

use vintel_models::{format_offset, Annotations};

/// Cell value used when a row has no entry for a column.
const EMPTY_CELL: &str = "-";

/// A column-ordered key-to-string table.
pub struct Report {
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl Report {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Table with the standard annotation report columns.
    pub fn for_annotations() -> Self {
        Self::new([
            "type",
            "entity",
            "description",
            "start",
            "end",
            "confidence",
            "likelihood",
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Append a row; keys without a matching column are ignored at render.
    pub fn append<I, K, V>(&mut self, row: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.rows.push(
            row.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
    }

    /// Flatten one completed video's annotations into report rows.
    pub fn append_annotations(&mut self, annotations: &Annotations) {
        for shot in &annotations.shots {
            self.append([
                ("type", "shot".to_string()),
                ("start", format_offset(shot.start)),
                ("end", format_offset(shot.end)),
            ]);
        }

        for label in &annotations.shot_labels {
            self.append_label_rows("shot_label", label);
        }
        for label in &annotations.segment_labels {
            self.append_label_rows("segment_label", label);
        }

        for label in &annotations.frame_labels {
            for frame in &label.frames {
                self.append([
                    ("type", "frame_label".to_string()),
                    ("entity", label.entity.id.clone()),
                    ("description", label.entity.description.clone()),
                    ("start", format_offset(frame.offset)),
                    ("confidence", format!("{:.2}", frame.confidence)),
                ]);
            }
        }

        for frame in &annotations.explicit_frames {
            self.append([
                ("type", "explicit_content".to_string()),
                ("start", format_offset(frame.offset)),
                ("likelihood", frame.likelihood.to_string()),
            ]);
        }
    }

    fn append_label_rows(&mut self, row_type: &str, label: &vintel_models::LabelAnnotation) {
        if label.segments.is_empty() {
            self.append([
                ("type", row_type.to_string()),
                ("entity", label.entity.id.clone()),
                ("description", label.entity.description.clone()),
            ]);
            return;
        }
        for segment in &label.segments {
            self.append([
                ("type", row_type.to_string()),
                ("entity", label.entity.id.clone()),
                ("description", label.entity.description.clone()),
                ("start", format_offset(segment.start)),
                ("end", format_offset(segment.end)),
                ("confidence", format!("{:.2}", segment.confidence)),
            ]);
        }
    }

    /// Render the table as ASCII.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| {
                self.rows
                    .iter()
                    .map(|row| row.get(column).map_or(EMPTY_CELL.len(), String::len))
                    .chain(std::iter::once(column.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let separator = {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&"-".repeat(width + 2));
                line.push('+');
            }
            line.push('\n');
            line
        };

        let mut out = String::new();
        out.push_str(&separator);
        out.push_str(&self.render_row(&widths, |column| column.to_string()));
        out.push_str(&separator);
        for row in &self.rows {
            out.push_str(&self.render_row(&widths, |column| {
                row.get(column).cloned().unwrap_or_else(|| EMPTY_CELL.to_string())
            }));
        }
        out.push_str(&separator);
        out
    }

    fn render_row(&self, widths: &[usize], cell: impl Fn(&str) -> String) -> String {
        let mut line = String::from("|");
        for (column, width) in self.columns.iter().zip(widths) {
            line.push_str(&format!(" {:<width$} |", cell(column), width = width));
        }
        line.push('\n');
        line
    }
}

//! Inspect report types.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::ir::label::FileScale;

/// Read-only summary of the coordinate scale of every label file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct InspectReport {
    pub dataset_dir: PathBuf,
    pub counts: ScaleCounts,
    /// Files that are normalized or mixed, in walk order.
    pub flagged: Vec<FlaggedFile>,
}

impl InspectReport {
    /// True if at least one file still needs converting and none look converted.
    pub fn is_unconverted(&self) -> bool {
        self.counts.pixel > 0 && self.counts.normalized == 0 && self.counts.mixed == 0
    }

    /// True if every non-empty file already looks converted.
    pub fn is_converted(&self) -> bool {
        self.counts.normalized > 0 && self.counts.pixel == 0 && self.counts.mixed == 0
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(f, "Dataset: {}", self.dataset_dir.display())?;
        writeln!(
            f,
            "  {} label file(s): {} pixel-scale, {} normalized, {} mixed, {} empty",
            c.label_files, c.pixel, c.normalized, c.mixed, c.empty
        )?;
        writeln!(
            f,
            "  {} malformed line(s), {} class dir(s) without Label/",
            c.malformed_lines, c.class_dirs_without_labels
        )?;

        let state = if self.is_unconverted() {
            "not yet converted"
        } else if self.is_converted() {
            "already converted"
        } else if c.pixel + c.normalized + c.mixed == 0 {
            "no annotations"
        } else {
            "partially converted"
        };
        writeln!(f, "  state: {state}")?;

        if !self.flagged.is_empty() {
            writeln!(f)?;
            writeln!(f, "Flagged files ({}):", self.flagged.len())?;
            for file in &self.flagged {
                let scale = match file.scale {
                    FileScale::Normalized => "normalized",
                    FileScale::Mixed => "mixed",
                    FileScale::Pixel => "pixel",
                    FileScale::Empty => "empty",
                };
                writeln!(f, "  - [{scale}] {}", file.path.display())?;
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScaleCounts {
    pub label_files: usize,
    pub pixel: usize,
    pub normalized: usize,
    pub mixed: usize,
    pub empty: usize,
    pub malformed_lines: usize,
    pub class_dirs_without_labels: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlaggedFile {
    pub path: PathBuf,
    pub scale: FileScale,
}

//! Read-only dataset inspection.
//!
//! Classifies every label file as pixel-scale, normalized, mixed or empty
//! without touching anything, so a user can tell whether a tree has already
//! been converted before running the destructive pass.

mod report;

pub use report::{FlaggedFile, InspectReport, ScaleCounts};

use std::fs;

use log::debug;

use crate::error::Oid2YoloError;
use crate::ir::label::{parse_corner_line, FileScale};
use crate::ir::{ClassDir, DatasetLayout};

/// Inspect every label file under `layout`.
pub fn inspect_dataset(layout: &DatasetLayout) -> Result<InspectReport, Oid2YoloError> {
    let mut report = InspectReport {
        dataset_dir: layout.dataset_dir.clone(),
        ..Default::default()
    };

    for split in layout.splits()? {
        for class_dir in split.class_dirs()? {
            let Some(label_dir) = class_dir.label_dir() else {
                report.counts.class_dirs_without_labels += 1;
                continue;
            };

            for label_path in ClassDir::label_files(&label_dir)? {
                let content =
                    fs::read_to_string(&label_path).map_err(|source| Oid2YoloError::LabelRead {
                        path: label_path.clone(),
                        source,
                    })?;

                let (scale, malformed) = classify_content(&content);
                debug!("{}: {:?}", label_path.display(), scale);

                report.counts.label_files += 1;
                report.counts.malformed_lines += malformed;
                match scale {
                    FileScale::Empty => report.counts.empty += 1,
                    FileScale::Pixel => report.counts.pixel += 1,
                    FileScale::Normalized => report.counts.normalized += 1,
                    FileScale::Mixed => report.counts.mixed += 1,
                }

                if matches!(scale, FileScale::Normalized | FileScale::Mixed) {
                    report.flagged.push(FlaggedFile {
                        path: label_path,
                        scale,
                    });
                }
            }
        }
    }

    Ok(report)
}

/// Classify label file content; also returns the number of malformed lines.
fn classify_content(content: &str) -> (FileScale, usize) {
    let mut lines = Vec::new();
    let mut malformed = 0;

    for line in content.lines() {
        match parse_corner_line(line) {
            Ok(Some(parsed)) => lines.push(parsed),
            Ok(None) => {}
            Err(_) => malformed += 1,
        }
    }

    (FileScale::classify(&lines), malformed)
}

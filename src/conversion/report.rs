//! Conversion report types.
//!
//! Every recoverable fault the batch pass tolerates (missing images,
//! malformed lines, already-converted files) is counted here, so a run ends
//! with a summary instead of a scroll of warnings.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Summary of one conversion pass over a dataset.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// The directory holding the split directories.
    pub dataset_dir: PathBuf,
    /// True if nothing was written.
    pub dry_run: bool,
    /// Where class ids came from (`builtin`, `classes_txt`, `yaml`).
    pub class_map: String,
    pub counts: ConversionCounts,
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(dataset_dir: &Path, dry_run: bool, class_map: impl Into<String>) -> Self {
        Self {
            dataset_dir: dataset_dir.to_path_buf(),
            dry_run,
            class_map: class_map.into(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Lines that were present in the input but not written back.
    pub fn dropped_lines(&self) -> usize {
        self.counts.lines_dropped_malformed + self.counts.lines_dropped_missing_image
    }

    /// Returns true if any annotation was lost or any file left unconverted.
    pub fn has_losses(&self) -> bool {
        self.dropped_lines() > 0 || self.counts.files_skipped_normalized > 0
    }

    pub fn issues_with_code(
        &self,
        code: ConversionIssueCode,
    ) -> impl Iterator<Item = &ConversionIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        let verb = if self.dry_run { "would convert" } else { "converted" };

        writeln!(f, "Dataset: {}", self.dataset_dir.display())?;
        writeln!(
            f,
            "  {} split(s), {} class dir(s) ({} without {}/), class map: {}",
            c.splits,
            c.class_dirs,
            c.class_dirs_without_labels,
            crate::ir::layout::LABEL_DIR_NAME,
            self.class_map
        )?;
        writeln!(
            f,
            "  {} label file(s): {} {}, {} skipped as already normalized",
            c.label_files, verb, c.files_converted, c.files_skipped_normalized
        )?;
        writeln!(
            f,
            "  {} line(s) {}, {} dropped as malformed, {} dropped for missing/unreadable image",
            c.lines_converted, verb, c.lines_dropped_malformed, c.lines_dropped_missing_image
        )?;

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue)?;
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub splits: usize,
    pub class_dirs: usize,
    pub class_dirs_without_labels: usize,
    pub label_files: usize,
    pub files_converted: usize,
    pub files_skipped_normalized: usize,
    pub lines_converted: usize,
    pub lines_dropped_malformed: usize,
    pub lines_dropped_missing_image: usize,
}

/// A single issue found while converting.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
    pub path: PathBuf,
    /// 1-based line number for line-level issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ConversionIssue {
    pub fn warning(code: ConversionIssueCode, path: &Path, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
            path: path.to_path_buf(),
            line: None,
        }
    }

    pub fn info(code: ConversionIssueCode, path: &Path, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
            path: path.to_path_buf(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.path.display(), line, self.message),
            None => write!(f, "{}: {}", self.path.display(), self.message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// Annotations were dropped or a file was left unconverted.
    Warning,
    /// Policy note; nothing was lost.
    Info,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// No image with the label's stem was found; its lines were dropped.
    MissingImage,
    /// The paired image's dimensions could not be read; its lines were dropped.
    UnreadableImage,
    /// A line had too few tokens or non-numeric coordinates.
    MalformedLine,
    /// Every line already looks normalized; the file was left untouched.
    AlreadyNormalized,
    /// The file mixes pixel and normalized lines; converted anyway.
    MixedScale,
    /// A class directory has no `Label` directory.
    MissingLabelDir,
    /// A class directory name is not in the class map; id 0 was used.
    UnknownClass,
    /// A backup already existed and was kept rather than overwritten.
    BackupKept,
}

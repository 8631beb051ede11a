//! Batch conversion of Open Images label files to YOLO format.
//!
//! Walks every split and class directory, rewrites each label file under
//! `Label/` in place, and returns a [`ConversionReport`] describing what was
//! converted, skipped and dropped.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::error::Oid2YoloError;
use crate::ir::label::{
    format_center_line, join_lines, parse_corner_line, CornerLine, FileScale, LineError,
};
use crate::ir::{
    probe_paired_image, ClassDir, ClassMap, ClassMapSource, DatasetLayout, PairedImage,
    DEFAULT_CLASS_ID,
};

/// Options for a conversion pass.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Read and convert everything but write nothing.
    pub dry_run: bool,
    /// Copy each label file to `<name>.txt.bak` before overwriting it.
    pub backup: bool,
    /// Convert files even if they already look normalized.
    pub force: bool,
    /// Draw a progress bar per class directory.
    pub show_progress: bool,
}

/// Convert every label file under `layout`.
pub fn convert_dataset(
    layout: &DatasetLayout,
    class_map: &ClassMap,
    opts: &ConvertOptions,
) -> Result<ConversionReport, Oid2YoloError> {
    let mut report = ConversionReport::new(
        &layout.dataset_dir,
        opts.dry_run,
        class_map_source_name(class_map.source()),
    );

    for split in layout.splits()? {
        info!("Currently in split: {}", split.name);
        report.counts.splits += 1;

        for class_dir in split.class_dirs()? {
            report.counts.class_dirs += 1;
            convert_class_dir(&class_dir, class_map, opts, &mut report)?;
        }
    }

    if opts.dry_run {
        info!("Dry run complete; no label files were modified.");
    } else {
        info!("Annotation conversion completed.");
    }

    Ok(report)
}

fn convert_class_dir(
    class_dir: &ClassDir,
    class_map: &ClassMap,
    opts: &ConvertOptions,
    report: &mut ConversionReport,
) -> Result<(), Oid2YoloError> {
    let Some(label_dir) = class_dir.label_dir() else {
        debug!("No Label/ directory in {}; skipping", class_dir.path.display());
        report.counts.class_dirs_without_labels += 1;
        report.add(ConversionIssue::info(
            ConversionIssueCode::MissingLabelDir,
            &class_dir.path,
            "class directory has no Label/ directory; skipped",
        ));
        return Ok(());
    };

    let class_id = match class_map.get(&class_dir.name) {
        Some(id) => id,
        None => {
            report.add(ConversionIssue::info(
                ConversionIssueCode::UnknownClass,
                &class_dir.path,
                format!(
                    "class '{}' is not in the class map; using id {}",
                    class_dir.name, DEFAULT_CLASS_ID
                ),
            ));
            DEFAULT_CLASS_ID
        }
    };

    info!(
        "Converting annotations for class: {} (id {})",
        class_dir.name, class_id
    );

    let label_files = ClassDir::label_files(&label_dir)?;
    let pb = create_progress_bar(label_files.len() as u64, &class_dir.name, opts.show_progress);

    for label_path in &label_files {
        pb.suspend(|| convert_label_file(label_path, &class_dir.path, class_id, opts, report))?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(())
}

/// Convert a single label file.
///
/// The paired image is looked up in `image_dir` by the label file's stem.
/// Lines are dropped, never passed through, when the image is missing or
/// unreadable.
pub fn convert_label_file(
    label_path: &Path,
    image_dir: &Path,
    class_id: u32,
    opts: &ConvertOptions,
    report: &mut ConversionReport,
) -> Result<(), Oid2YoloError> {
    report.counts.label_files += 1;

    let content = fs::read_to_string(label_path).map_err(|source| Oid2YoloError::LabelRead {
        path: label_path.to_path_buf(),
        source,
    })?;
    let (boxes, malformed) = parse_label_content(&content);

    for (line_num, err) in &malformed {
        warn!(
            "Invalid annotation in {}:{}: {}",
            label_path.display(),
            line_num,
            err
        );
        report.add(
            ConversionIssue::warning(ConversionIssueCode::MalformedLine, label_path, err.to_string())
                .at_line(*line_num),
        );
    }

    let scale = FileScale::classify(&boxes);
    if scale == FileScale::Normalized && !opts.force {
        warn!(
            "{} already looks normalized; skipping (use --force to convert anyway)",
            label_path.display()
        );
        report.counts.files_skipped_normalized += 1;
        report.add(ConversionIssue::warning(
            ConversionIssueCode::AlreadyNormalized,
            label_path,
            "every line already looks normalized; file left untouched",
        ));
        return Ok(());
    }
    if scale == FileScale::Mixed {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::MixedScale,
            label_path,
            "file mixes pixel-scale and normalized-looking lines",
        ));
    }

    report.counts.lines_dropped_malformed += malformed.len();

    let converted = if boxes.is_empty() {
        Vec::new()
    } else {
        convert_boxes(label_path, image_dir, class_id, &boxes, report)
    };

    write_label_file(label_path, &join_lines(&converted), opts, report)?;
    report.counts.files_converted += 1;
    Ok(())
}

fn parse_label_content(content: &str) -> (Vec<CornerLine>, Vec<(usize, LineError)>) {
    let mut boxes = Vec::new();
    let mut malformed = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        match parse_corner_line(line) {
            Ok(Some(parsed)) => boxes.push(parsed),
            Ok(None) => {}
            Err(err) => malformed.push((line_idx + 1, err)),
        }
    }

    (boxes, malformed)
}

fn convert_boxes(
    label_path: &Path,
    image_dir: &Path,
    class_id: u32,
    boxes: &[CornerLine],
    report: &mut ConversionReport,
) -> Vec<String> {
    let stem = label_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match probe_paired_image(image_dir, &stem) {
        PairedImage::Found { size } => {
            report.counts.lines_converted += boxes.len();
            boxes
                .iter()
                .map(|line| format_center_line(class_id, &line.bbox.to_normalized_center(size)))
                .collect()
        }
        PairedImage::Missing { expected } => {
            warn!("File not found -> {}", expected.display());
            report.counts.lines_dropped_missing_image += boxes.len();
            report.add(ConversionIssue::warning(
                ConversionIssueCode::MissingImage,
                label_path,
                format!(
                    "image {} not found; {} line(s) dropped",
                    expected.display(),
                    boxes.len()
                ),
            ));
            Vec::new()
        }
        PairedImage::Unreadable { path, reason } => {
            warn!("Failed to load -> {}: {}", path.display(), reason);
            report.counts.lines_dropped_missing_image += boxes.len();
            report.add(ConversionIssue::warning(
                ConversionIssueCode::UnreadableImage,
                label_path,
                format!(
                    "image {} unreadable ({}); {} line(s) dropped",
                    path.display(),
                    reason,
                    boxes.len()
                ),
            ));
            Vec::new()
        }
    }
}

/// Replace the contents of `path` with `content`.
///
/// Content is written to a `.tmp` file next to the real file, given the
/// original permissions, then renamed over it. A symlinked label file is
/// followed, so the link stays in place and its target is rewritten. The
/// `.tmp` file is removed if any step fails.
fn write_label_file(
    path: &Path,
    content: &str,
    opts: &ConvertOptions,
    report: &mut ConversionReport,
) -> Result<(), Oid2YoloError> {
    if opts.dry_run {
        debug!("Dry run: would rewrite {}", path.display());
        return Ok(());
    }

    let write_err = |source: std::io::Error| Oid2YoloError::LabelWrite {
        path: path.to_path_buf(),
        source,
    };

    if opts.backup {
        let backup = sibling_path(path, "bak");
        if backup.exists() {
            report.add(ConversionIssue::info(
                ConversionIssueCode::BackupKept,
                &backup,
                "backup already exists; kept the earlier copy",
            ));
        } else {
            fs::copy(path, &backup).map_err(write_err)?;
        }
    }

    let target = fs::canonicalize(path).map_err(write_err)?;
    let permissions = fs::metadata(&target).map_err(write_err)?.permissions();
    let tmp = sibling_path(&target, "tmp");

    let replaced = fs::write(&tmp, content)
        .and_then(|()| fs::set_permissions(&tmp, permissions))
        .and_then(|()| fs::rename(&tmp, &target));
    if let Err(source) = replaced {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            debug!("Could not remove {}: {}", tmp.display(), cleanup);
        }
        return Err(write_err(source));
    }
    Ok(())
}

/// `a.txt` -> `a.txt.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn class_map_source_name(source: &ClassMapSource) -> &'static str {
    match source {
        ClassMapSource::Builtin => "builtin",
        ClassMapSource::ClassesTxt => "classes_txt",
        ClassMapSource::Yaml => "yaml",
    }
}

/// Create a progress bar with the given length and label.
fn create_progress_bar(len: u64, label: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

//! Open Images dataset layout discovery.
//!
//! ```text
//! <root>/OID/Dataset/<split>/<class>/<image>.jpg
//! <root>/OID/Dataset/<split>/<class>/Label/<image>.txt
//! ```
//!
//! Splits and classes are discovered from the directory tree; nothing is
//! hardcoded beyond the `OID/Dataset` prefix and the `Label` directory name.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Oid2YoloError;

pub const LABEL_DIR_NAME: &str = "Label";
const LABEL_EXTENSION: &str = "txt";

/// A discovered dataset directory (the one holding the split directories).
#[derive(Clone, Debug)]
pub struct DatasetLayout {
    pub dataset_dir: PathBuf,
}

/// A split such as `train`, `validation` or `test`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitDir {
    pub name: String,
    pub path: PathBuf,
}

/// One class directory inside a split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDir {
    pub name: String,
    pub path: PathBuf,
}

impl DatasetLayout {
    /// Locate the dataset directory.
    ///
    /// `input` may be a project root containing `OID/Dataset/`, or the
    /// `Dataset` directory itself.
    pub fn discover(input: &Path) -> Result<Self, Oid2YoloError> {
        if !input.is_dir() {
            return Err(Oid2YoloError::LayoutInvalid {
                path: input.to_path_buf(),
                message: "input must be a directory".to_string(),
            });
        }

        let nested = input.join("OID").join("Dataset");
        let dataset_dir = if nested.is_dir() {
            nested
        } else if is_dir_named(input, "Dataset") {
            input.to_path_buf()
        } else {
            return Err(Oid2YoloError::LayoutInvalid {
                path: input.to_path_buf(),
                message: "expected a directory containing OID/Dataset/ or the Dataset directory itself"
                    .to_string(),
            });
        };

        Ok(Self { dataset_dir })
    }

    /// Split directories in file-name order.
    pub fn splits(&self) -> Result<Vec<SplitDir>, Oid2YoloError> {
        Ok(child_dirs(&self.dataset_dir)?
            .into_iter()
            .map(|(name, path)| SplitDir { name, path })
            .collect())
    }
}

impl SplitDir {
    /// Class directories in file-name order.
    pub fn class_dirs(&self) -> Result<Vec<ClassDir>, Oid2YoloError> {
        Ok(child_dirs(&self.path)?
            .into_iter()
            .map(|(name, path)| ClassDir { name, path })
            .collect())
    }
}

impl ClassDir {
    /// The `Label` directory, if this class has one.
    pub fn label_dir(&self) -> Option<PathBuf> {
        let dir = self.path.join(LABEL_DIR_NAME);
        dir.is_dir().then_some(dir)
    }

    /// `.txt` files directly inside `label_dir`, in file-name order.
    pub fn label_files(label_dir: &Path) -> Result<Vec<PathBuf>, Oid2YoloError> {
        let mut files = Vec::new();
        for entry in walk_children(label_dir) {
            let entry = entry.map_err(|source| traversal_error(label_dir, source))?;
            if entry.file_type().is_file() && has_label_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn child_dirs(parent: &Path) -> Result<Vec<(String, PathBuf)>, Oid2YoloError> {
    let mut dirs = Vec::new();
    for entry in walk_children(parent) {
        let entry = entry.map_err(|source| traversal_error(parent, source))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        dirs.push((name, entry.into_path()));
    }
    Ok(dirs)
}

fn walk_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}

fn traversal_error(root: &Path, source: walkdir::Error) -> Oid2YoloError {
    Oid2YoloError::LayoutInvalid {
        path: root.to_path_buf(),
        message: format!("failed while traversing directory: {source}"),
    }
}

fn has_label_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(LABEL_EXTENSION))
        .unwrap_or(false)
}

fn is_dir_named(path: &Path, dir_name: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.eq_ignore_ascii_case(dir_name))
        .unwrap_or(false)
}

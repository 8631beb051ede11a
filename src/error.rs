use std::path::PathBuf;
use thiserror::Error;

/// The main error type for oid2yolo operations.
#[derive(Debug, Error)]
pub enum Oid2YoloError {
    #[error("Failed to read label file {path}: {source}")]
    LabelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write label file {path}: {source}")]
    LabelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset layout at {path}: {message}")]
    LayoutInvalid { path: PathBuf, message: String },

    #[error("Invalid class map {path}: {message}")]
    ClassMapInvalid { path: PathBuf, message: String },

    #[error("Failed to parse class map YAML from {path}: {source}")]
    ClassMapYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid image size {width}x{height}: both dimensions must be non-zero")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Strict mode: {dropped_lines} line(s) dropped and {skipped_files} file(s) skipped")]
    StrictFailed {
        dropped_lines: usize,
        skipped_files: usize,
    },
}

//! Label line codec.
//!
//! Input lines are Open Images corner boxes:
//! `<class> <x_min> <y_min> <x_max> <y_max> [...]` in pixels. Output lines
//! are YOLO center boxes: `<class_id> <cx> <cy> <w> <h>`, normalized.

use serde::Serialize;
use thiserror::Error;

use super::{BBoxCXCYWH, BBoxXYXY, Normalized, Pixel};

/// Decimal places written for each normalized value.
pub const OUTPUT_PRECISION: usize = 6;

const MIN_TOKENS: usize = 5;

/// Largest magnitude a converted value is expected to reach.
///
/// Conversion does not clamp, so boxes past the image edge or with reversed
/// corners produce values a little outside `[0, 1]`.
const NORMALIZED_MAGNITUDE_LIMIT: f64 = 2.0;

/// A parsed input line.
#[derive(Clone, Debug, PartialEq)]
pub struct CornerLine {
    /// Leading token. Ignored on output; the class id comes from the class map.
    pub class_token: String,
    pub bbox: BBoxXYXY<Pixel>,
}

impl CornerLine {
    /// Returns true if this line looks like it was already converted.
    ///
    /// A converted line has an integer class id and four small values, in
    /// `[0, 1]` for boxes inside the image and slightly outside it otherwise.
    /// Open Images lines carry a class name and pixel coordinates.
    pub fn looks_normalized(&self) -> bool {
        let b = &self.bbox;
        self.class_token.parse::<u32>().is_ok()
            && [b.xmin, b.ymin, b.xmax, b.ymax]
                .iter()
                .all(|v| v.abs() <= NORMALIZED_MAGNITUDE_LIMIT)
    }
}

/// Coordinate scale of a whole label file, judged from its parsed lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileScale {
    /// No parseable lines.
    Empty,
    /// Every line is an Open Images pixel box.
    Pixel,
    /// Every line already looks converted.
    Normalized,
    /// Some lines of each kind.
    Mixed,
}

impl FileScale {
    pub fn classify(lines: &[CornerLine]) -> Self {
        let normalized = lines.iter().filter(|l| l.looks_normalized()).count();
        match (lines.len(), normalized) {
            (0, _) => FileScale::Empty,
            (_, 0) => FileScale::Pixel,
            (total, n) if n == total => FileScale::Normalized,
            _ => FileScale::Mixed,
        }
    }
}

/// Why a line was rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LineError {
    #[error("expected at least 5 tokens, found {found}")]
    TooFewTokens { found: usize },

    #[error("invalid {field} '{raw}'; expected floating-point number")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("invalid {field} '{raw}'; expected a finite number")]
    NonFiniteNumber { field: &'static str, raw: String },
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines. Tokens past the fifth are ignored.
pub fn parse_corner_line(line: &str) -> Result<Option<CornerLine>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Only the first five tokens are used; don't collect the rest.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(MIN_TOKENS).collect();
    if tokens.len() < MIN_TOKENS {
        return Err(LineError::TooFewTokens {
            found: tokens.len(),
        });
    }

    let xmin = parse_f64_token(tokens[1], "x_min")?;
    let ymin = parse_f64_token(tokens[2], "y_min")?;
    let xmax = parse_f64_token(tokens[3], "x_max")?;
    let ymax = parse_f64_token(tokens[4], "y_max")?;

    Ok(Some(CornerLine {
        class_token: tokens[0].to_string(),
        bbox: BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax),
    }))
}

fn parse_f64_token(raw: &str, field: &'static str) -> Result<f64, LineError> {
    let value = raw.parse::<f64>().map_err(|_| LineError::InvalidNumber {
        field,
        raw: raw.to_string(),
    })?;

    // `parse` accepts "nan", "inf" and "infinity".
    if !value.is_finite() {
        return Err(LineError::NonFiniteNumber {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value)
}

/// Format one output line.
pub fn format_center_line(class_id: u32, bbox: &BBoxCXCYWH<Normalized>) -> String {
    let [cx, cy, w, h] = bbox.to_array();
    format!(
        "{class_id} {cx:.prec$} {cy:.prec$} {w:.prec$} {h:.prec$}",
        prec = OUTPUT_PRECISION
    )
}

/// Join output lines into file content, one per line with a trailing newline.
///
/// No lines still produce a single newline, matching what the converter has
/// always written for fully dropped files.
pub fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_corner_line(input: &str) {
    let _ = parse_corner_line(input);
}

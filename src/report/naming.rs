//! Output file names.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Timestamp embedded in every output name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<template-base>_SIAT_<timestamp>.xlsx`
pub fn template_output_name(template: &Path, stamp: NaiveDateTime) -> String {
    let base = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reporte".to_string());
    format!("{base}_SIAT_{}.xlsx", stamp.format(TIMESTAMP_FORMAT))
}

/// `<report-name>_<timestamp>.xlsx`
pub fn report_output_name(report: &str, stamp: NaiveDateTime) -> String {
    format!("{report}_{}.xlsx", stamp.format(TIMESTAMP_FORMAT))
}

/// `dir/file_name`, or `dir/<stem>_<n>.<ext>` with the smallest `n` that does not exist yet.
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (1..)
        .map(|n| dir.join(format!("{stem}_{n}{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Each record is shown by its index and the label the frame knows it by:
//! `date - name` for pinned images, the bare name otherwise. Paths and
//! transform state follow as indented context lines, so the listing reads as
//! an inventory of what will be exported.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Images (2)
//! 000 05.06.2024 - dawn.jpg *
//!     Source: /photos/dawn.jpg
//!     Fit: 800x600, offset (0.0, 60.0), rotation 0°, scale 1.00
//! 001 dusk.jpg
//!     Source: /photos/dusk.jpg
//!     Fit: 1067x800, offset (0.0, 293.5), rotation 90°, scale 1.00
//! ```
//!
//! ## Load
//!
//! ```text
//! Loaded 2 images from /photos
//!     Restored: dawn.jpg
//!     New: dusk.jpg
//!     Skipped: dawn.jpg (already loaded)
//! ```
//!
//! ## Export
//!
//! ```text
//! 000 04.06.2024 dusk.jpg → 000_04.06.2024_dusk.bmp
//! 001 05.06.2024 dawn.jpg → 001_05.06.2024_dawn.bmp
//!
//! Not reached: late.jpg
//! Exported 2 frames to /frame, finished 2024-06-03 21:14:05.123456
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::export::ExportReport;
use crate::record::ImageRecord;
use crate::store::LoadSummary;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format an index as 3-digit zero-padded, matching export numbering.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Label of a record: `date - name` when pinned, else the name.
pub fn record_label(record: &ImageRecord) -> String {
    match record.assigned_date() {
        Some(date) => format!("{} - {}", date, record.file_name()),
        None => record.file_name().to_string(),
    }
}

fn file_names(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| crate::record::file_name_of(p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// List
// ============================================================================

/// Format the record listing. The selected record is marked with `*`.
pub fn format_record_list(records: &[ImageRecord], selected: Option<usize>) -> Vec<String> {
    if records.is_empty() {
        return vec!["No images loaded".to_string()];
    }

    let mut lines = vec![format!("Images ({})", records.len())];
    for (i, record) in records.iter().enumerate() {
        let marker = if selected == Some(i) { " *" } else { "" };
        lines.push(format!(
            "{} {}{}",
            format_index(i),
            record_label(record),
            marker
        ));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            record.source_path().display()
        ));
        let (w, h) = record.frame_size();
        let (ox, oy) = record.offset();
        lines.push(format!(
            "{}Fit: {}x{}, offset ({:.1}, {:.1}), rotation {}°, scale {:.2}",
            indent(1),
            w,
            h,
            ox,
            oy,
            record.rotation(),
            record.scale()
        ));
    }
    lines
}

pub fn print_record_list(records: &[ImageRecord], selected: Option<usize>) {
    for line in format_record_list(records, selected) {
        println!("{}", line);
    }
}

// ============================================================================
// Load
// ============================================================================

pub fn format_load_summary(summary: &LoadSummary, folder: Option<&Path>) -> Vec<String> {
    let mut header = format!("Loaded {}", plural(summary.added(), "image"));
    if let Some(folder) = folder {
        header.push_str(&format!(" from {}", folder.display()));
    }
    let mut lines = vec![header];
    if !summary.restored.is_empty() {
        lines.push(format!(
            "{}Restored: {}",
            indent(1),
            file_names(&summary.restored)
        ));
    }
    if !summary.created.is_empty() {
        lines.push(format!("{}New: {}", indent(1), file_names(&summary.created)));
    }
    if !summary.skipped.is_empty() {
        lines.push(format!(
            "{}Skipped: {} (already loaded)",
            indent(1),
            file_names(&summary.skipped)
        ));
    }
    lines
}

pub fn print_load_summary(summary: &LoadSummary, folder: Option<&Path>) {
    for line in format_load_summary(summary, folder) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

pub fn format_export_report(report: &ExportReport, destination: &Path) -> Vec<String> {
    let mut lines: Vec<String> = report
        .files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let written = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!(
                "{} {} {} → {}",
                format_index(i),
                file.date,
                file.source,
                written
            )
        })
        .collect();

    lines.push(String::new());
    if !report.unreached.is_empty() {
        lines.push(format!("Not reached: {}", report.unreached.join(", ")));
    }
    lines.push(format!(
        "Exported {} to {}, finished {}",
        plural(report.files.len(), "frame"),
        destination.display(),
        report.finished_at
    ));
    lines
}

pub fn print_export_report(report: &ExportReport, destination: &Path) {
    for line in format_export_report(report, destination) {
        println!("{}", line);
    }
}

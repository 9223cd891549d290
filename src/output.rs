//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every album and folder leads with its positional index and display title;
//! the raw file name and the cached thumbnail follow as indented context
//! lines. The output reads as an inventory of the catalog while still letting
//! users trace every entry back to a file.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Albums
//! 001 A Comic (46.9 KB)
//!     Source: A_Comic.cbz
//!     Thumbnail: thumbnails/3fa1….png
//! 002 Series (1 entry)
//!     001 Vol 1 (12.0 KB)
//!         Source: Vol_1.cbz
//! ```
//!
//! ## Thumbnails
//!
//! ```text
//! Thumbnails → thumbnails/
//!     5 cached, 2 encoded, 1 failed (8 total)
//!     Failed: Series/Broken.cbz (Cannot read archive ...)
//! ```
//!
//! ## Documents
//!
//! ```text
//! JSON → index.json
//!     Series.json
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::cache::{Annotation, CacheStats};
use crate::types::Node;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte size with one decimal.
///
/// ```text
/// 512 B
/// 46.9 KB
/// 3.2 MB
/// ```
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn entry_count(n: usize) -> String {
    match n {
        1 => "1 entry".to_string(),
        n => format!("{n} entries"),
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format the catalog tree, one header line per node.
pub fn format_tree(nodes: &[Node]) -> Vec<String> {
    let mut lines = vec!["Albums".to_string()];
    if nodes.is_empty() {
        lines.push("    (no albums found)".to_string());
    }
    walk_tree(nodes, 0, &mut lines);
    lines
}

fn walk_tree(nodes: &[Node], depth: usize, lines: &mut Vec<String>) {
    let pad = indent(depth);
    for (i, node) in nodes.iter().enumerate() {
        match node {
            Node::Folder(f) => {
                lines.push(format!(
                    "{}{} {} ({})",
                    pad,
                    format_index(i + 1),
                    f.title,
                    entry_count(f.children.len())
                ));
                walk_tree(&f.children, depth + 1, lines);
            }
            Node::Album(a) => {
                lines.push(format!(
                    "{}{} {} ({})",
                    pad,
                    format_index(i + 1),
                    a.title,
                    format_size(a.size_bytes)
                ));
                lines.push(format!("{}    Source: {}", pad, a.filename));
                if let Some(cover) = &a.cover {
                    lines.push(format!("{}    Thumbnail: {}", pad, cover.thumbnail_path));
                }
            }
        }
    }
}

/// Print the catalog tree to stdout.
pub fn print_tree(nodes: &[Node]) {
    for line in format_tree(nodes) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumbnails
// ============================================================================

/// Format the annotation summary: counts, then one line per failed album.
pub fn format_annotation(annotation: &Annotation, cache_dir: &Path) -> Vec<String> {
    let mut lines = vec![
        format!("Thumbnails → {}/", cache_dir.display()),
        format!("    {}", format_stats(&annotation.stats)),
    ];
    for (path, error) in &annotation.failures {
        lines.push(format!("    Failed: {} ({})", path, error));
    }
    lines
}

fn format_stats(stats: &CacheStats) -> String {
    if stats.total() == 0 {
        "nothing to do".to_string()
    } else {
        stats.to_string()
    }
}

/// Print the annotation summary to stdout.
pub fn print_annotation(annotation: &Annotation, cache_dir: &Path) {
    for line in format_annotation(annotation, cache_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Format the documents one serializer wrote, root first.
pub fn format_documents(format: &str, written: &[PathBuf]) -> Vec<String> {
    let Some((root, children)) = written.split_first() else {
        return vec![format!("{format} → (nothing written)")];
    };
    let mut lines = vec![format!("{} → {}", format, root.display())];
    for child in children {
        let name = child
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| child.display().to_string());
        lines.push(format!("    {}", name));
    }
    lines
}

/// Print the documents one serializer wrote to stdout.
pub fn print_documents(format: &str, written: &[PathBuf]) {
    for line in format_documents(format, written) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

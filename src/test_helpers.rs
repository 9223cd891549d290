//! Shared test utilities for the comics-catalog test suite.
//!
//! Provides sandbox writers (plain files, synthetic images, cbz archives),
//! tree lookups that panic with a useful message on miss, and structural
//! assertions over the catalog tree.

use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::types::{Album, Folder, Node};

// =========================================================================
// Sandbox writers
// =========================================================================

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Write a cbz (zip) archive with the given `(entry name, bytes)` pairs.
pub fn write_cbz(path: &Path, entries: &[(&str, &[u8])]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// Encoded JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// Encoded RGBA PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, 200])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

// =========================================================================
// Tree lookups (panic with a clear message on miss)
// =========================================================================

/// Sibling titles in order.
pub fn titles(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(Node::title).collect()
}

/// Find a direct child album by title. Panics if not found.
pub fn find_album<'a>(nodes: &'a [Node], title: &str) -> &'a Album {
    nodes
        .iter()
        .find_map(|n| match n {
            Node::Album(a) if a.title == title => Some(a),
            _ => None,
        })
        .unwrap_or_else(|| panic!("album '{title}' not found. Available: {:?}", titles(nodes)))
}

/// Find a direct child folder by title. Panics if not found.
pub fn find_folder<'a>(nodes: &'a [Node], title: &str) -> &'a Folder {
    nodes
        .iter()
        .find_map(|n| match n {
            Node::Folder(f) if f.title == title => Some(f),
            _ => None,
        })
        .unwrap_or_else(|| panic!("folder '{title}' not found. Available: {:?}", titles(nodes)))
}

// =========================================================================
// Structural assertions
// =========================================================================

/// Assert that no folder anywhere in the tree has an empty child list.
pub fn assert_no_empty_folders(nodes: &[Node]) {
    for node in nodes {
        if let Node::Folder(f) = node {
            assert!(
                !f.children.is_empty(),
                "folder '{}' has no children",
                f.relative_path
            );
            assert_no_empty_folders(&f.children);
        }
    }
}

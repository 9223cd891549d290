//! Index document generation.
//!
//! Stage 3 of the pipeline. One traversal walks the annotated tree and hands
//! each folder level to a [`Renderer`] as a flat list of [`Entry`] values;
//! the renderer only decides how that list looks in its format.
//!
//! ## Traversal rules (shared by every format)
//!
//! - A ".." [`Entry::Parent`] comes first in every document except the root.
//! - An album becomes an [`Entry::Album`] only if it has a cover.
//! - A folder becomes an [`Entry::Folder`] only if its subtree holds at least
//!   one album with a cover. Its document is rendered first, then linked.
//! - Everything else keeps tree order.
//!
//! ## Output layout
//!
//! ```text
//! index.json                 # root document (always written)
//! Series.json                # folder "Series"
//! Series_Arc_One.json        # folder "Series/Arc_One"
//! ```
//!
//! Child documents sit next to the root document. Their name is the folder's
//! relative path with `/` turned into `_`, plus the root document's extension
//! (everything from the first `.` of its file name). When that name is already
//! taken (a folder named like the root document, or `a_b` next to `a/b`), a
//! counter is appended: `index_2.json`.

pub mod html;
pub mod json;
pub mod xml;

use crate::encode::{encode_uri, remote_url};
use crate::types::Node;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use xml::XmlRenderer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Output path has no file name: {0}")]
    NoFileName(PathBuf),
}

/// A link target in both of the forms the formats need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Relative to the document that contains it (HTML)
    pub href: String,
    /// Absolute, built on the remote base (XML, JSON)
    pub url: String,
}

/// One item of a folder-level document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<'a> {
    Parent {
        link: Link,
    },
    Folder {
        title: &'a str,
        link: Link,
    },
    Album {
        title: &'a str,
        filename: &'a str,
        size_bytes: u64,
        thumbnail: Link,
        link: Link,
    },
}

/// Per-format document writer.
pub trait Renderer {
    /// Render one folder level.
    fn render_document(&self, entries: &[Entry]) -> Result<String, RenderError>;

    /// Static files written once next to the root document.
    fn assets(&self) -> &'static [(&'static str, &'static [u8])] {
        &[]
    }
}

/// Where links point: the remote base and the site-relative albums directory.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// `host/base/path`, prefixed to every absolute URL
    pub remote_base: String,
    /// Albums directory as seen from the site root, `/`-separated
    pub albums_prefix: String,
}

impl RenderContext {
    pub fn new(remote_base: &str, albums_dir: &Path) -> Self {
        Self {
            remote_base: remote_base.to_string(),
            albums_prefix: site_path(albums_dir),
        }
    }
}

/// A document on disk and its path as seen from the site root.
#[derive(Debug, Clone)]
struct Document {
    path: PathBuf,
    site_path: String,
}

impl Document {
    fn file_name(&self) -> &str {
        self.site_path
            .rsplit_once('/')
            .map_or(self.site_path.as_str(), |(_, name)| name)
    }

    /// `../` repeated once per directory between the document and the site root.
    fn root_prefix(&self) -> String {
        let Some(parent) = self.path.parent() else {
            return String::new();
        };
        if parent.is_absolute() {
            return String::new();
        }
        let depth = parent
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count();
        "../".repeat(depth)
    }

    fn sibling(&self, file_name: &str) -> Document {
        let path = self.path.with_file_name(file_name);
        let site_path = match self.site_path.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{file_name}"),
            None => file_name.to_string(),
        };
        Document { path, site_path }
    }
}

/// Everything from the first `.` of the file name (`index.htm` → `.htm`).
fn document_extension(file_name: &str) -> &str {
    match file_name.find('.') {
        Some(pos) if pos > 0 => &file_name[pos..],
        _ => "",
    }
}

/// Child document name for a folder: `Series/Arc_One` + `.htm` → `Series_Arc_One.htm`.
pub fn child_document_name(relative_path: &str, extension: &str) -> String {
    format!("{}{}", relative_path.replace('/', "_"), extension)
}

fn site_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .trim_end_matches('/')
        .to_string()
}

/// Render `tree` into `output` and one sibling document per visible folder.
///
/// Returns every document written, root first.
pub fn render(
    renderer: &impl Renderer,
    tree: &[Node],
    output: &Path,
    ctx: &RenderContext,
) -> Result<Vec<PathBuf>, RenderError> {
    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| RenderError::NoFileName(output.to_path_buf()))?;
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let root = Document {
        path: output.to_path_buf(),
        site_path: site_path(output),
    };
    let walker = Walker {
        renderer,
        ctx,
        extension: document_extension(&file_name).to_string(),
    };

    let mut written = Vec::new();
    let mut claimed = HashSet::from([root.path.clone()]);
    walker.render_level(tree, &root, None, &mut claimed, &mut written)?;
    written.rotate_right(1);

    for (name, bytes) in renderer.assets() {
        fs::write(root.path.with_file_name(name), bytes)?;
    }
    Ok(written)
}

struct Walker<'r, R: Renderer> {
    renderer: &'r R,
    ctx: &'r RenderContext,
    extension: String,
}

impl<R: Renderer> Walker<'_, R> {
    fn render_level(
        &self,
        nodes: &[Node],
        doc: &Document,
        parent: Option<&Document>,
        claimed: &mut HashSet<PathBuf>,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), RenderError> {
        let prefix = doc.root_prefix();
        let mut entries = Vec::new();

        if let Some(parent) = parent {
            entries.push(Entry::Parent {
                link: self.document_link(parent),
            });
        }

        for node in nodes {
            match node {
                Node::Album(album) => {
                    let Some(cover) = &album.cover else {
                        continue;
                    };
                    let archive = format!("{}/{}", self.ctx.albums_prefix, album.relative_path);
                    entries.push(Entry::Album {
                        title: &album.title,
                        filename: &album.filename,
                        size_bytes: album.size_bytes,
                        thumbnail: Link {
                            href: format!("{prefix}{}", encode_uri(&cover.thumbnail_path, true)),
                            url: remote_url(&self.ctx.remote_base, &cover.thumbnail_path),
                        },
                        link: Link {
                            href: format!("{prefix}{}", encode_uri(&archive, true)),
                            url: remote_url(&self.ctx.remote_base, &archive),
                        },
                    });
                }
                Node::Folder(folder) => {
                    if !node.has_cover() {
                        continue;
                    }
                    let child = self.claim_child(doc, &folder.relative_path, claimed);
                    self.render_level(&folder.children, &child, Some(doc), claimed, written)?;
                    entries.push(Entry::Folder {
                        title: &folder.title,
                        link: self.document_link(&child),
                    });
                }
            }
        }

        let body = self.renderer.render_document(&entries)?;
        fs::write(&doc.path, body)?;
        tracing::debug!(document = %doc.path.display(), entries = entries.len(), "document written");
        written.push(doc.path.clone());
        Ok(())
    }

    /// First free sibling name for a folder's document.
    fn claim_child(
        &self,
        doc: &Document,
        relative_path: &str,
        claimed: &mut HashSet<PathBuf>,
    ) -> Document {
        let mut child = doc.sibling(&child_document_name(relative_path, &self.extension));
        let mut counter = 2;
        while !claimed.insert(child.path.clone()) {
            let renamed = format!("{relative_path}_{counter}");
            child = doc.sibling(&child_document_name(&renamed, &self.extension));
            counter += 1;
        }
        child
    }

    fn document_link(&self, doc: &Document) -> Link {
        Link {
            href: encode_uri(doc.file_name(), true),
            url: remote_url(&self.ctx.remote_base, &doc.site_path),
        }
    }
}

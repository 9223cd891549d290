//! # Comics Catalog
//!
//! A static catalog generator for directories of comic archives. Your
//! filesystem is the data source: sub-directories become folders, `.cbz` /
//! `.cbr` archives become albums, and the first entry of each archive becomes
//! its cover thumbnail.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      albums/  →  Vec<Node>           (filesystem → catalog tree)
//! 2. Annotate  tree     →  tree + thumbnails/  (cover → <sha256>.png)
//! 3. Render    tree     →  index.htm / .xml / .json + one per folder
//! ```
//!
//! Each stage is a function from one value to the next. The scanner never
//! opens an archive, the cache never renders a document, and the renderers
//! never touch the albums directory, so every stage is testable on its own.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the albums directory, builds the sorted tree |
//! | [`cache`] | Stage 2: content-addressed thumbnail cache, parallel annotation |
//! | [`render`] | Stage 3: shared traversal plus HTML, XML and JSON renderers |
//! | [`types`] | The `Node` tree shared by every stage |
//! | [`naming`] | Archive extension matching and display titles |
//! | [`archive`] | Cover entry selection and extraction from ZIP containers |
//! | [`imaging`] | Pure-Rust identify + fixed-height thumbnail |
//! | [`encode`] | Percent-encoding of paths into links |
//! | [`config`] | `catalog.toml` loading, merging and validation |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Content-Addressed Thumbnails
//!
//! Thumbnails are named after the SHA-256 of the cover bytes. The cache has
//! no index file to get out of sync: if `<hash>.png` exists, it is current.
//! Renaming or moving archives costs nothing; identical covers are encoded once.
//!
//! ## One Traversal, Many Formats
//!
//! Which folders appear, which albums are listed and where the parent link
//! goes is decided once in [`render`]. A format only turns a list of
//! [`render::Entry`] values into text, so HTML, XML and JSON can never
//! disagree about what the catalog contains.
//!
//! ## Failures Stay Local
//!
//! A broken archive costs exactly one album: it is logged, counted and left
//! out of the documents. Only a missing albums directory or an unwritable
//! output aborts a run.

pub mod archive;
pub mod cache;
pub mod config;
pub mod encode;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

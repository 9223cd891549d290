//! JSON index documents.
//!
//! ```json
//! {
//!   "albums": {
//!     "folder": [
//!       { "title": "..", "url": "host/base/index.json" },
//!       { "title": "Series", "url": "host/base/Series.json" }
//!     ],
//!     "album": [
//!       {
//!         "title": "A Comic",
//!         "filename": "A_Comic.cbz",
//!         "size": 48213,
//!         "thumbnail": "host/base/thumbnails/3fa1….png",
//!         "url": "host/base/albums/A_Comic.cbz"
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Empty groups are left out, so an empty level is `{"albums": {}}`.

use super::{Entry, RenderError, Renderer};
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct Document<'a> {
    albums: Listing<'a>,
}

#[derive(Serialize, Default)]
struct Listing<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    folder: Vec<FolderRecord<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    album: Vec<AlbumRecord<'a>>,
}

#[derive(Serialize)]
struct FolderRecord<'a> {
    title: &'a str,
    url: &'a str,
}

#[derive(Serialize)]
struct AlbumRecord<'a> {
    title: &'a str,
    filename: &'a str,
    size: u64,
    thumbnail: &'a str,
    url: &'a str,
}

impl Renderer for JsonRenderer {
    fn render_document(&self, entries: &[Entry]) -> Result<String, RenderError> {
        let mut listing = Listing::default();
        for entry in entries {
            match entry {
                Entry::Parent { link } => listing.folder.push(FolderRecord {
                    title: "..",
                    url: &link.url,
                }),
                Entry::Folder { title, link } => listing.folder.push(FolderRecord {
                    title,
                    url: &link.url,
                }),
                Entry::Album {
                    title,
                    filename,
                    size_bytes,
                    thumbnail,
                    link,
                } => listing.album.push(AlbumRecord {
                    title,
                    filename,
                    size: *size_bytes,
                    thumbnail: &thumbnail.url,
                    url: &link.url,
                }),
            }
        }
        let mut out = serde_json::to_string_pretty(&Document { albums: listing })?;
        out.push('\n');
        Ok(out)
    }
}

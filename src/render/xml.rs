//! XML index documents.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
//! <albums>
//!     <folder>
//!         <title>..</title>
//!         <url>host/base/index.xml</url>
//!     </folder>
//!     <album>
//!         <title>A Comic</title>
//!         <filename>A_Comic.cbz</filename>
//!         <size>48213</size>
//!         <thumbnail>host/base/thumbnails/3fa1….png</thumbnail>
//!         <url>host/base/albums/A_Comic.cbz</url>
//!     </album>
//! </albums>
//! ```
//!
//! The parent link is written as a folder titled `..`. All URLs are absolute.

use super::{Entry, RenderError, Renderer};
use std::fmt::Write;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlRenderer;

impl Renderer for XmlRenderer {
    fn render_document(&self, entries: &[Entry]) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str(DECLARATION);
        out.push('\n');
        out.push_str("<albums>\n");
        for entry in entries {
            match entry {
                Entry::Parent { link } => write_folder(&mut out, "..", &link.url),
                Entry::Folder { title, link } => write_folder(&mut out, title, &link.url),
                Entry::Album {
                    title,
                    filename,
                    size_bytes,
                    thumbnail,
                    link,
                } => {
                    out.push_str("\t<album>\n");
                    write_element(&mut out, "title", title);
                    write_element(&mut out, "filename", filename);
                    write_element(&mut out, "size", &size_bytes.to_string());
                    write_element(&mut out, "thumbnail", &thumbnail.url);
                    write_element(&mut out, "url", &link.url);
                    out.push_str("\t</album>\n");
                }
            }
        }
        out.push_str("</albums>\n");
        Ok(out)
    }
}

fn write_folder(out: &mut String, title: &str, url: &str) {
    out.push_str("\t<folder>\n");
    write_element(out, "title", title);
    write_element(out, "url", url);
    out.push_str("\t</folder>\n");
}

fn write_element(out: &mut String, name: &str, text: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "\t\t<{name}>{}</{name}>", escape(text));
}

/// Escape the five XML special characters.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

//! HTML index documents.
//!
//! One page per folder level: a grid of cover thumbnails linking to the
//! archives, plus folder icons linking to the child pages. Links are relative
//! so the generated tree can be browsed straight from disk.
//!
//! Styles are embedded at compile time from `static/style.css`; the folder
//! icon is written next to the root document as `folder.svg`.

use super::{Entry, RenderError, Renderer};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../../static/style.css");
const FOLDER_ICON: &[u8] = include_bytes!("../../static/folder.svg");
const FOLDER_ICON_NAME: &str = "folder.svg";
const PAGE_TITLE: &str = "Gallery";

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render_document(&self, entries: &[Entry]) -> Result<String, RenderError> {
        Ok(render_page(entries).into_string())
    }

    fn assets(&self) -> &'static [(&'static str, &'static [u8])] {
        &[(FOLDER_ICON_NAME, FOLDER_ICON)]
    }
}

fn base_document(content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (PAGE_TITLE) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn render_page(entries: &[Entry]) -> Markup {
    base_document(html! {
        main.album-grid {
            @for entry in entries {
                (render_entry(entry))
            }
        }
    })
}

fn render_entry(entry: &Entry) -> Markup {
    match entry {
        Entry::Parent { link } => html! {
            div.album.parent {
                div.thumbnail {
                    a href=(link.href) {
                        img src=(FOLDER_ICON_NAME) alt="..";
                    }
                }
                div.title { ".." }
            }
        },
        Entry::Folder { title, link } => html! {
            div.album.folder {
                div.thumbnail {
                    a href=(link.href) {
                        img src=(FOLDER_ICON_NAME) alt=(title);
                    }
                }
                div.title { (title) }
            }
        },
        Entry::Album {
            title,
            thumbnail,
            link,
            ..
        } => html! {
            div.album {
                div.thumbnail {
                    a href=(link.href) {
                        img src=(thumbnail.href) alt=(title) loading="lazy";
                    }
                }
                div.title { (title) }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Link;

    fn link(href: &str) -> Link {
        Link {
            href: href.to_string(),
            url: format!("host/{href}"),
        }
    }

    fn album<'a>(title: &'a str) -> Entry<'a> {
        Entry::Album {
            title,
            filename: "A.cbz",
            size_bytes: 1,
            thumbnail: link("thumbnails/abc.png"),
            link: link("albums/A.cbz"),
        }
    }

    #[test]
    fn empty_document_is_a_complete_page() {
        let html = HtmlRenderer.render_document(&[]).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Gallery</title>"));
        assert!(html.contains(r#"<main class="album-grid"></main>"#));
    }

    #[test]
    fn album_links_archive_and_shows_thumbnail() {
        let html = HtmlRenderer.render_document(&[album("A Comic")]).unwrap();
        assert!(html.contains(r#"<a href="albums/A.cbz">"#));
        assert!(html.contains(r#"src="thumbnails/abc.png""#));
        assert!(html.contains(r#"<div class="title">A Comic</div>"#));
    }

    #[test]
    fn folders_and_parent_use_the_folder_icon() {
        let entries = vec![
            Entry::Parent {
                link: link("index.htm"),
            },
            Entry::Folder {
                title: "Series",
                link: link("Series.htm"),
            },
        ];
        let html = HtmlRenderer.render_document(&entries).unwrap();
        assert!(html.contains(r#"<a href="index.htm"><img src="folder.svg" alt="..">"#));
        assert!(html.contains(r#"<a href="Series.htm"><img src="folder.svg" alt="Series">"#));
    }

    #[test]
    fn titles_are_escaped() {
        let html = HtmlRenderer
            .render_document(&[album("<b>Tom & Jerry</b>")])
            .unwrap();
        assert!(!html.contains("<b>Tom"));
        assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
    }

    #[test]
    fn css_is_inlined_unescaped() {
        let html = HtmlRenderer.render_document(&[]).unwrap();
        assert!(html.contains(".album .thumbnail img"));
    }

    #[test]
    fn folder_icon_is_the_only_asset() {
        let assets = HtmlRenderer.assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].0, "folder.svg");
        assert!(assets[0].1.starts_with(b"<svg"));
    }
}

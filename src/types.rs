//! The catalog tree shared by every stage.
//!
//! The scanner builds it, the thumbnail cache returns an annotated copy of it,
//! and the renderers only ever read it.

/// One entry of the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(Folder),
    Album(Album),
}

/// A directory that contains, directly or transitively, at least one album.
///
/// `children` is never empty: the scanner drops directories with nothing in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Display title (underscores → spaces, trimmed)
    pub title: String,
    /// Raw directory name
    pub filename: String,
    /// Path from the catalog root, `/`-separated
    pub relative_path: String,
    pub children: Vec<Node>,
}

/// A single comic archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Display title (archive extension stripped, underscores → spaces, trimmed)
    pub title: String,
    /// Raw archive file name, extension included
    pub filename: String,
    /// Path from the catalog root, `/`-separated
    pub relative_path: String,
    /// Archive size at scan time
    pub size_bytes: u64,
    /// Present once a cover has been extracted and thumbnailed.
    pub cover: Option<Cover>,
}

/// Cover metadata attached by the thumbnail cache.
///
/// Hash and thumbnail path always travel together, so an album either has both
/// or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    /// Hex SHA-256 of the cover entry's raw bytes
    pub hash: String,
    /// `<thumbnails_dir>/<hash>.png`, relative to the site root
    pub thumbnail_path: String,
}

impl Node {
    pub fn title(&self) -> &str {
        match self {
            Node::Folder(f) => &f.title,
            Node::Album(a) => &a.title,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Node::Folder(f) => &f.filename,
            Node::Album(a) => &a.filename,
        }
    }

    pub fn relative_path(&self) -> &str {
        match self {
            Node::Folder(f) => &f.relative_path,
            Node::Album(a) => &a.relative_path,
        }
    }

    /// Whether this subtree holds at least one album with a thumbnail.
    pub fn has_cover(&self) -> bool {
        match self {
            Node::Folder(f) => f.children.iter().any(Node::has_cover),
            Node::Album(a) => a.cover.is_some(),
        }
    }
}

/// Visit every album in the tree, depth first, in sibling order.
pub fn albums(nodes: &[Node]) -> Vec<&Album> {
    let mut out = Vec::new();
    collect_albums(nodes, &mut out);
    out
}

fn collect_albums<'a>(nodes: &'a [Node], out: &mut Vec<&'a Album>) {
    for node in nodes {
        match node {
            Node::Folder(f) => collect_albums(&f.children, out),
            Node::Album(a) => out.push(a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(path: &str, cover: bool) -> Node {
        Node::Album(Album {
            title: path.to_string(),
            filename: format!("{path}.cbz"),
            relative_path: format!("{path}.cbz"),
            size_bytes: 1,
            cover: cover.then(|| Cover {
                hash: "abc".into(),
                thumbnail_path: "thumbnails/abc.png".into(),
            }),
        })
    }

    fn folder(name: &str, children: Vec<Node>) -> Node {
        Node::Folder(Folder {
            title: name.to_string(),
            filename: name.to_string(),
            relative_path: name.to_string(),
            children,
        })
    }

    #[test]
    fn has_cover_looks_through_nested_folders() {
        let tree = folder("a", vec![folder("b", vec![album("x", true)])]);
        assert!(tree.has_cover());

        let bare = folder("a", vec![folder("b", vec![album("x", false)])]);
        assert!(!bare.has_cover());
    }

    #[test]
    fn albums_are_collected_depth_first() {
        let tree = vec![
            album("one", false),
            folder("f", vec![album("two", false), album("three", true)]),
            album("four", true),
        ];
        let titles: Vec<&str> = albums(&tree).iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three", "four"]);
    }
}

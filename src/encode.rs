//! Percent-encoding of filesystem-derived paths into document links.
//!
//! Every byte outside the RFC 3986 unreserved set (`A-Z a-z 0-9 - _ . ~`) is
//! percent-encoded, then a fixed table of characters is left literal so links
//! stay readable:
//!
//! | set | characters | kept literal when |
//! |---|---|---|
//! | marks | `- _ . ! * ' ( )` | always |
//! | separators | `; , / ? : @ = + $` | always |
//! | fragment | `#` | `!html` |
//!
//! Document-relative links in HTML (`html = true`) keep `#` encoded so a file
//! name can never turn into a fragment; absolute XML and JSON URLs keep it
//! literal.
//!
//! Encoding is applied exactly once per raw path; it is not idempotent
//! (`%` itself is encoded, so a second pass over-encodes).

const MARKS: &[u8] = b"-_.!*'()";
const SEPARATORS: &[u8] = b";,/?:@=+$";
const FRAGMENT: &[u8] = b"#";

/// Percent-encode `path` for use as a link target.
pub fn encode_uri(path: &str, html: bool) -> String {
    restore(&urlencoding::encode(path), |byte| {
        MARKS.contains(&byte)
            || SEPARATORS.contains(&byte)
            || (!html && FRAGMENT.contains(&byte))
    })
}

/// Turn `%XX` escapes back into literal bytes where `keep` allows it.
fn restore(encoded: &str, keep: impl Fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let escape = rest.get(pos..pos + 3).unwrap_or(&rest[pos..]);
        match u8::from_str_radix(escape.get(1..).unwrap_or(""), 16) {
            Ok(byte) if escape.len() == 3 && keep(byte) => out.push(char::from(byte)),
            _ => out.push_str(escape),
        }
        rest = &rest[pos + escape.len()..];
    }
    out.push_str(rest);
    out
}

/// Join a remote base (`host/base/path`) and a site-relative path, then encode.
pub fn remote_url(remote_base: &str, path: &str) -> String {
    encode_uri(&join_remote(remote_base, path), false)
}

/// Join a remote base and a site-relative path without encoding.
pub fn join_remote(remote_base: &str, path: &str) -> String {
    format!("{}/{}", remote_base.trim_end_matches('/'), path)
}

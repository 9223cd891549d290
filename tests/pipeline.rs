//! End-to-end runs of the `comics-catalog` binary against sandboxed site roots.
//!
//! Each test builds a small albums directory in a temp dir, runs the binary
//! with `--root` pointing at it, and inspects the thumbnails and documents it
//! leaves behind.

use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

// =========================================================================
// Helpers
// =========================================================================

fn run(root: &Path, args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_comics-catalog"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "comics-catalog {:?} failed:\n{}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn run_failing(root: &Path, args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_comics-catalog"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .unwrap();
    assert!(!output.status.success(), "comics-catalog {:?} should fail", args);
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn write_cbz(path: &Path, entries: &[(&str, &[u8])]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut zip = ZipWriter::new(fs::File::create(path).unwrap());
    for (name, bytes) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn thumbnails(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(root.join("thumbnails"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    paths.sort();
    paths
}

fn percent_decode(encoded: &str) -> String {
    urlencoding::decode(encoded).unwrap().into_owned()
}

/// `A_Comic.cbz` (800×1200 JPEG cover) and `Series/Vol_1.cbz` (600×900 PNG cover).
fn two_album_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let albums = tmp.path().join("albums");
    write_cbz(
        &albums.join("A_Comic.cbz"),
        &[
            ("002.jpg", &image_bytes(10, 10, ImageFormat::Jpeg)),
            ("001.jpg", &image_bytes(800, 1200, ImageFormat::Jpeg)),
        ],
    );
    write_cbz(
        &albums.join("Series/Vol_1.cbz"),
        &[("p1.png", &image_bytes(600, 900, ImageFormat::Png))],
    );
    tmp
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn two_album_catalog_renders_json_tree() {
    let site = two_album_site();

    run(site.path(), &["build", "--json", "--remote-base", "host"]);

    let thumbs = thumbnails(site.path());
    assert_eq!(thumbs.len(), 2);
    for thumb in &thumbs {
        assert_eq!(thumb.extension().unwrap(), "png");
        assert_eq!(image::image_dimensions(thumb).unwrap(), (64, 96));
    }

    let root = read_json(&site.path().join("index.json"));
    let albums = root["albums"]["album"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["title"], "A Comic");
    assert_eq!(albums[0]["filename"], "A_Comic.cbz");
    assert_eq!(albums[0]["url"], "host/albums/A_Comic.cbz");
    let thumbnail = albums[0]["thumbnail"].as_str().unwrap();
    assert!(thumbnail.starts_with("host/thumbnails/"));
    assert!(thumbnail.ends_with(".png"));
    assert_eq!(
        root["albums"]["folder"],
        json!([{ "title": "Series", "url": "host/Series.json" }])
    );

    let series = read_json(&site.path().join("Series.json"));
    assert_eq!(
        series["albums"]["folder"],
        json!([{ "title": "..", "url": "host/index.json" }])
    );
    let vols = series["albums"]["album"].as_array().unwrap();
    assert_eq!(vols.len(), 1);
    assert_eq!(vols[0]["title"], "Vol 1");
    assert_eq!(vols[0]["url"], "host/albums/Series/Vol_1.cbz");
}

#[test]
fn empty_folder_yields_empty_documents_in_every_format() {
    let site = TempDir::new().unwrap();
    fs::create_dir_all(site.path().join("albums/Empty")).unwrap();
    fs::write(site.path().join("albums/notes.txt"), "not an archive").unwrap();

    run(site.path(), &["build", "--html", "--xml", "--json"]);

    assert_eq!(read_json(&site.path().join("index.json")), json!({ "albums": {} }));

    let xml = fs::read_to_string(site.path().join("index.xml")).unwrap();
    assert!(xml.contains("<albums>"));
    assert!(!xml.contains("<album>"));
    assert!(!xml.contains("<folder>"));

    let html = fs::read_to_string(site.path().join("index.htm")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(!html.contains(r#"<div class="album"#));

    for name in ["Empty.json", "Empty.xml", "Empty.htm"] {
        assert!(!site.path().join(name).exists(), "{name} should not exist");
    }
}

#[test]
fn unreadable_archive_is_left_out_but_siblings_render() {
    let site = TempDir::new().unwrap();
    let albums = site.path().join("albums");
    fs::create_dir_all(&albums).unwrap();
    fs::write(albums.join("Broken.cbz"), b"this is not a zip file").unwrap();
    write_cbz(
        &albums.join("Good.cbz"),
        &[("cover.jpg", &image_bytes(120, 180, ImageFormat::Jpeg))],
    );

    let output = run(site.path(), &["build", "--json", "--xml", "--html"]);

    assert!(stdout(&output).contains("Failed: Broken.cbz"));
    let json = read_json(&site.path().join("index.json"));
    let albums = json["albums"]["album"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["title"], "Good");

    let xml = fs::read_to_string(site.path().join("index.xml")).unwrap();
    assert!(xml.contains("<title>Good</title>"));
    assert!(!xml.contains("Broken"));
    let html = fs::read_to_string(site.path().join("index.htm")).unwrap();
    assert!(html.contains("albums/Good.cbz"));
    assert!(!html.contains("Broken"));
}

#[test]
fn album_urls_decode_back_to_relative_paths() {
    let site = TempDir::new().unwrap();
    let cover = image_bytes(30, 45, ImageFormat::Png);
    let paths = ["R&D 50%/Tom & Jerry #1.cbz", "Ünïcode/Été_été.cbz", "plain.cbz"];
    for path in paths {
        write_cbz(&site.path().join("albums").join(path), &[("c.png", &cover)]);
    }

    run(site.path(), &["build", "--json", "--remote-base", "example.com/comics"]);

    let mut urls = Vec::new();
    let mut documents = vec![site.path().join("index.json")];
    while let Some(doc) = documents.pop() {
        let value = read_json(&doc);
        for album in value["albums"]["album"].as_array().into_iter().flatten() {
            urls.push(percent_decode(album["url"].as_str().unwrap()));
        }
        for folder in value["albums"]["folder"].as_array().into_iter().flatten() {
            if folder["title"] != ".." {
                let url = percent_decode(folder["url"].as_str().unwrap());
                let name = url.rsplit('/').next().unwrap().to_string();
                documents.push(site.path().join(name));
            }
        }
    }

    urls.sort();
    let mut expected: Vec<String> = paths
        .iter()
        .map(|p| format!("example.com/comics/albums/{p}"))
        .collect();
    expected.sort();
    assert_eq!(urls, expected);
}

#[test]
fn second_build_is_a_pure_cache_hit() {
    let site = two_album_site();
    run(site.path(), &["build"]);
    let before: Vec<_> = thumbnails(site.path())
        .iter()
        .map(|p| fs::metadata(p).unwrap().modified().unwrap())
        .collect();

    let output = run(site.path(), &["build"]);

    assert!(stdout(&output).contains("2 cached, 0 encoded (2 total)"));
    let after: Vec<_> = thumbnails(site.path())
        .iter()
        .map(|p| fs::metadata(p).unwrap().modified().unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn identical_covers_share_one_thumbnail() {
    let site = TempDir::new().unwrap();
    let cover = image_bytes(200, 300, ImageFormat::Jpeg);
    write_cbz(&site.path().join("albums/One.cbz"), &[("01.jpg", &cover)]);
    write_cbz(&site.path().join("albums/Two.cbz"), &[("a.jpg", &cover)]);

    run(site.path(), &["build", "--json"]);

    assert_eq!(thumbnails(site.path()).len(), 1);
    let json = read_json(&site.path().join("index.json"));
    let albums = json["albums"]["album"].as_array().unwrap();
    assert_eq!(albums[0]["thumbnail"], albums[1]["thumbnail"]);
}

#[test]
fn html_links_are_relative_to_the_site_root() {
    let site = two_album_site();

    run(site.path(), &["build", "--html"]);

    let index = fs::read_to_string(site.path().join("index.htm")).unwrap();
    assert!(index.contains(r#"href="albums/A_Comic.cbz""#));
    assert!(index.contains(r#"src="thumbnails/"#));
    assert!(index.contains(r#"href="Series.htm""#));
    assert!(site.path().join("folder.svg").exists());

    let series = fs::read_to_string(site.path().join("Series.htm")).unwrap();
    assert!(series.contains(r#"href="index.htm""#));
    assert!(series.contains(r#"href="albums/Series/Vol_1.cbz""#));
}

// =========================================================================
// Config and other commands
// =========================================================================

#[test]
fn config_file_selects_formats_and_names() {
    let site = two_album_site();
    fs::write(
        site.path().join("catalog.toml"),
        r#"
remote_base = "cdn.test/c"

[output]
xml = true
xml_file = "catalog.xml"

[thumbnails]
height = 48
"#,
    )
    .unwrap();

    run(site.path(), &["build"]);

    let xml = fs::read_to_string(site.path().join("catalog.xml")).unwrap();
    assert!(xml.contains("<url>cdn.test/c/Series.xml</url>"));
    assert!(site.path().join("Series.xml").exists());
    assert!(!site.path().join("index.json").exists());
    for thumb in thumbnails(site.path()) {
        assert_eq!(image::image_dimensions(thumb).unwrap(), (32, 48));
    }
}

#[test]
fn missing_albums_directory_is_fatal() {
    let site = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_comics-catalog"))
        .arg("--root")
        .arg(site.path())
        .args(["build", "--json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("RootNotFound"));
    assert!(!site.path().join("index.json").exists());
}

#[test]
fn check_prints_the_tree_without_writing() {
    let site = two_album_site();

    let output = run(site.path(), &["check"]);

    let text = stdout(&output);
    assert!(text.contains("001 A Comic"));
    assert!(text.contains("002 Series (1 entry)"));
    assert!(text.contains("    001 Vol 1"));
    assert!(!site.path().join("thumbnails").exists());
}

#[test]
fn check_rejects_build_only_flags() {
    let site = two_album_site();

    run_failing(site.path(), &["check", "--json"]);
    let output = run(site.path(), &["check", "--albums-dir", "albums/Series"]);

    let text = stdout(&output);
    assert!(text.contains("001 Vol 1"));
    assert!(!text.contains("A Comic"));
}

#[test]
fn absolute_output_file_is_rejected() {
    let site = two_album_site();
    let target = site.path().join("index.json");

    let output = run_failing(
        site.path(),
        &["build", "--json", "--json-file", target.to_str().unwrap()],
    );

    assert!(String::from_utf8_lossy(&output.stderr).contains("site root"));
    assert!(!target.exists());
}

#[test]
fn folder_named_index_keeps_its_albums() {
    let site = TempDir::new().unwrap();
    write_cbz(
        &site.path().join("albums/index/V.cbz"),
        &[("c.png", &image_bytes(20, 30, ImageFormat::Png))],
    );

    run(site.path(), &["build", "--json", "--remote-base", "h"]);

    let root = read_json(&site.path().join("index.json"));
    assert_eq!(
        root["albums"]["folder"],
        json!([{ "title": "index", "url": "h/index_2.json" }])
    );
    let child = read_json(&site.path().join("index_2.json"));
    assert_eq!(child["albums"]["album"][0]["title"], "V");
}

#[test]
fn gen_config_prints_parseable_toml() {
    let site = TempDir::new().unwrap();
    let output = run(site.path(), &["gen-config"]);
    let value: toml::Value = toml::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["albums_dir"].as_str(), Some("albums"));
    assert_eq!(value["thumbnails"]["height"].as_integer(), Some(96));
}

//! End-to-end rendering against real files.

use std::fs;

use stitch_adapters::{LocalFilesystem, list_views};
use stitch_core::prelude::*;
use tempfile::TempDir;

fn views() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("layout")).unwrap();
    fs::create_dir_all(root.join("img")).unwrap();
    fs::write(
        root.join("index.html"),
        "<!DOCTYPE html><html><import src=\"/layout/head.html\"></import>\
         <body><h1>#{title}</h1><img src=\"img/logo.png\"></body></html>",
    )
    .unwrap();
    fs::write(
        root.join("layout/head.html"),
        "<head><link rel=\"stylesheet\" href=\"site.css\"><title>#{title}</title></head>",
    )
    .unwrap();
    fs::write(root.join("img/logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    dir
}

#[test]
fn renders_from_disk() {
    let dir = views();
    let engine = ViewEngine::new(EngineOptions::new(dir.path()), Box::new(LocalFilesystem::new()));

    let html = engine
        .render_view("index", &Scope::new().with("title", "Stitch"))
        .unwrap();

    assert_eq!(
        html,
        "<!DOCTYPE html><html><head><link href=\"/layout/site.css\" rel=\"stylesheet\">\
         <title>Stitch</title></head><body><h1>Stitch</h1><img src=\"/img/logo.png\"></body></html>"
    );
}

#[test]
fn serves_assets_from_disk() {
    let dir = views();
    let assets = AssetPassthrough::new(dir.path(), Box::new(LocalFilesystem::new()));

    match assets.serve("/img/logo.png") {
        AssetOutcome::Served(asset) => assert_eq!(asset.bytes, b"\x89PNG"),
        other => panic!("expected asset, got {other:?}"),
    }
    assert_eq!(
        assets.serve("/img"),
        AssetOutcome::Declined(DeclineReason::NotFound)
    );
    assert_eq!(
        assets.serve("/../outside.txt"),
        AssetOutcome::Declined(DeclineReason::Forbidden)
    );
}

#[test]
fn lists_views_and_preloads_them() {
    let dir = views();
    let engine = ViewEngine::new(EngineOptions::new(dir.path()), Box::new(LocalFilesystem::new()));

    let names = list_views(engine.view_root(), "html").unwrap();
    assert_eq!(names.len(), 2);

    let loaded = engine
        .store()
        .preload(names.iter().map(|name| engine.resolve(name)))
        .unwrap();
    assert_eq!(loaded, 2);
}

//! Ledger persistence, locking and drift checks

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use export_codecs::Format;
use export_core::{
    CheckStatus, Decision, ExportEngine, Ledger, Object, RunOptions, TrackedFile, Utils,
    WriteSpec,
};
use export_fs::NormalizedPath;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn tracked(path: &str) -> TrackedFile {
    TrackedFile::new(NormalizedPath::new(path), Format::Json, Some("sha256:00".into()))
}

fn data(object: &Object, _: &Utils) -> Decision {
    let name = object.field("name").and_then(|v| v.as_str()).unwrap_or("x");
    Decision::Write(WriteSpec::new(
        format!("_data/{name}.json"),
        Format::Json,
        json!(object.fields),
    ))
}

#[test]
fn ledger_preserves_target_order() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("ledger.toml"));

    let ledger = Ledger::from_files(vec![tracked("z.json"), tracked("a.json"), tracked("m.json")]);
    ledger.save(&path).unwrap();

    let loaded = Ledger::load(&path).unwrap();
    let paths: Vec<_> = loaded.paths().map(|p| p.as_str()).collect();
    assert_eq!(paths, vec!["z.json", "a.json", "m.json"]);
}

#[test]
fn missing_ledger_loads_empty() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nope/ledger.toml"));
    assert!(Ledger::load_or_default(&path).unwrap().is_empty());
    assert!(Ledger::load(&path).is_err());
}

#[test]
fn concurrent_saves_leave_a_readable_ledger() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("ledger.toml"));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let ledger = Ledger::from_files(vec![tracked(&format!("{i}.json"))]);
                barrier.wait();
                ledger.save(&path).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let loaded = Ledger::load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
}

#[test]
fn corrupt_ledger_fails_the_run() {
    let temp = TempDir::new().unwrap();
    let engine = ExportEngine::new(NormalizedPath::new(temp.path()));
    fs::create_dir_all(engine.ledger_path().parent().unwrap().to_native()).unwrap();
    fs::write(engine.ledger_path().to_native(), "this is [not toml").unwrap();

    let result = engine.run(&[Object::new("a")], &data, RunOptions::default());

    assert!(result.is_err());
    assert!(!temp.path().join("_data").exists());
    assert_eq!(engine.check().status, CheckStatus::Broken);
}

#[test]
fn spec_targeting_the_ledger_is_dropped() {
    let temp = TempDir::new().unwrap();
    let engine = ExportEngine::new(NormalizedPath::new(temp.path()));

    let clobber = |_: &Object, _: &Utils| -> Decision {
        Decision::Write(WriteSpec::new(
            ".content-export/ledger.toml",
            Format::Json,
            json!({}),
        ))
    };
    let report = engine
        .run(&[Object::new("a")], &clobber, RunOptions::default())
        .unwrap();

    assert!(report.events.is_empty());
    assert!(Ledger::load(engine.ledger_path()).unwrap().is_empty());
}

#[test]
fn check_reports_missing_and_drifted_files() {
    let temp = TempDir::new().unwrap();
    let engine = ExportEngine::new(NormalizedPath::new(temp.path()));
    let objects = vec![
        Object::new("a").with_field("name", "kept"),
        Object::new("a").with_field("name", "edited"),
        Object::new("a").with_field("name", "removed"),
    ];

    engine.run(&objects, &data, RunOptions::default()).unwrap();
    assert_eq!(engine.check().status, CheckStatus::Healthy);

    fs::write(temp.path().join("_data/edited.json"), "{}").unwrap();
    fs::remove_file(temp.path().join("_data/removed.json")).unwrap();

    let report = engine.check();
    assert_eq!(report.status, CheckStatus::Drifted);
    assert_eq!(report.drifted.len(), 1);
    assert_eq!(report.drifted[0].path, "_data/edited.json");
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].path, "_data/removed.json");
    assert_eq!(report.missing[0].format, "json");
}

#[test]
fn tracked_files_lists_the_last_run() {
    let temp = TempDir::new().unwrap();
    let engine = ExportEngine::new(NormalizedPath::new(temp.path()));

    assert!(engine.tracked_files().unwrap().is_empty());
    engine
        .run(
            &[Object::new("a").with_field("name", "one")],
            &data,
            RunOptions::default(),
        )
        .unwrap();

    let files = engine.tracked_files().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path.as_str(), "_data/one.json");
    assert!(files[0].checksum.as_deref().unwrap().starts_with("sha256:"));
}

#[test]
fn moving_the_output_directory_never_deletes_in_the_new_one() {
    let temp = TempDir::new().unwrap();
    let base = NormalizedPath::new(temp.path());
    let ledger_path = base.join("state/ledger.toml");

    let first = ExportEngine::new(base.join("site_a")).with_ledger_path(ledger_path.clone());
    let index = |_: &Object, _: &Utils| -> Decision {
        Decision::Write(WriteSpec::new("index.json", Format::Json, json!({"v": 1})))
    };
    first
        .run(&[Object::new("page")], &index, RunOptions::default())
        .unwrap();
    assert!(temp.path().join("site_a/index.json").exists());

    fs::create_dir_all(temp.path().join("site_b")).unwrap();
    fs::write(temp.path().join("site_b/index.json"), "hand written").unwrap();

    let second = ExportEngine::new(base.join("site_b")).with_ledger_path(ledger_path.clone());
    assert!(second.tracked_files().unwrap().is_empty());
    let report = second
        .run(&[], &|_: &Object, _: &Utils| Decision::Skip, RunOptions::default())
        .unwrap();

    assert!(report.events.is_empty());
    assert_eq!(
        fs::read_to_string(temp.path().join("site_b/index.json")).unwrap(),
        "hand written"
    );
    assert!(temp.path().join("site_a/index.json").exists());

    let saved = Ledger::load(&ledger_path).unwrap();
    assert_eq!(saved.root(), Some(second.root()));
}

#[test]
fn empty_ledger_left_by_an_interrupted_save_does_not_block_runs() {
    let temp = TempDir::new().unwrap();
    let engine = ExportEngine::new(NormalizedPath::new(temp.path()));
    fs::create_dir_all(engine.ledger_path().parent().unwrap().to_native()).unwrap();
    fs::write(engine.ledger_path().to_native(), "").unwrap();

    let report = engine
        .run(
            &[Object::new("a").with_field("name", "one")],
            &data,
            RunOptions::default(),
        )
        .unwrap();

    assert_eq!(report.created().count(), 1);
    assert_eq!(engine.tracked_files().unwrap().len(), 1);
    assert_eq!(engine.check().status, CheckStatus::Healthy);
}

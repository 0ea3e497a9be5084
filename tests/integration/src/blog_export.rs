//! Blog export scenarios
//!
//! Drives the engine from the `test-fixtures/sites/blog` manifest across
//! consecutive runs, the way a site build would.

use std::path::{Path, PathBuf};

use assert_fs::TempDir;
use assert_fs::prelude::*;
use export_core::{CheckStatus, ExportEngine, Manifest, Object, RunEvent, RunOptions, RunReport};
use export_fs::NormalizedPath;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;

const POST: &str = "_posts/2024-05-01-hello-world.md";
const DESSERT: &str = "_posts/2024-05-03-creme-brulee-and-coffee.md";
const ABOUT: &str = "about.md";
const AUTHORS: &str = "_data/authors.yaml";
const SETTINGS: &str = "_data/settings.json";

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/sites/blog")
}

struct Site {
    dir: TempDir,
    manifest: Manifest,
    engine: ExportEngine,
}

impl Site {
    fn open() -> Self {
        let dir = TempDir::new().unwrap();
        dir.copy_from(fixture_dir(), &["**/*"]).unwrap();

        let root = NormalizedPath::new(dir.path());
        let manifest = Manifest::load(&root.join("export.toml")).unwrap();
        let engine = ExportEngine::from_manifest(&manifest, &root);
        Self {
            dir,
            manifest,
            engine,
        }
    }

    fn objects(&self, name: &str) -> Vec<Object> {
        let raw = std::fs::read_to_string(self.dir.path().join("objects").join(name)).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        let list = match value {
            Value::Object(mut wrapped) => wrapped.remove("objects").unwrap(),
            list => list,
        };
        serde_json::from_value(list).unwrap()
    }

    fn export(&self, name: &str, options: RunOptions) -> RunReport {
        let rules = self.manifest.rule_set().unwrap();
        self.engine.run(&self.objects(name), &rules, options).unwrap()
    }

    fn output(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.dir.child("site").child(path)
    }
}

fn paths(events: impl Iterator<Item = NormalizedPath>) -> Vec<String> {
    events.map(|path| path.as_str().to_string()).collect()
}

#[test]
fn first_run_writes_the_whole_site() {
    let site = Site::open();
    let report = site.export("first.json", RunOptions::default());

    assert_eq!(
        paths(report.created().cloned()),
        vec![POST, DESSERT, ABOUT, AUTHORS, SETTINGS]
    );

    // Only the untitled post fails; unmatched objects are skipped silently
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        RunEvent::ObjectFailed { object, .. } if object == "post#3"
    ));

    site.output(POST).assert(
        predicate::str::starts_with("---\n")
            .and(predicate::str::contains("layout: post"))
            .and(predicate::str::contains("title: Hello World"))
            .and(predicate::str::contains("body:").not())
            .and(predicate::str::ends_with("---\nFirst post.\n")),
    );
    site.output(ABOUT).assert(
        predicate::str::contains("layout: page").and(predicate::str::contains("About this blog.")),
    );

    let authors: Value =
        serde_yaml::from_str(&std::fs::read_to_string(site.output(AUTHORS).path()).unwrap())
            .unwrap();
    assert_eq!(
        authors,
        serde_json::json!([{"name": "Ada"}, {"name": "Grace"}])
    );

    // A later non-appending write to the same path replaces the earlier one
    let settings: Value =
        serde_json::from_str(&std::fs::read_to_string(site.output(SETTINGS).path()).unwrap())
            .unwrap();
    assert_eq!(settings, serde_json::json!({"theme": "dark"}));

    let tracked: Vec<_> = site
        .engine
        .tracked_files()
        .unwrap()
        .into_iter()
        .map(|file| file.path.as_str().to_string())
        .collect();
    assert_eq!(tracked, vec![POST, DESSERT, ABOUT, AUTHORS, SETTINGS]);
    assert_eq!(site.engine.check().status, CheckStatus::Healthy);
}

#[test]
fn second_run_prunes_what_is_gone() {
    let site = Site::open();
    site.export("first.json", RunOptions::default());
    site.dir.child("site/notes.txt").write_str("mine").unwrap();

    let report = site.export("second.json", RunOptions::default());

    assert_eq!(paths(report.deleted().cloned()), vec![DESSERT, SETTINGS]);
    assert_eq!(paths(report.created().cloned()), vec![POST, ABOUT, AUTHORS]);
    assert!(report.success());

    site.output(DESSERT).assert(predicate::path::missing());
    site.output(SETTINGS).assert(predicate::path::missing());
    site.output(POST)
        .assert(predicate::str::contains("First post, edited."));
    site.output(AUTHORS)
        .assert(predicate::str::contains("Ada").and(predicate::str::contains("Grace").not()));

    // Files the exporter never wrote are left alone
    site.dir
        .child("site/notes.txt")
        .assert(predicate::str::diff("mine"));
    assert_eq!(site.engine.check().status, CheckStatus::Healthy);
}

#[test]
fn repeating_a_run_is_stable() {
    let site = Site::open();
    site.export("second.json", RunOptions::default());
    let before = std::fs::read_to_string(site.output(POST).path()).unwrap();
    let ledger_before = std::fs::read_to_string(site.engine.ledger_path().to_native()).unwrap();

    let report = site.export("second.json", RunOptions::default());

    assert_eq!(report.deleted().count(), 0);
    site.output(POST).assert(predicate::str::diff(before));
    assert_eq!(
        std::fs::read_to_string(site.engine.ledger_path().to_native()).unwrap(),
        ledger_before
    );
}

#[test]
fn dry_run_previews_the_second_run() {
    let site = Site::open();
    site.export("first.json", RunOptions::default());
    let ledger_before = std::fs::read_to_string(site.engine.ledger_path().to_native()).unwrap();

    let report = site.export("second.json", RunOptions::dry_run());

    let lines = report.lines();
    assert!(lines.contains(&format!("[dry-run] Would delete file: {DESSERT}")));
    assert!(lines.contains(&format!("[dry-run] Would create file: {POST}")));

    site.output(DESSERT).assert(predicate::path::exists());
    site.output(POST)
        .assert(predicate::str::contains("First post.").and(predicate::str::contains("edited").not()));
    assert_eq!(
        std::fs::read_to_string(site.engine.ledger_path().to_native()).unwrap(),
        ledger_before
    );
}

#[test]
fn hand_edits_show_up_as_drift_until_the_next_run() {
    let site = Site::open();
    site.export("second.json", RunOptions::default());

    site.output(ABOUT).write_str("edited by hand").unwrap();
    std::fs::remove_file(site.output(AUTHORS).path()).unwrap();

    let report = site.engine.check();
    assert_eq!(report.drifted.len(), 1);
    assert_eq!(report.drifted[0].path, ABOUT);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].path, AUTHORS);
    assert!(!report.is_healthy());

    site.export("second.json", RunOptions::default());
    assert_eq!(site.engine.check().status, CheckStatus::Healthy);
}

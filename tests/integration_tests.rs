use peoplestats::charts::{self, BivariateOutcome};
use peoplestats::data::Distributions;
use peoplestats::display::Display;
use peoplestats::generator;
use peoplestats::pivot::{self, Pivot};
use peoplestats::report;
use peoplestats::store::Store;
use peoplestats::{OutputFormat, RenderOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::process::{Command, Output};

/// Helper function to run the peoplestats binary without pausing between charts
fn run_peoplestats(db: &Path, out_dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_peoplestats"))
        .arg("--db")
        .arg(db)
        .arg("--out-dir")
        .arg(out_dir)
        .arg("--no-wait")
        .args(["--options", r#"{"type": "svg"}"#])
        .args(extra)
        .output()
        .expect("Failed to spawn process")
}

fn chart_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

fn seeded_store(seed: u64) -> Store {
    let mut store = Store::open_in_memory().unwrap();
    generator::seed(&mut store, &mut StdRng::seed_from_u64(seed)).unwrap();
    store
}

#[test]
fn test_end_to_end_seeded_run() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("people.sqlite");
    let out_dir = dir.path().join("charts");

    let output = run_peoplestats(&db, &out_dir, &["--seed"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains(report::EYE_HEADER));
    assert!(stdout.contains(report::HAIR_HEADER));
    assert!(stdout.contains(report::WEIGHT_HEADER));
    assert!(stdout.contains("Database connection closed."));

    assert_eq!(
        chart_files(&out_dir),
        vec![
            "eye_colors.svg",
            "eye_hair.svg",
            "hair_colors.svg",
            "weight_categories.svg"
        ]
    );

    let store = Store::open(&db).unwrap();
    assert_eq!(store.count().unwrap(), generator::NAMES.len() as i64);
}

#[test]
fn test_end_to_end_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("empty.sqlite");
    let out_dir = dir.path().join("charts");

    let output = run_peoplestats(&db, &out_dir, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains(charts::NO_DATA_MESSAGE));
    assert!(stdout.contains("Database connection closed."));
    assert!(chart_files(&out_dir).is_empty());
}

#[test]
fn test_store_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("missing").join("dir").join("people.sqlite");
    let out_dir = dir.path().join("charts");

    let output = run_peoplestats(&db, &out_dir, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("❌ Database error"));
    assert!(!stdout.contains("Database connection closed."));
}

#[test]
fn test_bad_render_options_fail() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_peoplestats"))
        .arg("--db")
        .arg(dir.path().join("people.sqlite"))
        .args(["--no-wait", "--options", "not json"])
        .output()
        .expect("Failed to spawn process");
    assert!(!output.status.success());
}

#[test]
fn test_server_and_client_aggregates_agree() {
    let store = seeded_store(11);
    let dists = Distributions::from_rows(&store.all_rows().unwrap());

    let pairs = [
        (report::eye_color_counts(&store).unwrap(), &dists.eye_colors),
        (report::hair_color_counts(&store).unwrap(), &dists.hair_colors),
        (report::weight_category_counts(&store).unwrap(), &dists.weight_categories),
    ];
    for (server, client) in pairs {
        assert_eq!(server.len(), client.len());
        for (label, count) in server {
            assert_eq!(client.get(&label), count as u64, "mismatch for {}", label);
        }
    }
}

#[test]
fn test_pivot_matches_grouped_query() {
    let store = seeded_store(5);
    let rows = pivot::eye_hair_counts(&store).unwrap();
    let pivot = Pivot::from_rows(rows.clone());

    let total: i64 = rows.iter().map(|(_, _, c)| c).sum();
    assert_eq!(total, store.count().unwrap());

    let hair_colors = pivot.hair_colors();
    let mut sorted = hair_colors.clone();
    sorted.sort();
    assert_eq!(hair_colors, sorted);

    for (hair, heights) in pivot.series() {
        for (eye, height) in pivot.eye_colors().iter().zip(heights) {
            let queried = rows
                .iter()
                .find(|(e, h, _)| e == eye && *h == hair)
                .map(|(_, _, c)| *c)
                .unwrap_or(0);
            assert_eq!(height, queried as f64);
        }
    }
}

#[test]
fn test_library_pipeline_png() {
    let store = seeded_store(21);
    let dir = tempfile::tempdir().unwrap();
    let mut display = Display::new(dir.path(), OutputFormat::Png, false).unwrap();
    let options = RenderOptions::default();

    let paths = charts::render_distributions(&store, &options, &mut display).unwrap();
    assert_eq!(paths.len(), 3);

    let outcome = charts::render_bivariate(&store, &options, &mut display).unwrap();
    assert!(matches!(outcome, BivariateOutcome::Rendered(_)));

    for path in display.shown() {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}

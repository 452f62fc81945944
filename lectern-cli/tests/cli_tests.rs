//! Integration tests for the Lectern CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BIBLE_JSON: &str = r#"{
    "metadata": {
        "title": "Holy Bible",
        "language": { "original": ["Hebrew"], "translations": ["English", "Malayalam"] },
        "total_books": 2
    },
    "books": [
        {
            "number": 1,
            "name": { "english": "Genesis" },
            "chapters": [
                { "number": 1, "verses": [
                    { "number": 1, "text": { "english": "In the beginning", "malayalam": "ആദിയിൽ" } },
                    { "number": 2, "text": { "english": "And the earth was without form" } }
                ]},
                { "number": 2, "verses": [
                    { "number": 1, "text": { "english": "Thus the heavens" } }
                ]}
            ]
        },
        {
            "number": 2,
            "name": { "english": "Exodus" },
            "chapters": [
                { "number": 1, "verses": [
                    { "number": 1, "text": { "english": "Now these are the names" } }
                ]}
            ]
        }
    ]
}"#;

/// A `lectern` command isolated in its own data directory, fully offline
fn lectern(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lectern").unwrap();
    cmd.env("LECTERN_DATA_DIR", data_dir.path())
        .env("LECTERN_QURAN_API", "off")
        .env("LECTERN_PAGE_TURN_DELAY_MS", "0")
        .env_remove("LECTERN_DATABASE_URL")
        .env_remove("LECTERN_DATABASE_KEY")
        .env_remove("LECTERN_TRANSLITERATION_URL");
    cmd
}

/// Data directory with the sample Bible imported
fn imported_bible() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    let input = data_dir.path().join("bible.json");
    fs::write(&input, BIBLE_JSON).expect("Failed to write test file");

    lectern(&data_dir)
        .args(["import", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 chapters and 4 verses"));
    data_dir
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("lectern").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("texts"))
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("bookmarks"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("lectern").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lectern"));
}

#[test]
fn test_export_help() {
    let mut cmd = Command::cargo_bin("lectern").unwrap();
    cmd.args(["export", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Export chapters"))
        .stdout(predicate::str::contains("--all"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_export_needs_chapter_or_all() {
    let data_dir = TempDir::new().unwrap();
    lectern(&data_dir)
        .args(["export", "bible"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_export_all_needs_output() {
    let data_dir = TempDir::new().unwrap();
    lectern(&data_dir)
        .args(["export", "bible", "--all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_export_invalid_jobs() {
    let data_dir = TempDir::new().unwrap();
    lectern(&data_dir)
        .args(["export", "bible", "--all", "--output", "out", "--jobs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_empty_catalog() {
    let data_dir = TempDir::new().unwrap();
    lectern(&data_dir)
        .arg("texts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No texts in the catalog"));
}

#[test]
fn test_import_nonexistent_file() {
    let data_dir = TempDir::new().unwrap();
    lectern(&data_dir)
        .args(["import", "/nonexistent/bible.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_import_invalid_structure() {
    let data_dir = TempDir::new().unwrap();
    let input = data_dir.path().join("bad.json");
    fs::write(&input, r#"{"metadata": {"title": "x"}}"#).unwrap();

    lectern(&data_dir)
        .args(["import", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid Bible data structure"));
}

#[test]
fn test_download_unknown_text() {
    let data_dir = TempDir::new().unwrap();
    lectern(&data_dir)
        .args(["download", "vedas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No download method available for book: vedas",
        ));
}

#[test]
fn test_imported_bible_is_listed() {
    let data_dir = imported_bible();

    lectern(&data_dir)
        .arg("texts")
        .assert()
        .success()
        .stdout(predicate::str::contains("bible"))
        .stdout(predicate::str::contains("Holy Bible"));

    lectern(&data_dir)
        .args(["chapters", "bible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Genesis"))
        .stdout(predicate::str::contains("[3 verses]"))
        .stdout(predicate::str::contains("Exodus"));
}

#[test]
fn test_export_chapter_to_stdout() {
    let data_dir = imported_bible();

    lectern(&data_dir)
        .args(["export", "bible", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "bible - Chapter 1\n=================\n\n",
        ))
        .stdout(predicate::str::contains(
            "Chapter 1, Verse 1:\nOriginal: In the beginning\nEnglish Translation: In the beginning\n",
        ))
        .stdout(predicate::str::contains("Chapter 1, Verse 3:\nOriginal: Thus the heavens"));
}

#[test]
fn test_export_json_file() {
    let data_dir = imported_bible();
    let output = data_dir.path().join("exodus.json");

    lectern(&data_dir)
        .args(["export", "bible", "2", "--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["title"], "bible - Chapter 2");
    assert_eq!(value["verses"].as_array().unwrap().len(), 1);
}

#[test]
fn test_export_all_chapters() {
    let data_dir = imported_bible();
    let out_dir = TempDir::new().unwrap();

    lectern(&data_dir)
        .args(["export", "bible", "--all", "--jobs", "2", "--output"])
        .arg(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Written: 2"));

    let genesis = fs::read_to_string(out_dir.path().join("bible_genesis.txt")).unwrap();
    assert!(genesis.starts_with("bible - Chapter 1\n"));
    assert!(out_dir.path().join("bible_exodus.txt").exists());
}

#[test]
fn test_export_missing_chapter() {
    let data_dir = imported_bible();
    lectern(&data_dir)
        .args(["export", "bible", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No verses found"));
}

#[test]
fn test_read_and_bookmark() {
    let data_dir = imported_bible();

    lectern(&data_dir)
        .args(["read", "bible", "--languages", "original,english"])
        .write_stdin("n\nb\nx\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("bible Genesis (1) 1/3"))
        .stdout(predicate::str::contains("bible Genesis (1) 2/3"))
        .stdout(predicate::str::contains("English Translation: And the earth was without form"))
        .stdout(predicate::str::contains("Bookmarked 1:2"))
        .stdout(predicate::str::contains("unknown command 'x'"))
        .stdout(predicate::str::contains("Malayalam").not());

    lectern(&data_dir)
        .args(["bookmarks", "bible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:2"))
        .stdout(predicate::str::contains("Genesis"));
}

#[test]
fn test_read_crosses_chapters() {
    let data_dir = imported_bible();

    lectern(&data_dir)
        .args(["read", "bible", "--chapter", "2"])
        .write_stdin("p\np\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("bible Exodus (2) 1/1"))
        .stdout(predicate::str::contains("bible Genesis (1) 3/3"))
        .stdout(predicate::str::contains("bible Genesis (1) 2/3"));
}

#[test]
fn test_read_unknown_text() {
    let data_dir = TempDir::new().unwrap();
    lectern(&data_dir)
        .args(["read", "nothing"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No verses found for 'nothing'"));
}

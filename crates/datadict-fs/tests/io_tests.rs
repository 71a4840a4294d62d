use datadict_fs::{NormalizedPath, io};
use fs2::FileExt;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("db_interactive/index.html"));

    io::write_atomic(&path, b"<html></html>").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "<html></html>");
}

#[test]
fn test_write_atomic_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("index.sync.json");
    fs::write(&file_path, "{\"old\": true}").unwrap();

    io::write_text(&NormalizedPath::new(&file_path), "{\"new\": true}").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "{\"new\": true}");
}

#[test]
fn test_write_atomic_leaves_target_unlocked() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("index.html"));

    io::write_atomic(&path, b"<html></html>").unwrap();

    let file = fs::File::open(path.to_native()).unwrap();
    FileExt::try_lock_exclusive(&file).unwrap();
    FileExt::unlock(&file).unwrap();
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("index.html"));

    io::write_atomic(&path, b"one").unwrap();
    io::write_atomic(&path, b"two").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {:?}", leftovers);
}

#[test]
fn test_write_atomic_into_directory_target_fails_and_cleans_up() {
    let temp = TempDir::new().unwrap();
    let dir_target = temp.path().join("occupied");
    fs::create_dir_all(dir_target.join("child")).unwrap();

    let result = io::write_atomic(&NormalizedPath::new(&dir_target), b"data");
    assert!(result.is_err());

    let leftovers = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_read_if_exists_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.html"));
    assert!(io::read_if_exists(&path).unwrap().is_none());
}

#[test]
fn test_read_if_exists_returns_bytes() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("present.html");
    fs::write(&file_path, "payload").unwrap();

    let bytes = io::read_if_exists(&NormalizedPath::new(&file_path)).unwrap();
    assert_eq!(bytes.as_deref(), Some(&b"payload"[..]));
}

#[test]
fn test_read_text_missing_is_error() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.txt"));
    assert!(io::read_text(&path).is_err());
}

use mapquill::config::EditorConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = EditorConfig::load_from(&dir.path().join("nope.toml"));
    assert_eq!(config, EditorConfig::default());
}

#[test]
fn test_load_from_reads_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "vertex_tolerance_px = 14.0\nshared_collection = false\n",
    )
    .unwrap();

    let config = EditorConfig::load_from(&path);
    assert_eq!(config.vertex_tolerance_px, 14.0);
    assert!(!config.shared_collection);
    // Unmentioned fields keep their defaults
    assert_eq!(config.hit_tolerance_px, 6.0);
}

#[test]
fn test_load_from_malformed_toml_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "vertex_tolerance_px = [this is not toml").unwrap();

    let config = EditorConfig::load_from(&path);
    assert_eq!(config, EditorConfig::default());
}

#[test]
fn test_load_from_wrong_types_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "vertex_tolerance_px = \"wide\"").unwrap();

    let config = EditorConfig::load_from(&path);
    assert_eq!(config, EditorConfig::default());
}

use gitrel::config::{
    find_config_file, load_config_file, load_config_from, Config, CONFIG_FILE_NAME,
    LEGACY_CONFIG_FILE_NAME,
};
use gitrel::git::MockRepository;
use gitrel::options::{CommandOptions, OptionOverrides};
use gitrel::GitrelError;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join(CONFIG_FILE_NAME);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_explicit_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "remote = \"upstream\"\nfetch = true\n").unwrap();

    let config = load_config_from(Some(&path), dir.path(), None).unwrap();

    assert_eq!(config.remote.as_deref(), Some("upstream"));
    assert_eq!(config.fetch, Some(true));
}

#[test]
fn test_explicit_config_file_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    let err = load_config_from(Some(&missing), dir.path(), None).unwrap_err();

    assert!(matches!(err, GitrelError::Config(_)));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_config_found_in_parent_directory() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "local-branch-name = \"v/%v\"\n");
    let nested = dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let found = find_config_file(&nested, None).unwrap();
    assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));

    let config = load_config_from(None, &nested, None).unwrap();
    assert_eq!(config.local_branch_name.as_deref(), Some("v/%v"));
}

#[test]
fn test_nearest_config_wins() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "remote = \"outer\"\n");
    let nested = dir.path().join("project");
    fs::create_dir_all(&nested).unwrap();
    write_config(&nested, "remote = \"inner\"\n");

    let config = load_config_from(None, &nested, None).unwrap();

    assert_eq!(config.remote.as_deref(), Some("inner"));
}

#[test]
fn test_home_config_used_as_fallback() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_config(home.path(), "remote-branch-name = \"rel/%v\"\n");

    let config = load_config_from(None, work.path(), Some(home.path())).unwrap();

    assert_eq!(config.remote_branch_name.as_deref(), Some("rel/%v"));
}

#[test]
fn test_legacy_rc_file_is_read() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(LEGACY_CONFIG_FILE_NAME),
        "FETCH=true\nREMOTE=upstream\nREMOTE_BRANCH_NAME=rel/%v\n",
    )
    .unwrap();

    let config = load_config_from(None, dir.path(), None).unwrap();

    assert_eq!(config.fetch, Some(true));
    assert_eq!(config.remote.as_deref(), Some("upstream"));
    assert_eq!(config.remote_branch_name.as_deref(), Some("rel/%v"));
}

#[test]
fn test_toml_preferred_over_rc_in_same_directory() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "remote = \"toml\"\n");
    fs::write(dir.path().join(LEGACY_CONFIG_FILE_NAME), "REMOTE=rc\n").unwrap();

    let found = find_config_file(dir.path(), None).unwrap();
    assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
}

#[test]
fn test_nearer_rc_file_beats_parent_toml() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "remote = \"outer\"\n");
    let nested = dir.path().join("project");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join(LEGACY_CONFIG_FILE_NAME), "REMOTE=inner\n").unwrap();

    let config = load_config_from(None, &nested, None).unwrap();

    assert_eq!(config.remote.as_deref(), Some("inner"));
}

#[test]
fn test_legacy_rc_file_in_home() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(LEGACY_CONFIG_FILE_NAME), "fetch=1\n").unwrap();

    let config = load_config_from(None, work.path(), Some(home.path())).unwrap();

    assert_eq!(config.fetch, Some(true));
}

#[test]
fn test_invalid_config_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "unknown-key = 1\n");

    let err = load_config_file(&path).unwrap_err();

    assert!(matches!(err, GitrelError::Config(_)));
    assert!(err.to_string().contains(CONFIG_FILE_NAME));
}

#[test]
fn test_config_feeds_option_resolution() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        "fetch = true\nremote = \"upstream\"\nlocal-branch-name = \"v/%v\"\n",
    );
    let config = load_config_file(&path).unwrap();
    let repo = MockRepository::new().with_remotes(["origin", "upstream"]);

    let options = CommandOptions::resolve(&OptionOverrides::default(), &config, &repo).unwrap();
    assert!(options.fetch);
    assert_eq!(options.remote, "upstream");
    assert_eq!(options.local_branch("1.0.0"), "v/1.0.0");
    assert_eq!(options.remote_branch("1.0.0"), "release/1.0.0");

    let overrides = OptionOverrides {
        fetch: Some(false),
        ..OptionOverrides::default()
    };
    let options = CommandOptions::resolve(&overrides, &config, &repo).unwrap();
    assert!(!options.fetch);
}

#[test]
fn test_invalid_pattern_in_config_rejected() {
    let config = Config {
        local_branch_name: Some("release".to_string()),
        ..Config::default()
    };
    let repo = MockRepository::new();

    let err = CommandOptions::resolve(&OptionOverrides::default(), &config, &repo).unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid branch name pattern 'release': expected exactly one %v placeholder"
    );
}

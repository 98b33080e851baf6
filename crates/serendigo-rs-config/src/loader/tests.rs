//! Tests for layered configuration loading.

use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options that only look inside the temp dir.
fn isolated_options(root: &Path, cwd: &Path) -> LayeredConfigOptions {
    LayeredConfigOptions {
        cwd: cwd.to_path_buf(),
        system_config_path: Some(root.join("system.json5")),
        user_config_path: Some(root.join("user.json5")),
        runtime_paths: Vec::new(),
    }
}

#[test]
fn parse_minimal_config() {
    let config = SerendigoConfig::load_from_str("{}").expect("config");
    assert_eq!(config.providers.timeout_secs, 10);
    assert_eq!(config.search.history_scan_limit, 100);
    assert_eq!(config.store.database_url, "sqlite://./serendigo.db");
    assert_eq!(config.guide.text_model, "gpt-4o-mini");
    assert_eq!(config.search.chain_brands, None);
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = SerendigoConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_unknown_nested_provider_key() {
    let err = SerendigoConfig::load_from_str(r#"{ providers: { google: { apikey: "x" } } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("providers.google.apikey"));
}

#[test]
fn rejects_wrong_field_type() {
    let err =
        SerendigoConfig::load_from_str(r#"{ providers: { timeout_secs: "ten" } }"#).unwrap_err();
    assert!(format!("{err}").contains("providers.timeout_secs"));
}

#[test]
fn rejects_zero_timeout() {
    let err = SerendigoConfig::load_from_str(r#"{ providers: { timeout_secs: 0 } }"#).unwrap_err();
    assert!(format!("{err}").contains("greater than zero"));
}

#[test]
fn accepts_null_api_keys_and_custom_brands() {
    let config = SerendigoConfig::load_from_str(
        r#"{
            // keys can be left explicit-null in checked-in configs
            providers: { google: { api_key: null } },
            search: { chain_brands: ["Starbucks", "ドトール"] },
        }"#,
    )
    .expect("config");
    assert_eq!(config.providers.google.api_key, None);
    assert_eq!(
        config.search.chain_brands,
        Some(vec!["Starbucks".to_string(), "ドトール".to_string()])
    );
}

#[test]
fn layered_config_applies_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let cwd = root.join("work");
    fs::create_dir_all(&cwd).expect("cwd");

    write_json5(
        &root.join("system.json5"),
        "{ providers: { timeout_secs: 3, language: \"en\" }, media: { root: \"/srv/media\" } }",
    );
    write_json5(&root.join("user.json5"), "{ providers: { timeout_secs: 5 } }");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ store: { database_url: \"sqlite://./cwd.db\" } }",
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, "{ providers: { timeout_secs: 7 } }");

    let options = isolated_options(root, &cwd).with_runtime_path(&runtime);
    let layered = SerendigoConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.layers.len(), 4);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::System);
    assert_eq!(layered.layers[3].source, ConfigLayerSource::Runtime);
    assert_eq!(layered.config.providers.timeout_secs, 7);
    assert_eq!(layered.config.providers.language, "en");
    assert_eq!(layered.config.media.root, "/srv/media");
    assert_eq!(layered.config.store.database_url, "sqlite://./cwd.db");
}

#[test]
fn missing_optional_layers_fall_back_to_defaults() {
    let temp = TempDir::new().expect("tmp");
    let layered =
        SerendigoConfig::load_layered_with_options(isolated_options(temp.path(), temp.path()))
            .expect("layered");
    assert!(layered.layers.is_empty());
    assert_eq!(layered.config.server.bind, "0.0.0.0:8000");
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path(), temp.path())
        .with_runtime_path(temp.path().join("absent.json5"));
    let err = SerendigoConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::Read { path, .. } if path.ends_with("absent.json5")));
}

#[test]
fn invalid_layer_names_its_source() {
    let temp = TempDir::new().expect("tmp");
    write_json5(&temp.path().join("user.json5"), "{ bogus: 1 }");
    let err =
        SerendigoConfig::load_layered_with_options(isolated_options(temp.path(), temp.path()))
            .unwrap_err();
    assert!(format!("{err}").contains("user("));
}

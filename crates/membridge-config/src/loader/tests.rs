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

/// Options rooted at a temp dir with no global layers.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    LayeredConfigOptions::new(cwd).without_global_layers()
}

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = MembridgeConfig::load_from_str("{}").expect("config");
    assert_eq!(config, MembridgeConfig::default());
    assert_eq!(config.search.default_limit, 5);
    assert!(config.vector_store.is_none());
}

/// The provider stack the bridge ships with parses into provider blocks.
#[test]
fn parse_provider_blocks() {
    let json5 = r#"{
        llm: { provider: "google", config: { model: "gemini-pro", temperature: 0.1 } },
        embedder: { provider: "jina", config: { dimensions: 1024 } },
        vector_store: { provider: "milvus", config: { collection_name: "memories" } },
    }"#;
    let config = MembridgeConfig::load_from_str(json5).expect("config");
    let store = config.vector_store.expect("vector store");
    assert_eq!(store.provider, "milvus");
    assert_eq!(store.setting_str("collection_name"), Some("memories"));
    assert_eq!(config.llm.expect("llm").provider, "google");
    assert_eq!(config.embedder.expect("embedder").config["dimensions"], 1024);
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = MembridgeConfig::load_from_str("{ unexpected: true }").unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

/// Reject provider blocks that do not name a provider.
#[test]
fn rejects_provider_without_name() {
    let err = MembridgeConfig::load_from_str("{ vector_store: { config: {} } }").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("vector_store.provider"));
    assert!(msg.contains("missing required field"));
}

/// A zero default limit is rejected by validation.
#[test]
fn rejects_zero_default_limit() {
    let err = MembridgeConfig::load_from_str("{ search: { default_limit: 0 } }").unwrap_err();
    assert!(format!("{err}").contains("search.default_limit"));
}

/// Negative limits fail schema validation.
#[test]
fn rejects_negative_default_limit() {
    let err = MembridgeConfig::load_from_str("{ search: { default_limit: -1 } }").unwrap_err();
    assert!(format!("{err}").contains("expected non-negative integer"));
}

/// Runtime layers override cwd layers, and partial layers merge into earlier ones.
#[test]
fn runtime_layer_overrides_cwd() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    fs::create_dir_all(&cwd).expect("cwd");

    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ vector_store: { provider: "milvus", config: { collection_name: "cwd" } } }"#,
    );
    let runtime = temp.path().join("runtime.json5");
    write_json5(
        &runtime,
        r#"{ vector_store: { config: { collection_name: "runtime" } }, search: { default_limit: 9 } }"#,
    );

    let layered =
        MembridgeConfig::load_layered_with_options(isolated_options(&cwd).with_runtime_path(&runtime))
            .expect("layered");

    let store = layered.config.vector_store.expect("store");
    assert_eq!(store.provider, "milvus");
    assert_eq!(store.setting_str("collection_name"), Some("runtime"));
    assert_eq!(layered.config.search.default_limit, 9);
    let sources: Vec<ConfigLayerSource> = layered.layers.iter().map(|l| l.source).collect();
    assert_eq!(sources, vec![ConfigLayerSource::Cwd, ConfigLayerSource::Runtime]);
}

/// The project layer sits below the cwd layer.
#[test]
fn project_layer_is_below_cwd() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    write_json5(
        &project_root.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE),
        r#"{ llm: { provider: "google" }, search: { default_limit: 3 } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ search: { default_limit: 7 } }"#,
    );

    let layered =
        MembridgeConfig::load_layered_with_options(isolated_options(&cwd)).expect("layered");
    assert_eq!(layered.config.search.default_limit, 7);
    assert_eq!(layered.config.llm.expect("llm").provider, "google");
    assert_eq!(layered.layers.len(), 2);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::Project);
}

/// User layers load from an explicit path and a cwd layer can disable a provider.
#[test]
fn later_layer_can_clear_provider() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    fs::create_dir_all(&cwd).expect("cwd");
    let user = temp.path().join("user.json5");
    write_json5(&user, r#"{ vector_store: { provider: "milvus" } }"#);
    write_json5(&cwd.join(DEFAULT_CONFIG_FILE), "{ vector_store: null }");

    let mut options = isolated_options(&cwd);
    options.user_config_path = Some(user);
    let layered = MembridgeConfig::load_layered_with_options(options).expect("layered");
    assert!(layered.config.vector_store.is_none());
    assert_eq!(layered.layers[0].source, ConfigLayerSource::User);
}

/// Missing runtime paths are an error rather than silently skipped.
#[test]
fn missing_runtime_layer_fails() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("missing.json5"));
    let err = MembridgeConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

/// Layer errors name the offending layer.
#[test]
fn invalid_layer_reports_label() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        r#"{ search: { limit: 3 } }"#,
    );
    let err = MembridgeConfig::load_layered_with_options(isolated_options(temp.path())).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("search.limit"));
}

//! Config file loading tests across formats

use lacuna_config::{
    AnchorIdStyle, ConfigError, ConfigLoader, PropertyKind, StubTypeDefinition, StubsConfig,
};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lacuna.toml");
    std::fs::write(
        &path,
        r#"
frontmatter_key = "gaps"

[anchors]
prefix = "gap"
id_style = "type-prefixed"
random_id_length = 8

[[stub_types]]
key = "cite"
display_name = "Citation"
sort_order = 1

[stub_types.default_properties]
priority = "high"

[[properties]]
key = "priority"
type = "enum"
values = ["low", "high"]

[[properties]]
key = "reviewed"
type = "boolean"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).await.unwrap();
    assert_eq!(config.frontmatter_key, "gaps");
    assert_eq!(config.anchors.prefix, "gap");
    assert_eq!(config.anchors.id_style, AnchorIdStyle::TypePrefixed);
    assert_eq!(config.anchors.random_id_length, 8);
    assert_eq!(config.stub_types.len(), 1);

    let cite = config.stub_type("cite").unwrap();
    assert_eq!(cite.display_name, "Citation");
    assert_eq!(cite.default_properties.get("priority"), Some(&json!("high")));

    assert_eq!(
        config.property("priority").unwrap().kind,
        PropertyKind::Enum {
            values: vec!["low".to_string(), "high".to_string()]
        }
    );
    assert_eq!(config.property("reviewed").unwrap().kind, PropertyKind::Boolean);
}

#[tokio::test]
async fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lacuna.yaml");
    std::fs::write(
        &path,
        "anchors:\n  prefix: todo\n  id_style: sequential\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).await.unwrap();
    assert_eq!(config.anchors.prefix, "todo");
    assert_eq!(config.anchors.id_style, AnchorIdStyle::Sequential);
    // Unmentioned sections keep their defaults
    assert_eq!(config.frontmatter_key, "stubs");
    assert_eq!(config.stub_types, StubsConfig::default().stub_types);
}

#[tokio::test]
async fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lacuna.json");
    std::fs::write(&path, r#"{"anchors": {"id_style": "type-only"}}"#).unwrap();

    let config = ConfigLoader::load_from_file(&path).await.unwrap();
    assert_eq!(config.anchors.id_style, AnchorIdStyle::TypeOnly);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_from_file(dir.path().join("missing.toml")).await;
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[tokio::test]
async fn test_malformed_toml_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "frontmatter_key = [unclosed").unwrap();

    let result = ConfigLoader::load_from_file(&path).await;
    assert!(matches!(result, Err(ConfigError::Parse { format: "toml", .. })));
}

#[tokio::test]
async fn test_load_or_default_with_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lacuna.toml");
    std::fs::write(&path, "frontmatter_key = \"open\"\n").unwrap();

    let config = ConfigLoader::load_or_default(Some(&path)).await.unwrap();
    assert_eq!(config.frontmatter_key, "open");
}

#[test]
fn test_toml_roundtrip_of_defaults() {
    let mut config = StubsConfig::default();
    config
        .stub_types
        .push(StubTypeDefinition::new("draft", "Draft", 7).with_default("inline", json!(true)));

    let toml_str = toml::to_string_pretty(&config).expect("serialize config");
    let back: StubsConfig = toml::from_str(&toml_str).expect("deserialize config");
    assert_eq!(config, back);
}

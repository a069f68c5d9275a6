//! Stub configuration types
//!
//! All sections implement `Default` and every field is `#[serde(default)]`, so a
//! config file only has to mention what it changes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};

/// Frontmatter keys that can never be a stub type key.
pub const RESERVED_ENTRY_KEYS: &[&str] = &["anchor", "description", "type"];

/// Root configuration consumed by the Lacuna core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubsConfig {
    /// Frontmatter key holding the stub array
    pub frontmatter_key: String,

    /// Known stub types, in display order
    pub stub_types: Vec<StubTypeDefinition>,

    /// Property schemas validated on every stub entry
    pub properties: Vec<PropertyDefinition>,

    /// Anchor token naming
    pub anchors: AnchorSettings,
}

impl Default for StubsConfig {
    fn default() -> Self {
        Self {
            frontmatter_key: "stubs".to_string(),
            stub_types: default_stub_types(),
            properties: default_properties(),
            anchors: AnchorSettings::default(),
        }
    }
}

/// A stub type in the user's vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StubTypeDefinition {
    /// Key used in frontmatter entries and type-only anchor tokens
    pub key: String,

    /// Human readable name
    #[serde(default)]
    pub display_name: String,

    /// Display color (CSS notation)
    #[serde(default)]
    pub color: Option<String>,

    /// Icon name
    #[serde(default)]
    pub icon: Option<String>,

    /// Position when sorting stubs by type (lower = earlier)
    #[serde(default)]
    pub sort_order: u32,

    /// Properties seeded into every stub of this type
    #[serde(default)]
    pub default_properties: Map<String, Value>,
}

impl StubTypeDefinition {
    /// Create a type with no defaults
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, sort_order: u32) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            color: None,
            icon: None,
            sort_order,
            default_properties: Map::new(),
        }
    }

    /// Attach a default property value
    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.default_properties.insert(key.into(), value);
        self
    }
}

/// Schema for one stub property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Property key as written in frontmatter
    pub key: String,

    /// Human readable name
    #[serde(default)]
    pub display_name: String,

    /// Expected value shape
    #[serde(flatten)]
    pub kind: PropertyKind,
}

impl PropertyDefinition {
    /// Create a property schema
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            kind,
        }
    }
}

/// Value shape accepted for a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyKind {
    /// Any string
    String,
    /// One string out of a fixed set
    Enum {
        /// Allowed values
        values: Vec<String>,
    },
    /// A list of values
    Array,
    /// true / false
    Boolean,
    /// Integer or float
    Number,
}

impl PropertyKind {
    /// Check whether a decoded value satisfies this kind
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            PropertyKind::String => value.is_string(),
            PropertyKind::Enum { values } => value
                .as_str()
                .map(|s| values.iter().any(|v| v == s))
                .unwrap_or(false),
            PropertyKind::Array => value.is_array(),
            PropertyKind::Boolean => value.is_boolean(),
            PropertyKind::Number => value.is_number(),
        }
    }

    /// Short name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Enum { .. } => "enum",
            PropertyKind::Array => "array",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Number => "number",
        }
    }
}

/// How new anchor ids are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorIdStyle {
    /// `^{prefix}-{random}`
    #[default]
    Random,
    /// `^{prefix}-{type}-{4 random chars}`
    TypePrefixed,
    /// `^{type}-{random}`, ignoring the configured prefix
    TypeOnly,
    /// `^{prefix}-{001, 002, ...}`
    Sequential,
}

/// Anchor naming settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorSettings {
    /// Prefix identifying tracked anchors (`^{prefix}-...`)
    pub prefix: String,

    /// Generation style for new ids
    pub id_style: AnchorIdStyle,

    /// Length of the random part for random and type-only styles
    pub random_id_length: usize,
}

impl Default for AnchorSettings {
    fn default() -> Self {
        Self {
            prefix: "stub".to_string(),
            id_style: AnchorIdStyle::Random,
            random_id_length: 6,
        }
    }
}

impl StubsConfig {
    /// Look up a stub type by key
    pub fn stub_type(&self, key: &str) -> Option<&StubTypeDefinition> {
        self.stub_types.iter().find(|t| t.key == key)
    }

    /// Whether `key` is part of the configured vocabulary
    pub fn is_known_type(&self, key: &str) -> bool {
        self.stub_type(key).is_some()
    }

    /// Look up a property schema by key
    pub fn property(&self, key: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Keys that can never be detected as a stub type key
    pub fn reserved_keys(&self) -> HashSet<&str> {
        RESERVED_ENTRY_KEYS
            .iter()
            .copied()
            .chain(self.properties.iter().map(|p| p.key.as_str()))
            .collect()
    }

    /// Whether `key` belongs to the reserved set
    pub fn is_reserved_key(&self, key: &str) -> bool {
        RESERVED_ENTRY_KEYS.contains(&key) || self.property(key).is_some()
    }

    /// Sort position of a type; unknown types sort last
    pub fn type_sort_order(&self, key: &str) -> u32 {
        self.stub_type(key).map(|t| t.sort_order).unwrap_or(u32::MAX)
    }

    /// Validate invariants the core relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.frontmatter_key.trim().is_empty() {
            return Err(ConfigError::invalid("frontmatter_key must not be empty"));
        }

        if !is_token_prefix(&self.anchors.prefix) {
            return Err(ConfigError::invalid(format!(
                "anchor prefix '{}' must start with letters and contain only letters, digits, '-' or '_'",
                self.anchors.prefix
            )));
        }

        if !(4..=32).contains(&self.anchors.random_id_length) {
            return Err(ConfigError::invalid(format!(
                "random_id_length must be between 4 and 32, got {}",
                self.anchors.random_id_length
            )));
        }

        let mut seen = HashSet::new();
        for stub_type in &self.stub_types {
            if !is_token_prefix(&stub_type.key) {
                return Err(ConfigError::invalid(format!(
                    "stub type key '{}' is not usable in anchor tokens",
                    stub_type.key
                )));
            }
            if RESERVED_ENTRY_KEYS.contains(&stub_type.key.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "stub type key '{}' is reserved",
                    stub_type.key
                )));
            }
            if !seen.insert(stub_type.key.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "duplicate stub type key '{}'",
                    stub_type.key
                )));
            }
        }

        for property in &self.properties {
            if let PropertyKind::Enum { values } = &property.kind {
                if values.is_empty() {
                    return Err(ConfigError::invalid(format!(
                        "enum property '{}' has no values",
                        property.key
                    )));
                }
            }
        }

        Ok(())
    }
}

/// `letters` or `letters-[A-Za-z0-9_-]*`: the shape anchor tokens start with.
fn is_token_prefix(s: &str) -> bool {
    let (head, tail) = match s.split_once('-') {
        Some((head, tail)) => (head, Some(tail)),
        None => (s, None),
    };
    !head.is_empty()
        && head.chars().all(|c| c.is_ascii_alphabetic())
        && tail.map_or(true, |t| {
            t.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

fn default_stub_types() -> Vec<StubTypeDefinition> {
    vec![
        StubTypeDefinition::new("link", "Citation needed", 0)
            .with_default("stub_form", Value::String("transient".to_string())),
        StubTypeDefinition::new("expand", "Needs expansion", 1),
        StubTypeDefinition::new("question", "Open question", 2),
        StubTypeDefinition::new("verify", "Needs verification", 3),
        StubTypeDefinition::new("source", "Source to read", 4),
        StubTypeDefinition::new("todo", "Todo", 5)
            .with_default("priority", Value::String("medium".to_string())),
    ]
}

fn default_properties() -> Vec<PropertyDefinition> {
    let strings = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    vec![
        PropertyDefinition::new(
            "priority",
            "Priority",
            PropertyKind::Enum {
                values: strings(&["low", "medium", "high", "critical"]),
            },
        ),
        PropertyDefinition::new(
            "stub_form",
            "Form",
            PropertyKind::Enum {
                values: strings(&["transient", "persistent", "blocking"]),
            },
        ),
        PropertyDefinition::new("assignees", "Assignees", PropertyKind::Array),
        PropertyDefinition::new("references", "References", PropertyKind::Array),
        PropertyDefinition::new("inline", "Inline", PropertyKind::Boolean),
        PropertyDefinition::new("effort", "Effort", PropertyKind::Number),
        PropertyDefinition::new("due", "Due", PropertyKind::String),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config_is_valid() {
        let config = StubsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frontmatter_key, "stubs");
        assert_eq!(config.anchors.prefix, "stub");
        assert_eq!(config.anchors.random_id_length, 6);
        assert!(config.is_known_type("link"));
        assert!(!config.is_known_type("unknown"));
    }

    #[test]
    fn test_reserved_keys_include_properties() {
        let config = StubsConfig::default();
        let reserved = config.reserved_keys();
        assert!(reserved.contains("anchor"));
        assert!(reserved.contains("description"));
        assert!(reserved.contains("priority"));
        assert!(!reserved.contains("link"));
        assert!(config.is_reserved_key("assignees"));
    }

    #[test]
    fn test_property_kind_accepts() {
        let priority = PropertyKind::Enum {
            values: vec!["low".into(), "high".into()],
        };
        assert!(priority.accepts(&json!("low")));
        assert!(!priority.accepts(&json!("urgent")));
        assert!(!priority.accepts(&json!(1)));

        assert!(PropertyKind::String.accepts(&json!("x")));
        assert!(PropertyKind::Array.accepts(&json!(["a"])));
        assert!(!PropertyKind::Array.accepts(&json!("a")));
        assert!(PropertyKind::Boolean.accepts(&json!(false)));
        assert!(PropertyKind::Number.accepts(&json!(2.5)));
        assert!(!PropertyKind::Number.accepts(&json!("2.5")));
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        let mut config = StubsConfig::default();
        config.anchors.prefix = "stub2".to_string();
        assert!(config.validate().is_err());

        config.anchors.prefix = String::new();
        assert!(config.validate().is_err());

        config.anchors.prefix = "my-stub".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_types() {
        let mut config = StubsConfig::default();
        config
            .stub_types
            .push(StubTypeDefinition::new("link", "Again", 9));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate stub type key 'link'"));
    }

    #[test]
    fn test_validate_rejects_reserved_type_key() {
        let mut config = StubsConfig::default();
        config
            .stub_types
            .push(StubTypeDefinition::new("anchor", "Anchor", 9));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_enum() {
        let mut config = StubsConfig::default();
        config.properties.push(PropertyDefinition::new(
            "status",
            "Status",
            PropertyKind::Enum { values: vec![] },
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_random_length_bounds() {
        let mut config = StubsConfig::default();
        config.anchors.random_id_length = 3;
        assert!(config.validate().is_err());
        config.anchors.random_id_length = 32;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_type_sort_order_unknown_last() {
        let config = StubsConfig::default();
        assert_eq!(config.type_sort_order("link"), 0);
        assert_eq!(config.type_sort_order("nope"), u32::MAX);
    }

    #[test]
    fn test_type_defaults() {
        let config = StubsConfig::default();
        let todo = config.stub_type("todo").unwrap();
        assert_eq!(todo.default_properties.get("priority"), Some(&json!("medium")));
    }
}

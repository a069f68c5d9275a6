//! Structured entry parser
//!
//! Turns the decoded value stored under the configured frontmatter key into typed
//! [`Stub`] records. Three entry encodings are accepted, tried in this order:
//!
//! ```yaml
//! stubs:
//!   - type: link                # explicit
//!     description: "cite x"
//!   - link: "cite x"            # compact
//!     anchor: "^stub-ab12cd"
//!   - link:                     # structured
//!       description: "cite x"
//!       priority: high
//! ```
//!
//! Entries are parsed independently. A broken entry produces an error for its own
//! index and never aborts its siblings, since documents are often mid-edit.

use lacuna_config::StubsConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::frontmatter::value_kind;
use crate::types::{Stub, StubSyntax};

pub(crate) const TYPE_KEY: &str = "type";
pub(crate) const DESCRIPTION_KEY: &str = "description";
pub(crate) const ANCHOR_KEY: &str = "anchor";

/// Why an entry (or the whole value) was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// The value under the frontmatter key is not an array
    InvalidFormat,
    /// Not an object, no detectable type key, or a type key with the wrong shape
    InvalidEntry,
    /// No usable description
    MissingDescription,
}

/// A problem that dropped data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubParseError {
    /// Category
    pub kind: ParseErrorKind,
    /// Entry index; `None` for problems with the whole value
    pub index: Option<usize>,
    /// Human readable description
    pub message: String,
}

impl StubParseError {
    fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            index: None,
            message: message.into(),
        }
    }

    fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Why an entry was kept with caveats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseWarningKind {
    /// Type key outside the configured vocabulary
    UnknownType,
    /// Property without a schema; value kept as-is
    UnknownProperty,
    /// Property value rejected by its schema; value dropped
    InvalidPropertyValue,
}

/// A problem that did not drop the entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubParseWarning {
    /// Category
    pub kind: ParseWarningKind,
    /// Entry index
    pub index: usize,
    /// Offending key, if the warning concerns one
    pub key: Option<String>,
    /// Human readable description
    pub message: String,
}

/// Output of [`parse_stubs`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StubParseResult {
    /// Entries that survived
    pub stubs: Vec<Stub>,
    /// Dropped entries
    pub errors: Vec<StubParseError>,
    /// Kept entries with caveats
    pub warnings: Vec<StubParseWarning>,
}

/// One array entry, classified by encoding.
///
/// Produced by [`classify_entry`]; adding an encoding means adding a variant here,
/// and every match below has to handle it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryEncoding<'a> {
    /// String `type` + string `description`; other keys are properties
    Explicit {
        /// Stub type
        stub_type: &'a str,
        /// Description
        description: &'a str,
        /// The whole entry object
        fields: &'a Map<String, Value>,
    },
    /// `{<type>: "<description>", anchor: ...}`
    Compact {
        /// Detected type key
        stub_type: &'a str,
        /// Value of the type key
        description: &'a str,
        /// The whole entry object
        fields: &'a Map<String, Value>,
    },
    /// `{<type>: {description: ..., anchor: ..., ...}}`
    Structured {
        /// Detected type key
        stub_type: &'a str,
        /// Object under the type key
        body: &'a Map<String, Value>,
        /// The whole entry object
        fields: &'a Map<String, Value>,
    },
}

impl EntryEncoding<'_> {
    /// The syntax tag recorded on the resulting stub
    pub fn syntax(&self) -> StubSyntax {
        match self {
            EntryEncoding::Explicit { .. } => StubSyntax::Explicit,
            EntryEncoding::Compact { .. } => StubSyntax::Compact,
            EntryEncoding::Structured { .. } => StubSyntax::Structured,
        }
    }

    /// The stub type key
    pub fn stub_type(&self) -> &str {
        match self {
            EntryEncoding::Explicit { stub_type, .. }
            | EntryEncoding::Compact { stub_type, .. }
            | EntryEncoding::Structured { stub_type, .. } => stub_type,
        }
    }
}

/// Find the key naming the stub type: the first key in the configured vocabulary,
/// otherwise the first key outside the reserved set.
pub fn detect_type_key<'a>(entry: &'a Map<String, Value>, config: &StubsConfig) -> Option<&'a str> {
    let reserved = config.reserved_keys();
    entry
        .keys()
        .find(|k| config.is_known_type(k))
        .or_else(|| entry.keys().find(|k| !reserved.contains(k.as_str())))
        .map(String::as_str)
}

/// Classify an entry into one of the three encodings
pub fn classify_entry<'a>(
    entry: &'a Value,
    config: &StubsConfig,
) -> Result<EntryEncoding<'a>, StubParseError> {
    let Value::Object(fields) = entry else {
        return Err(StubParseError::new(
            ParseErrorKind::InvalidEntry,
            format!("entry must be a mapping, found {}", value_kind(entry)),
        ));
    };

    if let (Some(Value::String(stub_type)), Some(Value::String(description))) =
        (fields.get(TYPE_KEY), fields.get(DESCRIPTION_KEY))
    {
        return Ok(EntryEncoding::Explicit {
            stub_type,
            description,
            fields,
        });
    }

    let Some(stub_type) = detect_type_key(fields, config) else {
        return Err(match fields.get(TYPE_KEY) {
            Some(Value::String(stub_type)) => StubParseError::new(
                ParseErrorKind::MissingDescription,
                format!("explicit '{stub_type}' entry has no string description"),
            ),
            _ => StubParseError::new(ParseErrorKind::InvalidEntry, "entry has no stub type key"),
        });
    };

    match &fields[stub_type] {
        Value::String(description) => Ok(EntryEncoding::Compact {
            stub_type,
            description,
            fields,
        }),
        Value::Object(body) => Ok(EntryEncoding::Structured {
            stub_type,
            body,
            fields,
        }),
        other => Err(StubParseError::new(
            ParseErrorKind::InvalidEntry,
            format!(
                "'{stub_type}' must hold a description string or a mapping, found {}",
                value_kind(other)
            ),
        )),
    }
}

/// Parse the decoded value found under the configured frontmatter key
pub fn parse_stubs(value: Option<&Value>, config: &StubsConfig) -> StubParseResult {
    let mut result = StubParseResult::default();

    let entries = match value {
        None | Some(Value::Null) => return result,
        Some(Value::String(s)) if s.trim().is_empty() => return result,
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            result.errors.push(StubParseError::new(
                ParseErrorKind::InvalidFormat,
                format!(
                    "'{}' must be an array, found {}",
                    config.frontmatter_key,
                    value_kind(other)
                ),
            ));
            return result;
        }
    };

    for (index, entry) in entries.iter().enumerate() {
        let parsed = classify_entry(entry, config)
            .and_then(|encoding| build_stub(encoding, index, config, &mut result.warnings));
        match parsed {
            Ok(stub) => result.stubs.push(stub),
            Err(err) => {
                debug!(index, error = %err.message, "Dropping stub entry");
                result.errors.push(err.at(index));
            }
        }
    }

    debug!(
        stubs = result.stubs.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Parsed stub entries"
    );
    result
}

/// Look up the configured key in a decoded frontmatter mapping and parse it
pub fn parse_frontmatter_stubs(frontmatter: &Map<String, Value>, config: &StubsConfig) -> StubParseResult {
    parse_stubs(frontmatter.get(&config.frontmatter_key), config)
}

fn build_stub(
    encoding: EntryEncoding<'_>,
    index: usize,
    config: &StubsConfig,
    warnings: &mut Vec<StubParseWarning>,
) -> Result<Stub, StubParseError> {
    let stub_type = encoding.stub_type();

    // (description, anchor source, property candidates)
    let (description, anchor_value, extra): (&str, Option<&Value>, Vec<(&String, &Value)>) =
        match encoding {
            EntryEncoding::Explicit {
                description,
                fields,
                ..
            } => (
                description,
                fields.get(ANCHOR_KEY),
                fields
                    .iter()
                    .filter(|(k, _)| !matches!(k.as_str(), TYPE_KEY | DESCRIPTION_KEY | ANCHOR_KEY))
                    .collect(),
            ),
            EntryEncoding::Compact {
                description,
                fields,
                ..
            } => (
                description,
                fields.get(ANCHOR_KEY),
                fields
                    .iter()
                    .filter(|(k, _)| k.as_str() != stub_type && k.as_str() != ANCHOR_KEY)
                    .collect(),
            ),
            EntryEncoding::Structured { body, fields, .. } => {
                let description = match body.get(DESCRIPTION_KEY) {
                    Some(Value::String(d)) => d.as_str(),
                    _ => {
                        return Err(StubParseError::new(
                            ParseErrorKind::MissingDescription,
                            format!("structured '{stub_type}' entry has no string description"),
                        ))
                    }
                };
                let anchor = body.get(ANCHOR_KEY).or_else(|| fields.get(ANCHOR_KEY));
                let extra = body
                    .iter()
                    .filter(|(k, _)| !matches!(k.as_str(), DESCRIPTION_KEY | ANCHOR_KEY))
                    .chain(
                        fields
                            .iter()
                            .filter(|(k, _)| k.as_str() != stub_type && k.as_str() != ANCHOR_KEY),
                    )
                    .collect();
                (description, anchor, extra)
            }
        };

    if description.trim().is_empty() {
        return Err(StubParseError::new(
            ParseErrorKind::MissingDescription,
            format!("'{stub_type}' entry has an empty description"),
        ));
    }

    let mut stub_warnings = Vec::new();
    let mut warn = |kind: ParseWarningKind, key: Option<&str>, message: String| {
        stub_warnings.push(message.clone());
        warnings.push(StubParseWarning {
            kind,
            index,
            key: key.map(str::to_string),
            message,
        });
    };

    let type_definition = config.stub_type(stub_type);
    if type_definition.is_none() {
        warn(
            ParseWarningKind::UnknownType,
            Some(stub_type),
            format!("unknown stub type '{stub_type}'"),
        );
    }

    let anchor = match normalize_anchor(anchor_value) {
        Ok(anchor) => anchor,
        Err(kind) => {
            warn(
                ParseWarningKind::InvalidPropertyValue,
                Some(ANCHOR_KEY),
                format!("anchor must be a string, found {kind}; ignoring it"),
            );
            None
        }
    };

    let mut properties = type_definition
        .map(|t| t.default_properties.clone())
        .unwrap_or_default();

    for (key, value) in extra {
        match config.property(key) {
            Some(definition) if definition.kind.accepts(value) => {
                properties.insert(key.clone(), value.clone());
            }
            Some(definition) => warn(
                ParseWarningKind::InvalidPropertyValue,
                Some(key),
                format!(
                    "property '{key}' expects {}, found {}; value dropped",
                    definition.kind.name(),
                    value_kind(value)
                ),
            ),
            None => {
                warn(
                    ParseWarningKind::UnknownProperty,
                    Some(key),
                    format!("unknown property '{key}'"),
                );
                properties.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(Stub {
        id: Stub::compute_id(stub_type, description, index),
        stub_type: stub_type.to_string(),
        description: description.to_string(),
        anchor,
        anchor_resolved: false,
        properties,
        syntax: encoding.syntax(),
        warnings: stub_warnings,
        index,
    })
}

/// Normalise an anchor value to carry a leading `^`. Empty means no anchor.
fn normalize_anchor(value: Option<&Value>) -> Result<Option<String>, &'static str> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() || s == "^" {
                Ok(None)
            } else if s.starts_with('^') {
                Ok(Some(s.to_string()))
            } else {
                Ok(Some(format!("^{s}")))
            }
        }
        Some(other) => Err(value_kind(other)),
    }
}

/// Serialize stub fields back into a frontmatter entry.
///
/// Compact when there are no properties, structured otherwise, explicit when the
/// type key would not be detected as a type key.
pub fn build_entry(
    stub_type: &str,
    description: &str,
    anchor: Option<&str>,
    properties: &Map<String, Value>,
    config: &StubsConfig,
) -> Value {
    let mut entry = Map::new();

    if config.is_reserved_key(stub_type) {
        entry.insert(TYPE_KEY.to_string(), Value::String(stub_type.to_string()));
        entry.insert(DESCRIPTION_KEY.to_string(), Value::String(description.to_string()));
        if let Some(anchor) = anchor {
            entry.insert(ANCHOR_KEY.to_string(), Value::String(anchor.to_string()));
        }
        entry.extend(properties.clone());
    } else if properties.is_empty() {
        entry.insert(stub_type.to_string(), Value::String(description.to_string()));
        if let Some(anchor) = anchor {
            entry.insert(ANCHOR_KEY.to_string(), Value::String(anchor.to_string()));
        }
    } else {
        let mut body = Map::new();
        body.insert(DESCRIPTION_KEY.to_string(), Value::String(description.to_string()));
        if let Some(anchor) = anchor {
            body.insert(ANCHOR_KEY.to_string(), Value::String(anchor.to_string()));
        }
        body.extend(properties.clone());
        entry.insert(stub_type.to_string(), Value::Object(body));
    }

    Value::Object(entry)
}

/// Serialize a parsed stub back into an entry, omitting values equal to its type defaults
pub fn stub_to_entry(stub: &Stub, config: &StubsConfig) -> Value {
    let defaults = config.stub_type(&stub.stub_type).map(|t| &t.default_properties);
    let explicit: Map<String, Value> = stub
        .properties
        .iter()
        .filter(|(k, v)| defaults.and_then(|d| d.get(*k)) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    build_entry(
        &stub.stub_type,
        &stub.description,
        stub.anchor.as_deref(),
        &explicit,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> StubsConfig {
        StubsConfig::default()
    }

    #[test]
    fn test_missing_or_empty_value() {
        let config = config();
        assert_eq!(parse_stubs(None, &config), StubParseResult::default());
        assert_eq!(parse_stubs(Some(&Value::Null), &config), StubParseResult::default());
        assert_eq!(parse_stubs(Some(&json!([])), &config), StubParseResult::default());
        assert_eq!(parse_stubs(Some(&json!("")), &config), StubParseResult::default());
    }

    #[test]
    fn test_non_array_is_invalid_format() {
        let result = parse_stubs(Some(&json!({"link": "x"})), &config());
        assert!(result.stubs.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::InvalidFormat);
        assert_eq!(result.errors[0].index, None);
    }

    #[test]
    fn test_explicit_entry() {
        let value = json!([{"type": "link", "description": "cite x", "anchor": "^link-ab12", "priority": "high"}]);
        let result = parse_stubs(Some(&value), &config());
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());

        let stub = &result.stubs[0];
        assert_eq!(stub.syntax, StubSyntax::Explicit);
        assert_eq!(stub.stub_type, "link");
        assert_eq!(stub.description, "cite x");
        assert_eq!(stub.anchor.as_deref(), Some("^link-ab12"));
        assert_eq!(stub.properties.get("priority"), Some(&json!("high")));
        // seeded from the type defaults
        assert_eq!(stub.properties.get("stub_form"), Some(&json!("transient")));
        assert!(!stub.properties.contains_key("type"));
    }

    #[test]
    fn test_compact_entry() {
        let value = json!([{"link": "cite x", "anchor": "^link-ab12"}]);
        let result = parse_stubs(Some(&value), &config());
        let stub = &result.stubs[0];
        assert_eq!(stub.syntax, StubSyntax::Compact);
        assert_eq!(stub.stub_type, "link");
        assert_eq!(stub.description, "cite x");
        assert_eq!(stub.anchor.as_deref(), Some("^link-ab12"));
        assert!(!stub.properties.contains_key("anchor"));
    }

    #[test]
    fn test_structured_entry() {
        let value = json!([{"todo": {"description": "write intro", "anchor": "stub-a1", "priority": "low", "assignees": ["sam"]}}]);
        let result = parse_stubs(Some(&value), &config());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        let stub = &result.stubs[0];
        assert_eq!(stub.syntax, StubSyntax::Structured);
        assert_eq!(stub.anchor.as_deref(), Some("^stub-a1"));
        // explicit value overrides the type default
        assert_eq!(stub.property_str("priority"), Some("low"));
        assert_eq!(stub.properties.get("assignees"), Some(&json!(["sam"])));
    }

    #[test]
    fn test_structured_missing_description() {
        let value = json!([{"todo": {"priority": "low"}}, {"link": "ok"}]);
        let result = parse_stubs(Some(&value), &config());
        assert_eq!(result.stubs.len(), 1);
        assert_eq!(result.stubs[0].index, 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::MissingDescription);
        assert_eq!(result.errors[0].index, Some(0));
    }

    #[test]
    fn test_explicit_type_without_description() {
        let value = json!([{"type": "link", "anchor": "^stub-1"}]);
        let result = parse_stubs(Some(&value), &config());
        assert!(result.stubs.is_empty());
        assert_eq!(result.errors[0].kind, ParseErrorKind::MissingDescription);
    }

    #[test]
    fn test_explicit_type_falls_through_to_compact() {
        let value = json!([{"type": "link", "todo": "write intro"}]);
        let result = parse_stubs(Some(&value), &config());
        assert!(result.errors.is_empty());
        assert_eq!(result.stubs.len(), 1);
        let stub = &result.stubs[0];
        assert_eq!(stub.syntax, StubSyntax::Compact);
        assert_eq!(stub.stub_type, "todo");
        assert_eq!(stub.description, "write intro");
    }

    #[test]
    fn test_empty_description_dropped() {
        let value = json!([{"link": "   "}]);
        let result = parse_stubs(Some(&value), &config());
        assert!(result.stubs.is_empty());
        assert_eq!(result.errors[0].kind, ParseErrorKind::MissingDescription);
    }

    #[test]
    fn test_non_object_entry_is_invalid() {
        let value = json!(["just a string", 42, {"link": "ok"}]);
        let result = parse_stubs(Some(&value), &config());
        assert_eq!(result.stubs.len(), 1);
        assert_eq!(result.errors.len(), 2);
        assert!(result
            .errors
            .iter()
            .all(|e| e.kind == ParseErrorKind::InvalidEntry));
        assert_eq!(result.errors[1].index, Some(1));
    }

    #[test]
    fn test_no_type_key_is_invalid_entry() {
        let value = json!([{"anchor": "^stub-1", "priority": "high"}]);
        let result = parse_stubs(Some(&value), &config());
        assert_eq!(result.errors[0].kind, ParseErrorKind::InvalidEntry);
    }

    #[test]
    fn test_property_keys_are_never_the_type() {
        let value = json!([{"priority": "high", "idea": "maybe a chart"}]);
        let result = parse_stubs(Some(&value), &config());
        let stub = &result.stubs[0];
        assert_eq!(stub.stub_type, "idea");
        assert_eq!(stub.property_str("priority"), Some("high"));
    }

    #[test]
    fn test_type_key_wrong_shape() {
        let value = json!([{"link": ["a", "b"]}]);
        let result = parse_stubs(Some(&value), &config());
        assert_eq!(result.errors[0].kind, ParseErrorKind::InvalidEntry);
    }

    #[test]
    fn test_unknown_type_kept_with_warning() {
        let value = json!([{"idea": "maybe a chart"}]);
        let result = parse_stubs(Some(&value), &config());
        assert_eq!(result.stubs.len(), 1);
        assert_eq!(result.stubs[0].stub_type, "idea");
        assert_eq!(result.warnings[0].kind, ParseWarningKind::UnknownType);
        assert_eq!(result.stubs[0].warnings.len(), 1);
    }

    #[test]
    fn test_configured_type_wins_over_earlier_unknown_key() {
        let value = json!([{"note": "extra", "link": "cite x"}]);
        let result = parse_stubs(Some(&value), &config());
        let stub = &result.stubs[0];
        assert_eq!(stub.stub_type, "link");
        assert_eq!(stub.description, "cite x");
        // the other key becomes an unknown property
        assert_eq!(stub.properties.get("note"), Some(&json!("extra")));
        assert_eq!(result.warnings[0].kind, ParseWarningKind::UnknownProperty);
    }

    #[test]
    fn test_invalid_property_value_dropped() {
        let value = json!([{"link": {"description": "x", "priority": "urgent", "inline": "yes"}}]);
        let result = parse_stubs(Some(&value), &config());
        let stub = &result.stubs[0];
        assert!(!stub.properties.contains_key("priority"));
        assert!(!stub.properties.contains_key("inline"));
        assert_eq!(result.warnings.len(), 2);
        assert!(result
            .warnings
            .iter()
            .all(|w| w.kind == ParseWarningKind::InvalidPropertyValue));
    }

    #[test]
    fn test_non_string_anchor_ignored() {
        let value = json!([{"link": "x", "anchor": 12}]);
        let result = parse_stubs(Some(&value), &config());
        assert_eq!(result.stubs[0].anchor, None);
        assert_eq!(result.warnings[0].key.as_deref(), Some("anchor"));
    }

    #[test]
    fn test_failures_do_not_abort_siblings() {
        let value = json!([
            {"link": "first"},
            "broken",
            {"todo": {}},
            {"question": "last", "anchor": "^stub-q1"}
        ]);
        let result = parse_stubs(Some(&value), &config());
        assert_eq!(result.stubs.len(), 2);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.stubs[1].index, 3);
    }

    #[test]
    fn test_classify_precedence() {
        let config = config();
        let explicit = json!({"type": "link", "description": "x", "todo": "y"});
        assert_eq!(
            classify_entry(&explicit, &config).unwrap().syntax(),
            StubSyntax::Explicit
        );

        let compact = json!({"todo": "y"});
        assert_eq!(
            classify_entry(&compact, &config).unwrap().syntax(),
            StubSyntax::Compact
        );

        let structured = json!({"todo": {"description": "y"}});
        assert_eq!(
            classify_entry(&structured, &config).unwrap().syntax(),
            StubSyntax::Structured
        );
    }

    #[test]
    fn test_build_entry_shapes() {
        let config = config();
        let compact = build_entry("link", "cite x", Some("^stub-1"), &Map::new(), &config);
        assert_eq!(compact, json!({"link": "cite x", "anchor": "^stub-1"}));

        let mut props = Map::new();
        props.insert("priority".to_string(), json!("high"));
        let structured = build_entry("link", "cite x", None, &props, &config);
        assert_eq!(
            structured,
            json!({"link": {"description": "cite x", "priority": "high"}})
        );

        let explicit = build_entry("priority", "odd type", None, &Map::new(), &config);
        assert_eq!(explicit, json!({"type": "priority", "description": "odd type"}));
    }

    #[test]
    fn test_stub_to_entry_roundtrip() {
        let config = config();
        let value = json!([
            {"link": "cite x", "anchor": "^link-ab12"},
            {"todo": {"description": "write", "priority": "high"}},
            {"type": "question", "description": "why?", "effort": 3}
        ]);
        let first = parse_stubs(Some(&value), &config);

        let reserialized = Value::Array(first.stubs.iter().map(|s| stub_to_entry(s, &config)).collect());
        let second = parse_stubs(Some(&reserialized), &config);

        assert_eq!(first.stubs.len(), second.stubs.len());
        for (a, b) in first.stubs.iter().zip(&second.stubs) {
            assert_eq!(a.stub_type, b.stub_type);
            assert_eq!(a.description, b.description);
            assert_eq!(a.anchor, b.anchor);
            assert_eq!(a.properties, b.properties);
        }
    }
}

//! Document mutations
//!
//! Adding and updating entries goes through [`Document::transform_frontmatter`].
//! Appending one array element is harmless for the re-encoder, and an update
//! rewrites only the targeted element's value. Removal uses text surgery from
//! [`crate::surgery`] so the rest of the block keeps its formatting.
//!
//! Operations whose target cannot be found are no-ops returning `Ok(false)`: the
//! user may already have fixed the inconsistency by hand.

use lacuna_config::StubsConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::anchors::{anchor_tokens, generate_anchor_id};
use crate::document::{transform_frontmatter_text, Document};
use crate::entries::{
    build_entry, parse_frontmatter_stubs, ANCHOR_KEY, DESCRIPTION_KEY, TYPE_KEY,
};
use crate::error::{LacunaError, Result};
use crate::frontmatter::value_kind;
use crate::surgery::{
    convert_anchor_to_plain, insert_anchor_at_line, remove_anchor_from_text, remove_entry_from_text,
    with_caret, StubLocator,
};
use crate::sync::perform_sync;
use crate::types::{Anchor, Stub, StubSyntax};

/// Fields of a stub entry to append
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStub {
    /// Stub type key
    pub stub_type: String,
    /// Non-empty description
    pub description: String,
    /// Anchor token, with or without the leading `^`
    pub anchor: Option<String>,
    /// Explicit properties
    pub properties: Map<String, Value>,
}

impl NewStub {
    /// Unanchored stub without properties
    pub fn new(stub_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            stub_type: stub_type.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Attach an anchor token
    pub fn with_anchor(mut self, token: impl AsRef<str>) -> Self {
        self.anchor = Some(with_caret(token.as_ref()));
        self
    }

    /// Set one property
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.stub_type.trim().is_empty() {
            return Err(LacunaError::invalid_argument("stub type must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(LacunaError::invalid_argument("stub description must not be empty"));
        }
        Ok(())
    }
}

/// Changes applied to one existing entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StubUpdate {
    /// New description
    pub description: Option<String>,
    /// `Some(None)` clears the anchor
    pub anchor: Option<Option<String>>,
    /// Properties to set or overwrite
    pub set_properties: Map<String, Value>,
    /// Properties to drop
    pub remove_properties: Vec<String>,
}

impl StubUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.anchor.is_none()
            && self.set_properties.is_empty()
            && self.remove_properties.is_empty()
    }

    /// Edit an entry in place, keeping the encoding it was written in
    fn apply_to_entry(&self, fields: &mut Map<String, Value>, stub: &Stub) {
        let description = self.description.clone().map(Value::String);
        let anchor = self.anchor.as_ref().map(|a| a.as_deref().map(with_caret));
        let is_property =
            |k: &str| !matches!(k, TYPE_KEY | DESCRIPTION_KEY | ANCHOR_KEY) && k != stub.stub_type;
        let removed: Vec<&String> = self.remove_properties.iter().filter(|k| is_property(k)).collect();

        for key in &removed {
            fields.shift_remove(key.as_str());
        }

        // Fields that hold description, anchor and new properties
        let target = match stub.syntax {
            StubSyntax::Explicit => {
                if let Some(description) = description {
                    fields.insert(DESCRIPTION_KEY.to_string(), description);
                }
                fields
            }
            StubSyntax::Compact => {
                if let Some(description) = description {
                    fields.insert(stub.stub_type.clone(), description);
                }
                fields
            }
            StubSyntax::Structured => {
                if anchor.is_some() {
                    fields.shift_remove(ANCHOR_KEY);
                }
                let Some(Value::Object(body)) = fields.get_mut(&stub.stub_type) else {
                    return;
                };
                for key in &removed {
                    body.shift_remove(key.as_str());
                }
                if let Some(description) = description {
                    body.insert(DESCRIPTION_KEY.to_string(), description);
                }
                body
            }
        };

        match anchor {
            Some(Some(token)) => {
                target.insert(ANCHOR_KEY.to_string(), Value::String(token));
            }
            Some(None) => {
                target.shift_remove(ANCHOR_KEY);
            }
            None => {}
        }
        target.extend(
            self.set_properties
                .iter()
                .filter(|(k, _)| is_property(k))
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }
}

/// Append an entry to the stub array, creating the frontmatter block and the
/// array when they are missing.
pub async fn add_stub(doc: &dyn Document, config: &StubsConfig, stub: &NewStub) -> Result<()> {
    stub.validate()?;

    let entry = new_entry(stub, config);
    let key = &config.frontmatter_key;
    let mut conflict: Option<&'static str> = None;
    doc.transform_frontmatter(&mut |map| conflict = push_entry(map, key, &entry))
        .await?;
    if let Some(kind) = conflict {
        return Err(not_an_array(key, kind));
    }

    info!(stub_type = %stub.stub_type, anchor = ?stub.anchor, "Added stub entry");
    Ok(())
}

/// Insert a fresh anchor at a 0-based document line and add an entry pointing at it.
///
/// The generated token avoids every token already in the body or referenced by an
/// entry. Both edits land in a single write; on error the document is untouched.
/// Returns the token.
pub async fn add_anchored_stub(
    doc: &dyn Document,
    config: &StubsConfig,
    mut stub: NewStub,
    line: usize,
) -> Result<String> {
    stub.validate()?;

    let content = doc.read().await?;
    let state = perform_sync(&content, config);
    let mut existing = anchor_tokens(&state.anchors);
    existing.extend(state.stubs.iter().filter_map(|s| s.anchor.clone()));

    let token = generate_anchor_id(&stub.stub_type, &existing, &config.anchors);
    let anchored = insert_anchor_at_line(&content, line, &token)
        .ok_or_else(|| LacunaError::invalid_argument(format!("line {line} is not a body line")))?;

    stub.anchor = Some(token.clone());
    let entry = new_entry(&stub, config);
    let key = &config.frontmatter_key;
    let mut conflict: Option<&'static str> = None;
    let updated = transform_frontmatter_text(&anchored, &mut |map| {
        conflict = push_entry(map, key, &entry)
    })?;
    if let Some(kind) = conflict {
        return Err(not_an_array(key, kind));
    }

    doc.write(updated.as_deref().unwrap_or(&anchored)).await?;
    info!(stub_type = %stub.stub_type, %token, line, "Added anchored stub");
    Ok(token)
}

fn new_entry(stub: &NewStub, config: &StubsConfig) -> Value {
    let anchor = stub.anchor.as_deref().map(with_caret);
    build_entry(
        &stub.stub_type,
        &stub.description,
        anchor.as_deref(),
        &stub.properties,
        config,
    )
}

/// Push `entry` onto the `key` array. Returns the kind of value found instead of
/// an array, leaving the mapping unchanged.
fn push_entry(map: &mut Map<String, Value>, key: &str, entry: &Value) -> Option<&'static str> {
    match map.get_mut(key) {
        Some(Value::Array(entries)) => entries.push(entry.clone()),
        None | Some(Value::Null) => {
            map.insert(key.to_string(), Value::Array(vec![entry.clone()]));
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            map.insert(key.to_string(), Value::Array(vec![entry.clone()]));
        }
        Some(other) => return Some(value_kind(other)),
    }
    None
}

fn not_an_array(key: &str, kind: &str) -> LacunaError {
    LacunaError::invalid_argument(format!("frontmatter key '{key}' holds {kind}, not an array"))
}

/// Apply `update` to the first entry matching `locator`.
///
/// The entry keeps its encoding and any explicitly written values; siblings are
/// untouched.
pub async fn update_stub(
    doc: &dyn Document,
    config: &StubsConfig,
    locator: &StubLocator,
    update: &StubUpdate,
) -> Result<bool> {
    if update
        .description
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        return Err(LacunaError::invalid_argument("stub description must not be empty"));
    }

    let key = &config.frontmatter_key;
    let mut found = false;
    let written = doc
        .transform_frontmatter(&mut |map| {
            let parsed = parse_frontmatter_stubs(map, config);
            let Some(stub) = parsed.stubs.into_iter().find(|s| locator.matches_stub(s)) else {
                return;
            };
            found = true;
            if let Some(Value::Object(fields)) = map
                .get_mut(key)
                .and_then(Value::as_array_mut)
                .and_then(|entries| entries.get_mut(stub.index))
            {
                update.apply_to_entry(fields, &stub);
            }
        })
        .await?;

    if found {
        info!(?locator, written, "Updated stub entry");
    }
    Ok(written)
}

/// Remove the first entry matching `locator` by text surgery
pub async fn remove_stub(doc: &dyn Document, config: &StubsConfig, locator: &StubLocator) -> Result<bool> {
    let content = doc.read().await?;
    let Some(updated) = remove_entry_from_text(&content, &config.frontmatter_key, locator) else {
        return Ok(false);
    };
    doc.write(&updated).await?;
    info!(?locator, "Removed stub entry");
    Ok(true)
}

/// Append `token` to a 0-based document line
pub async fn insert_anchor(doc: &dyn Document, line: usize, token: &str) -> Result<bool> {
    let content = doc.read().await?;
    let Some(updated) = insert_anchor_at_line(&content, line, token) else {
        return Ok(false);
    };
    doc.write(&updated).await?;
    info!(line, token, "Inserted anchor");
    Ok(true)
}

/// Delete every body occurrence of `token`
pub async fn remove_anchor(doc: &dyn Document, token: &str) -> Result<bool> {
    let content = doc.read().await?;
    let Some(updated) = remove_anchor_from_text(&content, token) else {
        return Ok(false);
    };
    doc.write(&updated).await?;
    info!(token, "Removed anchor");
    Ok(true)
}

/// Remove a stub's entry and its body anchor in a single write
pub async fn remove_stub_and_anchor(doc: &dyn Document, config: &StubsConfig, stub: &Stub) -> Result<bool> {
    let content = doc.read().await?;
    let mut updated = content.clone();

    if let Some(text) =
        remove_entry_from_text(&updated, &config.frontmatter_key, &StubLocator::for_stub(stub))
    {
        updated = text;
    }
    if let Some(text) = stub
        .anchor
        .as_deref()
        .and_then(|token| remove_anchor_from_text(&updated, token))
    {
        updated = text;
    }

    if updated == content {
        return Ok(false);
    }
    doc.write(&updated).await?;
    info!(id = %stub.id, "Removed stub and anchor");
    Ok(true)
}

/// What to do with a stub whose anchor is missing from the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrphanedStubResolution {
    /// Delete the frontmatter entry
    DeleteEntry,
    /// Put the anchor back at the end of a 0-based document line
    ReinsertAnchor {
        /// Target line
        line: usize,
    },
}

/// What to do with a prefixed anchor that no entry references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrphanedAnchorResolution {
    /// Add an entry referencing the anchor
    CreateEntry {
        /// Stub type key
        stub_type: String,
        /// Description for the new entry
        description: String,
    },
    /// Delete the token from the body
    DeleteAnchor,
    /// Strip the configured prefix so the token is no longer tracked
    ConvertToPlainReference,
}

/// Apply a resolution to an orphaned stub
pub async fn resolve_orphaned_stub(
    doc: &dyn Document,
    config: &StubsConfig,
    stub: &Stub,
    resolution: &OrphanedStubResolution,
) -> Result<bool> {
    match resolution {
        OrphanedStubResolution::DeleteEntry => {
            remove_stub(doc, config, &StubLocator::for_stub(stub)).await
        }
        OrphanedStubResolution::ReinsertAnchor { line } => {
            let token = stub.anchor.as_deref().ok_or_else(|| {
                LacunaError::invalid_argument(format!("stub {} has no anchor to reinsert", stub.id))
            })?;
            insert_anchor(doc, *line, token).await
        }
    }
}

/// Apply a resolution to an orphaned anchor
pub async fn resolve_orphaned_anchor(
    doc: &dyn Document,
    config: &StubsConfig,
    anchor: &Anchor,
    resolution: &OrphanedAnchorResolution,
) -> Result<bool> {
    match resolution {
        OrphanedAnchorResolution::CreateEntry {
            stub_type,
            description,
        } => {
            let stub = NewStub::new(stub_type, description).with_anchor(&anchor.id);
            add_stub(doc, config, &stub).await?;
            Ok(true)
        }
        OrphanedAnchorResolution::DeleteAnchor => remove_anchor(doc, &anchor.id).await,
        OrphanedAnchorResolution::ConvertToPlainReference => {
            let content = doc.read().await?;
            let Some(updated) = convert_anchor_to_plain(&content, &anchor.id, &config.anchors.prefix)
            else {
                return Ok(false);
            };
            doc.write(&updated).await?;
            info!(token = %anchor.id, "Converted anchor to plain reference");
            Ok(true)
        }
    }
}

//! Stub and anchor data model
//!
//! Every value here is rebuilt from raw document text on each sync. Nothing is
//! cached between calls, so all types are plain owned data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which of the three accepted frontmatter encodings an entry used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StubSyntax {
    /// `{type: link, description: "..."}`
    Explicit,
    /// `{link: "...", anchor: "^..."}`
    Compact,
    /// `{link: {description: "...", anchor: "^..."}}`
    Structured,
}

/// A structured record of a document gap, stored in the frontmatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stub {
    /// Derived from (type, description, index)
    pub id: String,

    /// Stub type key; may be outside the configured vocabulary
    #[serde(rename = "type")]
    pub stub_type: String,

    /// Never empty
    pub description: String,

    /// Anchor token including the leading `^`
    pub anchor: Option<String>,

    /// Set by linking when the anchor token was found in the body
    pub anchor_resolved: bool,

    /// Type defaults overlaid with validated explicit properties
    pub properties: Map<String, Value>,

    /// Encoding the entry was written in
    pub syntax: StubSyntax,

    /// Non-fatal problems found while parsing this entry
    pub warnings: Vec<String>,

    /// Position of the entry in the frontmatter array
    pub index: usize,
}

impl Stub {
    /// Deterministic id for an entry.
    ///
    /// The index participates, so reordering the array changes ids even when no
    /// entry content changed.
    pub fn compute_id(stub_type: &str, description: &str, index: usize) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(stub_type.as_bytes());
        hasher.update(&[0]);
        hasher.update(description.as_bytes());
        hasher.update(&[0]);
        hasher.update(&(index as u64).to_le_bytes());
        let hash = hasher.finalize();
        format!("stub-{}", hex::encode(&hash.as_bytes()[..6]))
    }

    /// Whether this stub is intentionally not tied to a body location
    pub fn is_unlinked(&self) -> bool {
        self.anchor.is_none()
    }

    /// String property shortcut
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Location of an anchor token; all fields are 0-based, columns and offsets in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorPosition {
    /// Line number
    pub line: usize,
    /// Byte column within the line
    pub column: usize,
    /// Byte offset from the start of the document
    pub absolute_offset: usize,
}

/// An inline anchor token found in the document body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Token including the leading `^`
    pub id: String,

    /// Where the token starts
    pub position: AnchorPosition,

    /// The full line the token sits on (without line terminator)
    pub line_content: String,

    /// Only whitespace follows the token on its line
    pub is_end_of_line: bool,

    /// Set by linking
    pub has_stub: bool,

    /// Type of the linked stub
    pub stub_type: Option<String>,

    /// Description of the linked stub
    pub stub_description: Option<String>,
}

impl Anchor {
    /// Token without the leading `^`
    pub fn name(&self) -> &str {
        self.id.strip_prefix('^').unwrap_or(&self.id)
    }

    /// Letters before the first hyphen (`^link-ab12` -> `link`)
    pub fn token_type(&self) -> &str {
        self.name().split('-').next().unwrap_or_default()
    }

    /// Whether the token is `^{prefix}-...`
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.name()
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

/// A stub and an anchor joined by matching token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedPair {
    /// The frontmatter side
    pub stub: Stub,
    /// The body side
    pub anchor: Anchor,
}

/// Category of a sync diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncErrorKind {
    /// Reported by the structured entry parser
    ParseError,
    /// The frontmatter block could not be decoded
    FrontmatterError,
    /// A second stub referenced a token already linked to another stub
    DuplicateStubAnchor,
}

/// Whether a diagnostic dropped data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The entry was dropped
    Error,
    /// The entry was kept
    Warning,
}

/// A recoverable problem found during sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncError {
    /// Category
    pub kind: SyncErrorKind,
    /// Error or warning
    pub severity: Severity,
    /// Human readable description
    pub message: String,
    /// Index of the frontmatter entry involved, if any
    pub index: Option<usize>,
}

/// Snapshot of a document's stubs and anchors, recomputed wholesale on every sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Every parsed stub, in frontmatter order
    pub stubs: Vec<Stub>,
    /// Every scanned anchor, in document order
    pub anchors: Vec<Anchor>,
    /// Stub/anchor pairs joined by token
    pub linked: Vec<LinkedPair>,
    /// Stubs whose anchor token is missing from the body
    pub orphaned_stubs: Vec<Stub>,
    /// Prefixed anchors without a stub
    pub orphaned_anchors: Vec<Anchor>,
    /// When this snapshot was computed
    pub last_sync_time: DateTime<Utc>,
    /// Diagnostics collected while syncing
    pub errors: Vec<SyncError>,
}

impl SyncState {
    /// State for a document without frontmatter
    pub fn empty() -> Self {
        Self {
            stubs: Vec::new(),
            anchors: Vec::new(),
            linked: Vec::new(),
            orphaned_stubs: Vec::new(),
            orphaned_anchors: Vec::new(),
            last_sync_time: Utc::now(),
            errors: Vec::new(),
        }
    }

    /// Stubs with no anchor at all
    pub fn unlinked_stubs(&self) -> impl Iterator<Item = &Stub> {
        self.stubs.iter().filter(|s| s.is_unlinked())
    }

    /// Whether either side has orphans
    pub fn has_orphans(&self) -> bool {
        !self.orphaned_stubs.is_empty() || !self.orphaned_anchors.is_empty()
    }

    /// Diagnostics with error severity
    pub fn hard_errors(&self) -> impl Iterator<Item = &SyncError> {
        self.errors.iter().filter(|e| e.severity == Severity::Error)
    }

    /// Find a stub by id
    pub fn stub(&self, id: &str) -> Option<&Stub> {
        self.stubs.iter().find(|s| s.id == id)
    }

    /// Find the first anchor with the given token
    pub fn anchor(&self, token: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == token)
    }

    /// Equality ignoring `last_sync_time`
    pub fn same_content(&self, other: &SyncState) -> bool {
        self.stubs == other.stubs
            && self.anchors == other.anchors
            && self.linked == other.linked
            && self.orphaned_stubs == other.orphaned_stubs
            && self.orphaned_anchors == other.orphaned_anchors
            && self.errors == other.errors
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::empty()
    }
}

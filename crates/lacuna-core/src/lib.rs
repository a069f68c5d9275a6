//! Lacuna core
//!
//! Tracks gaps in markdown documents. Each gap is a stub entry in the YAML
//! frontmatter and, optionally, an anchor token (`^stub-ab12cd`) in the body.
//! This crate provides:
//! - The stub/anchor data model
//! - A tolerant parser for the three frontmatter entry encodings
//! - An anchor scanner that skips code blocks and inline code
//! - The sync engine that links both sides and classifies orphans
//! - Format-preserving mutations and orphan resolution over a [`Document`]

pub mod anchors;
pub mod document;
pub mod entries;
pub mod error;
pub mod frontmatter;
pub mod mutation;
pub mod store;
pub mod surgery;
pub mod sync;
pub mod types;

// Re-export main types for convenience
pub use anchors::{
    anchor_tokens, find_duplicate_anchors, generate_anchor_id, generate_anchor_id_with,
    is_valid_stub_anchor, scan_anchors, DuplicateAnchors,
};
pub use document::{
    transform_frontmatter_text, Document, FrontmatterMutator, FsDocument, MemoryDocument,
};
pub use entries::{
    build_entry, classify_entry, parse_frontmatter_stubs, parse_stubs, stub_to_entry,
    EntryEncoding, ParseErrorKind, ParseWarningKind, StubParseError, StubParseResult,
    StubParseWarning,
};
pub use error::{LacunaError, Result};
pub use mutation::{
    add_anchored_stub, add_stub, insert_anchor, remove_anchor, remove_stub, remove_stub_and_anchor,
    resolve_orphaned_anchor, resolve_orphaned_stub, update_stub, NewStub, OrphanedAnchorResolution,
    OrphanedStubResolution, StubUpdate,
};
pub use store::{filter_stubs, group_by_type, sort_stubs, SortOrder, StubFilter, StubGroup, SyncStore};
pub use surgery::StubLocator;
pub use sync::perform_sync;
pub use types::{
    Anchor, AnchorPosition, LinkedPair, Severity, Stub, StubSyntax, SyncError, SyncErrorKind,
    SyncState,
};

pub use lacuna_config::StubsConfig;

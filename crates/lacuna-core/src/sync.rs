//! Synchronization engine
//!
//! [`perform_sync`] is a pure function of the document text and configuration.
//! It keeps no state between calls: every invocation re-derives the full
//! [`SyncState`] from source text.

use chrono::Utc;
use lacuna_config::StubsConfig;
use std::collections::HashMap;
use tracing::debug;

use crate::anchors::scan_anchors;
use crate::entries::{parse_frontmatter_stubs, StubParseResult};
use crate::frontmatter::{decode_frontmatter, split_frontmatter};
use crate::types::{Anchor, LinkedPair, Severity, Stub, SyncError, SyncErrorKind, SyncState};

/// Build the sync state for a whole document.
///
/// A document without a frontmatter block yields an empty state without errors.
pub fn perform_sync(content: &str, config: &StubsConfig) -> SyncState {
    let Some(block) = split_frontmatter(content) else {
        debug!("No frontmatter block, nothing to sync");
        return SyncState::empty();
    };

    let mut errors = Vec::new();
    let parsed = match decode_frontmatter(block.raw) {
        Ok(frontmatter) => parse_frontmatter_stubs(&frontmatter, config),
        Err(message) => {
            errors.push(SyncError {
                kind: SyncErrorKind::FrontmatterError,
                severity: Severity::Error,
                message,
                index: None,
            });
            StubParseResult::default()
        }
    };
    errors.extend(parse_diagnostics(&parsed));

    let mut anchors = scan_anchors(block.body);
    for anchor in &mut anchors {
        anchor.position.absolute_offset += block.len;
        anchor.position.line += block.line_count;
    }

    let mut state = link(parsed.stubs, anchors, &config.anchors.prefix, errors);
    state.last_sync_time = Utc::now();

    debug!(
        stubs = state.stubs.len(),
        anchors = state.anchors.len(),
        linked = state.linked.len(),
        orphaned_stubs = state.orphaned_stubs.len(),
        orphaned_anchors = state.orphaned_anchors.len(),
        "Sync complete"
    );
    state
}

fn parse_diagnostics(parsed: &StubParseResult) -> impl Iterator<Item = SyncError> + '_ {
    let errors = parsed.errors.iter().map(|e| SyncError {
        kind: SyncErrorKind::ParseError,
        severity: Severity::Error,
        message: e.message.clone(),
        index: e.index,
    });
    let warnings = parsed.warnings.iter().map(|w| SyncError {
        kind: SyncErrorKind::ParseError,
        severity: Severity::Warning,
        message: w.message.clone(),
        index: Some(w.index),
    });
    errors.chain(warnings)
}

/// Join stubs and anchors by token and classify orphans.
///
/// The first anchor carrying a token is the one that gets linked. A stub that
/// references a token already linked to an earlier stub is orphaned, so that every
/// linked anchor sits in exactly one pair.
pub fn link(
    mut stubs: Vec<Stub>,
    mut anchors: Vec<Anchor>,
    prefix: &str,
    mut errors: Vec<SyncError>,
) -> SyncState {
    let mut lookup: HashMap<String, usize> = HashMap::new();
    for (i, anchor) in anchors.iter().enumerate() {
        lookup.entry(anchor.id.clone()).or_insert(i);
    }

    let mut linked = Vec::new();
    let mut orphaned_stubs = Vec::new();

    for stub in &mut stubs {
        let Some(token) = stub.anchor.as_deref() else {
            continue;
        };

        match lookup.get(token).copied() {
            Some(i) if anchors[i].has_stub => {
                errors.push(SyncError {
                    kind: SyncErrorKind::DuplicateStubAnchor,
                    severity: Severity::Error,
                    message: format!("anchor {token} is already linked to another stub"),
                    index: Some(stub.index),
                });
                orphaned_stubs.push(stub.clone());
            }
            Some(i) => {
                stub.anchor_resolved = true;
                let anchor = &mut anchors[i];
                anchor.has_stub = true;
                anchor.stub_type = Some(stub.stub_type.clone());
                anchor.stub_description = Some(stub.description.clone());
                linked.push(LinkedPair {
                    stub: stub.clone(),
                    anchor: anchor.clone(),
                });
            }
            None => orphaned_stubs.push(stub.clone()),
        }
    }

    let orphaned_anchors = anchors
        .iter()
        .filter(|a| !a.has_stub && a.has_prefix(prefix))
        .cloned()
        .collect();

    SyncState {
        stubs,
        anchors,
        linked,
        orphaned_stubs,
        orphaned_anchors,
        last_sync_time: Utc::now(),
        errors,
    }
}

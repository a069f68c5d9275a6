//! Latest-snapshot store and derived views
//!
//! [`SyncStore`] holds the most recent [`SyncState`] for one document and
//! broadcasts each new snapshot to subscribers. Views over a snapshot (grouping,
//! filtering, sorting) are plain functions recomputed on demand.

use lacuna_config::StubsConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::sync::perform_sync;
use crate::types::{Stub, SyncState};

const CHANNEL_CAPACITY: usize = 16;

/// Holds the current sync snapshot and notifies subscribers when it changes
#[derive(Debug)]
pub struct SyncStore {
    current: RwLock<Arc<SyncState>>,
    tx: broadcast::Sender<Arc<SyncState>>,
}

impl SyncStore {
    /// Store holding an empty snapshot
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(Arc::new(SyncState::empty())),
            tx,
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<SyncState> {
        Arc::clone(&self.current.read())
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SyncState>> {
        self.tx.subscribe()
    }

    /// Replace the snapshot. Subscribers are only notified when the content differs
    /// from the previous snapshot; the timestamp alone does not count.
    pub fn publish(&self, state: SyncState) -> bool {
        let state = Arc::new(state);
        {
            let mut current = self.current.write();
            if current.same_content(&state) {
                *current = state;
                return false;
            }
            *current = Arc::clone(&state);
        }

        // No receivers is not an error
        let receivers = self.tx.send(state).unwrap_or(0);
        debug!(receivers, "Published sync state");
        true
    }

    /// Read a document, sync it and publish the result
    pub async fn refresh(&self, doc: &dyn Document, config: &StubsConfig) -> Result<Arc<SyncState>> {
        let content = doc.read().await?;
        self.publish(perform_sync(&content, config));
        Ok(self.snapshot())
    }
}

impl Default for SyncStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Stubs sharing one type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StubGroup<'a> {
    /// Stub type key
    pub stub_type: String,
    /// Configured display name, or the key for unknown types
    pub display_name: String,
    /// Members in frontmatter order
    pub stubs: Vec<&'a Stub>,
}

/// Group stubs by type, ordered by the configured `sort_order`; unknown types go last
pub fn group_by_type<'a>(
    stubs: impl IntoIterator<Item = &'a Stub>,
    config: &StubsConfig,
) -> Vec<StubGroup<'a>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<StubGroup<'a>> = Vec::new();

    for stub in stubs {
        let slot = *positions.entry(stub.stub_type.as_str()).or_insert_with(|| {
            groups.push(StubGroup {
                stub_type: stub.stub_type.clone(),
                display_name: config
                    .stub_type(&stub.stub_type)
                    .map(|t| t.display_name.clone())
                    .unwrap_or_else(|| stub.stub_type.clone()),
                stubs: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].stubs.push(stub);
    }

    groups.sort_by(|a, b| {
        config
            .type_sort_order(&a.stub_type)
            .cmp(&config.type_sort_order(&b.stub_type))
            .then_with(|| a.stub_type.cmp(&b.stub_type))
    });
    groups
}

/// Criteria for [`filter_stubs`]; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubFilter {
    /// Keep only these types
    pub stub_types: Vec<String>,
    /// Case-insensitive substring of the description
    pub query: Option<String>,
    /// `Some(true)` keeps stubs with an anchor, `Some(false)` those without
    pub anchored: Option<bool>,
    /// Drop stubs whose type is not configured
    pub known_types_only: bool,
}

/// Stubs matching every criterion of `filter`
pub fn filter_stubs<'a>(stubs: &'a [Stub], filter: &StubFilter, config: &StubsConfig) -> Vec<&'a Stub> {
    let query = filter.query.as_deref().map(str::to_lowercase);

    stubs
        .iter()
        .filter(|s| filter.stub_types.is_empty() || filter.stub_types.contains(&s.stub_type))
        .filter(|s| {
            query
                .as_deref()
                .map_or(true, |q| s.description.to_lowercase().contains(q))
        })
        .filter(|s| filter.anchored.map_or(true, |anchored| anchored == s.anchor.is_some()))
        .filter(|s| !filter.known_types_only || config.is_known_type(&s.stub_type))
        .collect()
}

/// Ordering for [`sort_stubs`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Document order of the linked anchor; stubs without one follow in frontmatter order
    #[default]
    Position,
    /// Configured type order, then frontmatter order
    Type,
    /// Description, case-insensitive
    Description,
}

/// Sort stubs in place. Ties keep frontmatter order.
pub fn sort_stubs(stubs: &mut [&Stub], order: SortOrder, state: &SyncState, config: &StubsConfig) {
    match order {
        SortOrder::Position => {
            let offsets: HashMap<&str, usize> = state
                .linked
                .iter()
                .map(|pair| (pair.stub.id.as_str(), pair.anchor.position.absolute_offset))
                .collect();
            stubs.sort_by(|a, b| {
                match (offsets.get(a.id.as_str()), offsets.get(b.id.as_str())) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
                .then_with(|| a.index.cmp(&b.index))
            });
        }
        SortOrder::Type => stubs.sort_by(|a, b| {
            config
                .type_sort_order(&a.stub_type)
                .cmp(&config.type_sort_order(&b.stub_type))
                .then_with(|| a.index.cmp(&b.index))
        }),
        SortOrder::Description => stubs.sort_by(|a, b| {
            a.description
                .to_lowercase()
                .cmp(&b.description.to_lowercase())
                .then_with(|| a.index.cmp(&b.index))
        }),
    }
}

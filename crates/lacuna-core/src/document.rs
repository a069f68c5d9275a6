//! Document I/O
//!
//! The engine touches a document through three primitives: read the whole text,
//! overwrite the whole text, and transform the decoded frontmatter. Hosts provide
//! [`Document`]; [`FsDocument`] and [`MemoryDocument`] cover files and tests.
//!
//! There is no locking here. Two mutations racing on one document can each read
//! stale text; callers keep at most one mutation in flight per document.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{LacunaError, Result};
use crate::frontmatter::{decode_frontmatter, render_with_frontmatter, split_frontmatter};

/// Frontmatter mutation callback
pub type FrontmatterMutator<'a> = &'a mut (dyn FnMut(&mut Map<String, Value>) + Send);

/// A text document the engine can read and rewrite
#[async_trait]
pub trait Document: Send + Sync {
    /// Full document text
    async fn read(&self) -> Result<String>;

    /// Replace the full document text
    async fn write(&self, content: &str) -> Result<()>;

    /// Decode the frontmatter, let `mutator` edit it, then re-encode and write.
    ///
    /// A document without a block starts from an empty mapping. Nothing is written
    /// when the mutator leaves the mapping unchanged. Returns whether the document
    /// was written.
    async fn transform_frontmatter(&self, mutator: FrontmatterMutator<'_>) -> Result<bool> {
        let content = self.read().await?;
        match transform_frontmatter_text(&content, mutator)? {
            Some(rendered) => {
                self.write(&rendered).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Pure form of [`Document::transform_frontmatter`]: returns the rewritten text, or
/// `None` when the mutator left the mapping unchanged.
pub fn transform_frontmatter_text(
    content: &str,
    mutator: FrontmatterMutator<'_>,
) -> Result<Option<String>> {
    let (mut map, body, line_ending) = match split_frontmatter(content) {
        Some(block) => (
            decode_frontmatter(block.raw).map_err(LacunaError::frontmatter)?,
            block.body,
            block.line_ending,
        ),
        None => {
            let line_ending = if content.contains("\r\n") { "\r\n" } else { "\n" };
            (Map::new(), content, line_ending)
        }
    };

    let before = map.clone();
    mutator(&mut map);
    if map == before {
        debug!("Frontmatter transform made no changes");
        return Ok(None);
    }

    Ok(Some(render_with_frontmatter(&map, body, line_ending)?))
}

/// A markdown file on disk
#[derive(Debug, Clone)]
pub struct FsDocument {
    path: PathBuf,
}

impl FsDocument {
    /// Wrap a path; the file is not touched until the first read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Document for FsDocument {
    async fn read(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LacunaError::io(&self.path, e))
    }

    async fn write(&self, content: &str) -> Result<()> {
        debug!(path = %self.path.display(), bytes = content.len(), "Writing document");
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| LacunaError::io(&self.path, e))
    }
}

/// An in-memory document
#[derive(Debug, Default)]
pub struct MemoryDocument {
    content: Mutex<String>,
    writes: Mutex<usize>,
}

impl MemoryDocument {
    /// Create a document holding `content`
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(content.into()),
            writes: Mutex::new(0),
        }
    }

    /// Current text
    pub fn content(&self) -> String {
        self.content.lock().clone()
    }

    /// Number of writes so far
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait]
impl Document for MemoryDocument {
    async fn read(&self) -> Result<String> {
        Ok(self.content())
    }

    async fn write(&self, content: &str) -> Result<()> {
        *self.content.lock() = content.to_string();
        *self.writes.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_transform_existing_block() {
        let doc = MemoryDocument::new("---\ntitle: Note\n---\nBody\n");
        let written = doc
            .transform_frontmatter(&mut |map| {
                map.insert("tags".to_string(), json!(["a"]));
            })
            .await
            .unwrap();

        assert!(written);
        assert_eq!(doc.content(), "---\ntitle: Note\ntags:\n- a\n---\nBody\n");
    }

    #[tokio::test]
    async fn test_transform_creates_block() {
        let doc = MemoryDocument::new("Body only\n");
        doc.transform_frontmatter(&mut |map| {
            map.insert("title".to_string(), json!("New"));
        })
        .await
        .unwrap();

        assert_eq!(doc.content(), "---\ntitle: New\n---\nBody only\n");
    }

    #[tokio::test]
    async fn test_transform_without_change_skips_write() {
        let doc = MemoryDocument::new("---\ntitle: Note\n---\nBody\n");
        let written = doc.transform_frontmatter(&mut |_| {}).await.unwrap();
        assert!(!written);
        assert_eq!(doc.write_count(), 0);
    }

    #[tokio::test]
    async fn test_transform_rejects_broken_yaml() {
        let doc = MemoryDocument::new("---\ntitle: [unclosed\n---\nBody\n");
        let err = doc.transform_frontmatter(&mut |_| {}).await.unwrap_err();
        assert!(matches!(err, LacunaError::Frontmatter(_)));
    }

    #[tokio::test]
    async fn test_fs_document_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let doc = FsDocument::new(dir.path().join("note.md"));
        doc.write("hello").await.unwrap();
        assert_eq!(doc.read().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_fs_document_missing_file() {
        let doc = FsDocument::new("/nonexistent/lacuna/note.md");
        let err = doc.read().await.unwrap_err();
        assert!(matches!(err, LacunaError::Io { .. }));
    }
}

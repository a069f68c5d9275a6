//! Anchor token scanner
//!
//! Finds `^type-id` tokens in body text, skipping fenced code regions and inline
//! code spans, and generates fresh tokens that do not collide with existing ones.

use lacuna_config::{AnchorIdStyle, AnchorSettings};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::frontmatter::trim_line_ending;
use crate::types::{Anchor, AnchorPosition};

static ANCHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^[a-zA-Z]+-[a-zA-Z0-9_-]+").expect("anchor regex"));

// A fence line holds only the fence and an optional info string
static FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(`{3,}|~{3,})[^`]*$").expect("fence regex"));

const ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TYPE_PREFIXED_SUFFIX_LEN: usize = 4;

/// Scan body text for anchor tokens.
///
/// Positions are relative to `body`; the sync engine shifts them into document
/// coordinates.
pub fn scan_anchors(body: &str) -> Vec<Anchor> {
    let mut anchors = Vec::new();
    let mut open_fence: Option<char> = None;
    let mut offset = 0;

    for (line_number, raw_line) in body.split_inclusive('\n').enumerate() {
        let line = trim_line_ending(raw_line);
        let line_start = offset;
        offset += raw_line.len();

        if let Some(fence) = fence_char(line) {
            match open_fence {
                None => open_fence = Some(fence),
                Some(open) if open == fence => open_fence = None,
                Some(_) => {}
            }
            continue;
        }
        if open_fence.is_some() || !line.contains('^') {
            continue;
        }

        let code_spans = inline_code_spans(line);
        for m in ANCHOR_REGEX.find_iter(line) {
            if code_spans
                .iter()
                .any(|&(start, end)| m.start() < end && m.end() > start)
            {
                continue;
            }

            anchors.push(Anchor {
                id: m.as_str().to_string(),
                position: AnchorPosition {
                    line: line_number,
                    column: m.start(),
                    absolute_offset: line_start + m.start(),
                },
                line_content: line.to_string(),
                is_end_of_line: line[m.end()..].trim().is_empty(),
                has_stub: false,
                stub_type: None,
                stub_description: None,
            });
        }
    }

    anchors
}

fn fence_char(line: &str) -> Option<char> {
    FENCE_REGEX
        .captures(line)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().chars().next())
}

/// Byte ranges covered by paired backticks; an unpaired trailing backtick opens nothing.
fn inline_code_spans(line: &str) -> Vec<(usize, usize)> {
    let ticks: Vec<usize> = line.match_indices('`').map(|(i, _)| i).collect();
    ticks
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1] + 1))
        .collect()
}

/// Check that `token` is `^{prefix}-` followed by `[a-zA-Z0-9_-]+`
pub fn is_valid_stub_anchor(token: &str, settings: &AnchorSettings) -> bool {
    token
        .strip_prefix('^')
        .and_then(|t| t.strip_prefix(settings.prefix.as_str()))
        .and_then(|t| t.strip_prefix('-'))
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_token_char))
}

pub(crate) fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// All tokens present in a scan result
pub fn anchor_tokens(anchors: &[Anchor]) -> HashSet<String> {
    anchors.iter().map(|a| a.id.clone()).collect()
}

/// Anchors sharing one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateAnchors {
    /// The shared token
    pub token: String,
    /// Every occurrence, in document order
    pub anchors: Vec<Anchor>,
}

/// Group anchors by token and keep only tokens that occur more than once
pub fn find_duplicate_anchors(anchors: &[Anchor]) -> Vec<DuplicateAnchors> {
    let mut groups: Vec<DuplicateAnchors> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for anchor in anchors {
        match index.get(anchor.id.as_str()) {
            Some(&i) => groups[i].anchors.push(anchor.clone()),
            None => {
                index.insert(&anchor.id, groups.len());
                groups.push(DuplicateAnchors {
                    token: anchor.id.clone(),
                    anchors: vec![anchor.clone()],
                });
            }
        }
    }

    groups.retain(|g| g.anchors.len() > 1);
    groups
}

/// Generate a new anchor token that is not in `existing`
pub fn generate_anchor_id(
    stub_type: &str,
    existing: &HashSet<String>,
    settings: &AnchorSettings,
) -> String {
    generate_anchor_id_with(&mut rand::rng(), stub_type, existing, settings)
}

/// [`generate_anchor_id`] with a caller-supplied random source
pub fn generate_anchor_id_with<R: Rng>(
    rng: &mut R,
    stub_type: &str,
    existing: &HashSet<String>,
    settings: &AnchorSettings,
) -> String {
    let prefix = settings.prefix.as_str();
    let candidate = match settings.id_style {
        AnchorIdStyle::Random => {
            format!("^{prefix}-{}", random_suffix(rng, settings.random_id_length))
        }
        AnchorIdStyle::TypePrefixed => {
            let ty = sanitize_type(stub_type).unwrap_or_else(|| prefix.to_string());
            format!(
                "^{prefix}-{ty}-{}",
                random_suffix(rng, TYPE_PREFIXED_SUFFIX_LEN)
            )
        }
        AnchorIdStyle::TypeOnly => {
            let ty = sanitize_type(stub_type)
                .filter(|t| starts_token(t))
                .unwrap_or_else(|| prefix.to_string());
            format!("^{ty}-{}", random_suffix(rng, settings.random_id_length))
        }
        AnchorIdStyle::Sequential => {
            let highest = highest_sequence(prefix, existing);
            // At u64::MAX the taken token is reused and the guard suffixes it
            let next = highest.checked_add(1).unwrap_or(highest);
            format!("^{prefix}-{next:03}")
        }
    };

    ensure_unique(candidate, existing)
}

fn random_suffix<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ID_CHARSET[rng.random_range(0..ID_CHARSET.len())] as char)
        .collect()
}

/// Keep only token characters; `None` when nothing usable is left
fn sanitize_type(stub_type: &str) -> Option<String> {
    let cleaned: String = stub_type.chars().filter(|c| is_token_char(*c)).collect();
    let cleaned = cleaned.trim_matches('-').to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Letters up to the first hyphen, as the token grammar requires
fn starts_token(s: &str) -> bool {
    s.split('-')
        .next()
        .is_some_and(|head| !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic()))
}

fn strip_caret(token: &str) -> &str {
    token.strip_prefix('^').unwrap_or(token)
}

/// Highest `N` among `^{prefix}-N` tokens, 0 when there is none
fn highest_sequence(prefix: &str, existing: &HashSet<String>) -> u64 {
    existing
        .iter()
        .filter_map(|token| {
            strip_caret(token)
                .strip_prefix(prefix)?
                .strip_prefix('-')?
                .parse::<u64>()
                .ok()
        })
        .max()
        .unwrap_or(0)
}

fn ensure_unique(candidate: String, existing: &HashSet<String>) -> String {
    let taken: HashSet<&str> = existing.iter().map(|t| strip_caret(t)).collect();
    if !taken.contains(strip_caret(&candidate)) {
        return candidate;
    }

    let mut n = 1u64;
    loop {
        let suffixed = format!("{candidate}-{n}");
        if !taken.contains(strip_caret(&suffixed)) {
            return suffixed;
        }
        n += 1;
    }
}

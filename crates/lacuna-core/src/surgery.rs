//! Line-level text surgery
//!
//! Removal of frontmatter entries works on raw text instead of decoding and
//! re-encoding the block, so quoting style, comments and indentation of the
//! untouched entries survive byte for byte. The element scanner is deliberately
//! small: it understands block sequences only.
//!
//! An element of the stub array starts at a `- ` marker line and extends over every
//! following line that is blank, a comment, or indented deeper than the marker.
//! It ends at:
//!
//! - the next marker at the same indentation,
//! - any other line at or left of the marker indentation (a new key),
//! - the closing `---` delimiter.
//!
//! Trailing blanks and comments at the marker indentation belong to whatever
//! follows the element, so removing an element leaves them in place.
//!
//! Every function returns `None` when there is nothing to change.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::anchors::is_token_char;
use crate::frontmatter::{split_frontmatter, trim_line_ending};
use crate::types::Stub;

/// How a mutation finds the frontmatter entry it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StubLocator {
    /// The entry referencing this anchor token
    Anchor(String),
    /// The entry with this type and description
    Content {
        /// Stub type key
        stub_type: String,
        /// Exact description text
        description: String,
    },
}

impl StubLocator {
    /// Locate by anchor token; a missing `^` is added
    pub fn anchor(token: impl AsRef<str>) -> Self {
        Self::Anchor(with_caret(token.as_ref()))
    }

    /// Locate by type and description
    pub fn content(stub_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Content {
            stub_type: stub_type.into(),
            description: description.into(),
        }
    }

    /// Locator that finds the given parsed stub
    pub fn for_stub(stub: &Stub) -> Self {
        match &stub.anchor {
            Some(token) => Self::Anchor(token.clone()),
            None => Self::content(&stub.stub_type, &stub.description),
        }
    }

    /// Whether a parsed stub is the one this locator describes
    pub fn matches_stub(&self, stub: &Stub) -> bool {
        match self {
            Self::Anchor(token) => stub.anchor.as_deref() == Some(with_caret(token).as_str()),
            Self::Content {
                stub_type,
                description,
            } => stub.stub_type == *stub_type && stub.description == *description,
        }
    }

    fn matches_text(&self, element: &str) -> bool {
        match self {
            Self::Anchor(token) => {
                let name = regex::escape(token.trim_start_matches('^'));
                let pattern = format!(r#"(?m)^{ITEM}anchor[ \t]*:[ \t]*["']?\^?{name}["']?{EOL}"#);
                Regex::new(&pattern).is_ok_and(|re| re.is_match(element))
            }
            Self::Content {
                stub_type,
                description,
            } => {
                let t = regex::escape(stub_type);
                let plain = regex::escape(description);
                let double = regex::escape(&description.replace('\\', r"\\").replace('"', "\\\""));
                let single = regex::escape(&description.replace('\'', "''"));
                let value = format!(r#"(?:"{double}"|'{single}'|{plain}){EOL}"#);

                let is_match = |pattern: String| Regex::new(&pattern).is_ok_and(|re| re.is_match(element));
                let described = |key: &str| is_match(format!(r"(?m)^{ITEM}{key}[ \t]*:[ \t]*{value}"));

                if is_match(format!(r"(?m)^{ITEM}type[ \t]*:")) {
                    // explicit: `type: <t>` plus a `description:` line
                    is_match(format!(r#"(?m)^{ITEM}type[ \t]*:[ \t]*["']?{t}["']?{EOL}"#))
                        && described("description")
                } else {
                    // compact `<t>: <description>`, or structured `<t>:` with a nested description
                    let key = format!(r#"["']?{t}["']?"#);
                    described(&key)
                        || (is_match(format!(r"(?m)^{ITEM}{key}[ \t]*:{EOL}"))
                            && described("description"))
                }
            }
        }
    }
}

/// Optional indentation and sequence marker before a key
const ITEM: &str = r"[ \t]*(?:-[ \t]+)?";
/// Optional trailing blanks and comment up to the end of the line
const EOL: &str = r"(?:[ \t]+#.*)?[ \t]*\r?$";

pub(crate) fn with_caret(token: &str) -> String {
    if token.starts_with('^') {
        token.to_string()
    } else {
        format!("^{token}")
    }
}

/// Remove one element of the `key` array from the frontmatter block.
///
/// When the removed element was the last one, the key line goes too. Flow-style
/// arrays (`stubs: [...]`) are left alone.
pub fn remove_entry_from_text(content: &str, key: &str, locator: &StubLocator) -> Option<String> {
    let block = split_frontmatter(content)?;
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let closing = block.closing_line();

    let key_line = find_key_line(&lines[..closing], key)?;
    let elements = array_elements(&lines, key_line + 1, closing);
    let target = elements
        .iter()
        .find(|range| locator.matches_text(&lines[(*range).clone()].concat()))?
        .clone();
    let drop_key = elements.len() == 1;

    let kept = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !target.contains(i) && !(drop_key && *i == key_line))
        .map(|(_, line)| *line)
        .collect();
    Some(kept)
}

fn find_key_line(lines: &[&str], key: &str) -> Option<usize> {
    let header = format!("{key}:");
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let Some(rest) = trim_line_ending(line).trim_end().strip_prefix(header.as_str()) else {
                return false;
            };
            // trailing comment after the key
            rest.is_empty() || (rest.starts_with([' ', '\t']) && rest.trim_start().starts_with('#'))
        })
        .map(|(i, _)| i)
}

/// Line ranges of the sequence elements between `from` and `to`
fn array_elements(lines: &[&str], from: usize, to: usize) -> Vec<Range<usize>> {
    let mut elements = Vec::new();
    let mut marker_indent: Option<usize> = None;
    let mut current: Option<usize> = None;

    for i in from..to {
        let text = trim_line_ending(lines[i]);
        if is_filler(text) {
            continue;
        }

        let rest = text.trim_start_matches(' ');
        let indent = text.len() - rest.len();
        let is_marker = rest == "-" || rest.starts_with("- ");

        match marker_indent {
            None if is_marker => {
                marker_indent = Some(indent);
                current = Some(i);
            }
            None => break,
            Some(level) if indent > level => {}
            Some(level) if indent == level && is_marker => {
                if let Some(start) = current.replace(i) {
                    elements.push(start..trim_tail(lines, start, i, level));
                }
            }
            Some(level) => {
                if let Some(start) = current.take() {
                    elements.push(start..trim_tail(lines, start, i, level));
                }
                break;
            }
        }
    }

    if let (Some(start), Some(level)) = (current, marker_indent) {
        elements.push(start..trim_tail(lines, start, to, level));
    }
    elements
}

/// Blank or comment-only line
fn is_filler(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Give back trailing blank lines, and comments not indented past the marker, to what follows
fn trim_tail(lines: &[&str], start: usize, mut end: usize, level: usize) -> usize {
    while end > start + 1 {
        let text = trim_line_ending(lines[end - 1]);
        let indent = text.len() - text.trim_start_matches(' ').len();
        if text.trim().is_empty() || (is_filler(text) && indent <= level) {
            end -= 1;
        } else {
            break;
        }
    }
    end
}

/// Append `" " + token` to a 0-based document line.
///
/// Lines inside the frontmatter block and lines past the end are refused.
pub fn insert_anchor_at_line(content: &str, line: usize, token: &str) -> Option<String> {
    let first_body_line = split_frontmatter(content).map_or(0, |b| b.line_count);
    if line < first_body_line {
        return None;
    }

    let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();
    let target = lines.get_mut(line)?;
    let text_len = trim_line_ending(target).len();
    target.insert_str(text_len, &format!(" {}", with_caret(token)));
    Some(lines.concat())
}

/// Remove every body occurrence of `token` together with the spaces or tabs before it
pub fn remove_anchor_from_text(content: &str, token: &str) -> Option<String> {
    replace_body_token(content, token, "", true)
}

/// Turn `^{prefix}-rest` into the untracked block reference `^rest`
pub fn convert_anchor_to_plain(content: &str, token: &str, prefix: &str) -> Option<String> {
    let token = with_caret(token);
    let rest = token[1..].strip_prefix(prefix)?.strip_prefix('-')?;
    if rest.is_empty() {
        return None;
    }
    replace_body_token(content, &token, &format!("^{rest}"), false)
}

/// Replace whole-token occurrences in the body, leaving the frontmatter untouched
fn replace_body_token(
    content: &str,
    token: &str,
    replacement: &str,
    eat_leading_blanks: bool,
) -> Option<String> {
    let token = with_caret(token);
    let body_start = split_frontmatter(content).map_or(0, |b| b.len);
    let (head, body) = content.split_at(body_start);

    let leading = if eat_leading_blanks { "[ \t]*" } else { "" };
    let pattern = Regex::new(&format!("{leading}{}", regex::escape(&token))).ok()?;

    let mut out = String::with_capacity(content.len());
    out.push_str(head);
    let mut last = 0;
    for m in pattern.find_iter(body) {
        if body[m.end()..].chars().next().is_some_and(is_token_char) {
            continue;
        }
        out.push_str(&body[last..m.start()]);
        out.push_str(replacement);
        last = m.end();
    }

    if last == 0 {
        return None;
    }
    out.push_str(&body[last..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "---
title: Notes
stubs:
  - link: \"cite x\"
    anchor: \"^stub-ab12\"
  - question:
      description: 'why?'
      priority: high

  - type: verify
    description: 95% confidence (p<0.05)
tags: [a, b]
---
Body ^stub-ab12
";

    #[test]
    fn test_remove_by_anchor() {
        let out = remove_entry_from_text(DOC, "stubs", &StubLocator::anchor("^stub-ab12")).unwrap();
        assert!(!out.contains("cite x"));
        assert!(out.contains("  - question:\n      description: 'why?'\n"));
        assert!(out.contains("tags: [a, b]\n"));
        // the body token is not part of the entry
        assert!(out.ends_with("Body ^stub-ab12\n"));
    }

    #[test]
    fn test_remove_anchor_without_caret_in_entry() {
        let doc = "---\nstubs:\n  - link: x\n    anchor: stub-ab12\n  - todo: y\n---\n";
        let out = remove_entry_from_text(doc, "stubs", &StubLocator::anchor("stub-ab12")).unwrap();
        assert_eq!(out, "---\nstubs:\n  - todo: y\n---\n");
    }

    #[test]
    fn test_anchor_match_respects_token_boundary() {
        let doc = "---\nstubs:\n  - link: x\n    anchor: \"^stub-ab123\"\n---\n";
        assert!(remove_entry_from_text(doc, "stubs", &StubLocator::anchor("^stub-ab12")).is_none());
    }

    #[test]
    fn test_remove_structured_by_content_keeps_blank_separator() {
        let out = remove_entry_from_text(DOC, "stubs", &StubLocator::content("question", "why?")).unwrap();
        assert!(!out.contains("why?"));
        assert!(out.contains("    anchor: \"^stub-ab12\"\n\n  - type: verify\n"));
    }

    #[test]
    fn test_remove_description_with_regex_metacharacters() {
        let out = remove_entry_from_text(
            DOC,
            "stubs",
            &StubLocator::content("verify", "95% confidence (p<0.05)"),
        )
        .unwrap();
        assert!(!out.contains("95% confidence"));
        assert!(out.contains("cite x"));
        assert!(out.contains("why?"));
        assert!(out.contains("tags: [a, b]\n---\n"));
    }

    #[test]
    fn test_metacharacters_are_not_wildcards() {
        let doc = "---\nstubs:\n  - verify: \"95% confidence (p<0.05)\"\n  - verify: \"95% confidence Xp<0Y05Z\"\n---\n";
        let out = remove_entry_from_text(
            doc,
            "stubs",
            &StubLocator::content("verify", "95% confidence (p<0.05)"),
        )
        .unwrap();
        assert_eq!(out, "---\nstubs:\n  - verify: \"95% confidence Xp<0Y05Z\"\n---\n");
    }

    #[test]
    fn test_content_match_needs_type_and_description() {
        assert!(
            remove_entry_from_text(DOC, "stubs", &StubLocator::content("todo", "cite x")).is_none()
        );
    }

    #[test]
    fn test_removing_last_element_drops_key() {
        let doc = "---\ntitle: T\nstubs:\n  - link: \"cite x\"\n---\nBody\n";
        let out = remove_entry_from_text(doc, "stubs", &StubLocator::content("link", "cite x")).unwrap();
        assert_eq!(out, "---\ntitle: T\n---\nBody\n");
    }

    #[test]
    fn test_unindented_sequence() {
        let doc = "---\nstubs:\n- link: a\n- todo: b\nnext: 1\n---\n";
        let out = remove_entry_from_text(doc, "stubs", &StubLocator::content("link", "a")).unwrap();
        assert_eq!(out, "---\nstubs:\n- todo: b\nnext: 1\n---\n");
    }

    #[test]
    fn test_comment_between_elements() {
        let doc = "---\ntitle: T\nstubs:\n  - link: a\n  # second one below\n  - todo: b\n---\nBody\n";

        let out = remove_entry_from_text(doc, "stubs", &StubLocator::content("link", "a")).unwrap();
        assert_eq!(out, "---\ntitle: T\nstubs:\n  # second one below\n  - todo: b\n---\nBody\n");
        let state = crate::sync::perform_sync(&out, &lacuna_config::StubsConfig::default());
        assert_eq!(state.stubs.len(), 1);
        assert_eq!(state.stubs[0].description, "b");

        let out = remove_entry_from_text(doc, "stubs", &StubLocator::content("todo", "b")).unwrap();
        assert_eq!(out, "---\ntitle: T\nstubs:\n  - link: a\n  # second one below\n---\nBody\n");
    }

    #[test]
    fn test_commented_key_line() {
        let doc = "---\nstubs:  # open gaps\n  - link: a\n  - todo: b\n---\n";
        let out = remove_entry_from_text(doc, "stubs", &StubLocator::content("todo", "b")).unwrap();
        assert_eq!(out, "---\nstubs:  # open gaps\n  - link: a\n---\n");
    }

    #[test]
    fn test_content_match_ignores_other_properties() {
        let doc = "---\nstubs:\n  - link: foo\n    note: cite x\n  - link: cite x\n---\n";
        let out = remove_entry_from_text(doc, "stubs", &StubLocator::content("link", "cite x")).unwrap();
        assert_eq!(out, "---\nstubs:\n  - link: foo\n    note: cite x\n---\n");

        // an explicit entry is matched on its own type and description keys
        let doc = "---\nstubs:\n  - type: todo\n    description: other\n    link: cite x\n---\n";
        assert!(remove_entry_from_text(doc, "stubs", &StubLocator::content("link", "cite x")).is_none());
    }

    #[test]
    fn test_crlf_preserved() {
        let doc = "---\r\nstubs:\r\n  - link: a\r\n  - todo: b\r\n---\r\nBody\r\n";
        let out = remove_entry_from_text(doc, "stubs", &StubLocator::content("todo", "b")).unwrap();
        assert_eq!(out, "---\r\nstubs:\r\n  - link: a\r\n---\r\nBody\r\n");
    }

    #[test]
    fn test_remove_no_match_or_flow_array() {
        assert!(remove_entry_from_text(DOC, "stubs", &StubLocator::anchor("^stub-none")).is_none());
        assert!(remove_entry_from_text(DOC, "missing", &StubLocator::anchor("^stub-ab12")).is_none());
        let flow = "---\nstubs: [{link: x}]\n---\n";
        assert!(remove_entry_from_text(flow, "stubs", &StubLocator::content("link", "x")).is_none());
        assert!(remove_entry_from_text("no block", "stubs", &StubLocator::content("link", "x")).is_none());
    }

    #[test]
    fn test_insert_anchor() {
        let doc = "---\na: 1\n---\nfirst\r\nsecond\n";
        let out = insert_anchor_at_line(doc, 3, "stub-xy").unwrap();
        assert_eq!(out, "---\na: 1\n---\nfirst ^stub-xy\r\nsecond\n");
        let out = insert_anchor_at_line(doc, 4, "^stub-xy").unwrap();
        assert_eq!(out, "---\na: 1\n---\nfirst\r\nsecond ^stub-xy\n");
    }

    #[test]
    fn test_insert_anchor_out_of_range_or_in_frontmatter() {
        let doc = "---\na: 1\n---\nbody\n";
        assert!(insert_anchor_at_line(doc, 9, "^stub-xy").is_none());
        assert!(insert_anchor_at_line(doc, 1, "^stub-xy").is_none());
        assert_eq!(
            insert_anchor_at_line("no block", 0, "^stub-xy").as_deref(),
            Some("no block ^stub-xy")
        );
    }

    #[test]
    fn test_remove_anchor_body_only() {
        let doc = "---\nstubs:\n  - link: x\n    anchor: \"^stub-a\"\n---\nText\t ^stub-a\nMore ^stub-ab and ^stub-a.\n";
        let out = remove_anchor_from_text(doc, "^stub-a").unwrap();
        assert_eq!(
            out,
            "---\nstubs:\n  - link: x\n    anchor: \"^stub-a\"\n---\nText\nMore ^stub-ab and.\n"
        );
        assert!(remove_anchor_from_text(doc, "^stub-zz").is_none());
    }

    #[test]
    fn test_convert_anchor_to_plain() {
        let doc = "Claim ^stub-k9 and ^stub-k9x\n";
        let out = convert_anchor_to_plain(doc, "^stub-k9", "stub").unwrap();
        assert_eq!(out, "Claim ^k9 and ^stub-k9x\n");
        assert!(convert_anchor_to_plain(doc, "^link-k9", "stub").is_none());
    }

    #[test]
    fn test_locator_matches_stub() {
        let stub = Stub {
            id: Stub::compute_id("link", "x", 0),
            stub_type: "link".to_string(),
            description: "x".to_string(),
            anchor: Some("^stub-a".to_string()),
            anchor_resolved: false,
            properties: Default::default(),
            syntax: crate::types::StubSyntax::Compact,
            warnings: Vec::new(),
            index: 0,
        };
        assert!(StubLocator::anchor("stub-a").matches_stub(&stub));
        assert!(StubLocator::content("link", "x").matches_stub(&stub));
        assert!(!StubLocator::content("todo", "x").matches_stub(&stub));
        assert_eq!(StubLocator::for_stub(&stub), StubLocator::Anchor("^stub-a".into()));
    }
}

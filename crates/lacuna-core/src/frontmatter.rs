//! YAML frontmatter primitives
//!
//! This is the generic metadata-block codec the rest of the crate builds on:
//! locating the `---` delimited block, decoding it into JSON values, and
//! rendering a mutated mapping back in front of the untouched body.

use serde_json::{Map, Value};

/// Opening and closing delimiter line
pub const DELIMITER: &str = "---";

/// A frontmatter block located at the start of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterBlock<'a> {
    /// YAML text between the delimiter lines
    pub raw: &'a str,
    /// Bytes covered by the block, delimiters and final line terminator included
    pub len: usize,
    /// Lines covered by the block, delimiter lines included
    pub line_count: usize,
    /// Everything after the closing delimiter line
    pub body: &'a str,
    /// `"\r\n"` when the opening delimiter used CRLF
    pub line_ending: &'static str,
}

impl FrontmatterBlock<'_> {
    /// 0-based line index of the closing delimiter
    pub fn closing_line(&self) -> usize {
        self.line_count - 1
    }
}

/// Strip a trailing `\n` or `\r\n`
pub(crate) fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Locate the frontmatter block. Returns `None` when the document does not start
/// with a delimiter line or the block is never closed.
pub fn split_frontmatter(content: &str) -> Option<FrontmatterBlock<'_>> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if trim_line_ending(first) != DELIMITER {
        return None;
    }
    let line_ending = if first.ends_with("\r\n") { "\r\n" } else { "\n" };

    let raw_start = first.len();
    let mut offset = raw_start;
    for (idx, line) in lines.enumerate() {
        if trim_line_ending(line) == DELIMITER {
            let len = offset + line.len();
            return Some(FrontmatterBlock {
                raw: &content[raw_start..offset],
                len,
                line_count: idx + 2,
                body: &content[len..],
                line_ending,
            });
        }
        offset += line.len();
    }

    None
}

/// Decode frontmatter YAML into a JSON mapping, keeping key order.
///
/// An empty or `null` document decodes to an empty mapping.
pub fn decode_frontmatter(raw: &str) -> Result<Map<String, Value>, String> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(format!(
            "frontmatter must be a mapping, found {}",
            value_kind(&other)
        )),
        Err(e) => Err(e.to_string()),
    }
}

/// Render a mapping as a frontmatter block followed by `body`.
///
/// An empty mapping renders no block at all.
pub fn render_with_frontmatter(
    map: &Map<String, Value>,
    body: &str,
    line_ending: &str,
) -> Result<String, serde_yaml::Error> {
    if map.is_empty() {
        return Ok(body.to_string());
    }

    let yaml = serde_yaml::to_string(map)?;
    let yaml = yaml.trim_end_matches('\n');
    let yaml = if line_ending == "\n" {
        yaml.to_string()
    } else {
        yaml.replace('\n', line_ending)
    };

    Ok(format!(
        "{DELIMITER}{le}{yaml}{le}{DELIMITER}{le}{body}",
        le = line_ending
    ))
}

/// Short name of a JSON value's shape, for diagnostics
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_basic() {
        let content = "---\ntitle: Test\n---\nBody text\n";
        let block = split_frontmatter(content).unwrap();
        assert_eq!(block.raw, "title: Test\n");
        assert_eq!(block.body, "Body text\n");
        assert_eq!(block.len, "---\ntitle: Test\n---\n".len());
        assert_eq!(block.line_count, 3);
        assert_eq!(block.closing_line(), 2);
        assert_eq!(block.line_ending, "\n");
    }

    #[test]
    fn test_split_crlf() {
        let content = "---\r\ntitle: Test\r\n---\r\nBody\r\n";
        let block = split_frontmatter(content).unwrap();
        assert_eq!(block.raw, "title: Test\r\n");
        assert_eq!(block.body, "Body\r\n");
        assert_eq!(block.line_ending, "\r\n");
    }

    #[test]
    fn test_split_missing_or_unclosed() {
        assert!(split_frontmatter("No frontmatter here").is_none());
        assert!(split_frontmatter("").is_none());
        assert!(split_frontmatter("---\ntitle: open\nbody").is_none());
        assert!(split_frontmatter("text\n---\na: b\n---\n").is_none());
    }

    #[test]
    fn test_split_closing_at_eof() {
        let block = split_frontmatter("---\na: 1\n---").unwrap();
        assert_eq!(block.raw, "a: 1\n");
        assert_eq!(block.body, "");
    }

    #[test]
    fn test_split_empty_block() {
        let block = split_frontmatter("---\n---\nbody").unwrap();
        assert_eq!(block.raw, "");
        assert_eq!(block.body, "body");
        assert_eq!(block.line_count, 2);
    }

    #[test]
    fn test_decode_preserves_order() {
        let map = decode_frontmatter("zeta: 1\nalpha: 2\n").unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_decode_empty_and_null() {
        assert!(decode_frontmatter("").unwrap().is_empty());
        assert!(decode_frontmatter("~\n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_mapping() {
        let err = decode_frontmatter("- a\n- b\n").unwrap_err();
        assert!(err.contains("array"));
        assert!(decode_frontmatter("a: [unclosed\n").is_err());
    }

    #[test]
    fn test_render_roundtrip() {
        let mut map = Map::new();
        map.insert("title".to_string(), json!("Note"));
        map.insert("stubs".to_string(), json!([{"link": "cite x"}]));

        let rendered = render_with_frontmatter(&map, "Body\n", "\n").unwrap();
        assert!(rendered.starts_with("---\ntitle: Note\n"));
        assert!(rendered.ends_with("---\nBody\n"));

        let block = split_frontmatter(&rendered).unwrap();
        assert_eq!(decode_frontmatter(block.raw).unwrap(), map);
    }

    #[test]
    fn test_render_empty_map_drops_block() {
        let rendered = render_with_frontmatter(&Map::new(), "Body", "\n").unwrap();
        assert_eq!(rendered, "Body");
    }
}

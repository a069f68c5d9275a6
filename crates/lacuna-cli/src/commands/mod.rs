pub mod check;
pub mod edit;
pub mod new_id;
pub mod resolve;
pub mod sync;

use anyhow::{bail, Result};
use lacuna_core::{perform_sync, Document, FsDocument, StubsConfig, SyncState};
use serde_json::{Map, Value};
use std::path::Path;

/// Read and sync one file
pub(crate) async fn load_state(config: &StubsConfig, file: &Path) -> Result<(FsDocument, SyncState)> {
    let doc = FsDocument::new(file);
    let content = doc.read().await?;
    let state = perform_sync(&content, config);
    Ok((doc, state))
}

/// Parse `KEY=VALUE` pairs; values that parse as JSON keep their type, anything
/// else is a string.
pub(crate) fn parse_properties(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut properties = Map::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Invalid property '{pair}', expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid property '{pair}', key is empty");
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        properties.insert(key.to_string(), value);
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_properties() {
        let pairs = vec![
            "priority=high".to_string(),
            "effort=3".to_string(),
            "inline=true".to_string(),
            "assignees=[\"ana\"]".to_string(),
            "note=a=b".to_string(),
        ];
        let props = parse_properties(&pairs).unwrap();
        assert_eq!(props["priority"], json!("high"));
        assert_eq!(props["effort"], json!(3));
        assert_eq!(props["inline"], json!(true));
        assert_eq!(props["assignees"], json!(["ana"]));
        assert_eq!(props["note"], json!("a=b"));
    }

    #[test]
    fn test_parse_properties_rejects_malformed() {
        assert!(parse_properties(&["novalue".to_string()]).is_err());
        assert!(parse_properties(&["=x".to_string()]).is_err());
    }
}

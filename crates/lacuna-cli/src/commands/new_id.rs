use anyhow::Result;
use lacuna_core::{anchor_tokens, generate_anchor_id, StubsConfig};
use std::path::Path;

pub async fn execute(config: &StubsConfig, file: &Path, stub_type: &str) -> Result<()> {
    let (_, state) = super::load_state(config, file).await?;

    let mut existing = anchor_tokens(&state.anchors);
    existing.extend(state.stubs.iter().filter_map(|s| s.anchor.clone()));

    println!("{}", generate_anchor_id(stub_type, &existing, &config.anchors));
    Ok(())
}

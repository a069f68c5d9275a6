use anyhow::{bail, Result};
use colored::Colorize;
use lacuna_core::{
    resolve_orphaned_anchor, resolve_orphaned_stub, OrphanedAnchorResolution,
    OrphanedStubResolution, StubsConfig,
};
use std::path::Path;

use crate::cli::LocatorArgs;

pub async fn stub(
    config: &StubsConfig,
    file: &Path,
    target: &LocatorArgs,
    delete: bool,
    reinsert_at: Option<usize>,
) -> Result<()> {
    let Some(locator) = target.locator() else {
        bail!("Select the entry with --anchor or with --type and --description");
    };
    let resolution = match (delete, reinsert_at) {
        (_, Some(line)) => OrphanedStubResolution::ReinsertAnchor { line },
        (true, None) => OrphanedStubResolution::DeleteEntry,
        (false, None) => bail!("Choose --delete or --reinsert-at"),
    };

    let (doc, state) = super::load_state(config, file).await?;
    let Some(stub) = state.stubs.iter().find(|s| locator.matches_stub(s)) else {
        println!("No matching entry");
        return Ok(());
    };
    if stub.anchor_resolved {
        println!("{} {} is not orphaned", "note:".dimmed(), stub.id);
    }

    if resolve_orphaned_stub(&doc, config, stub, &resolution).await? {
        println!("{} Resolved stub", "✓".green());
    } else {
        println!("Nothing changed");
    }
    Ok(())
}

pub async fn anchor(
    config: &StubsConfig,
    file: &Path,
    token: &str,
    create: Option<String>,
    description: Option<String>,
    delete: bool,
    plain: bool,
) -> Result<()> {
    let resolution = match (create, description, delete, plain) {
        (Some(stub_type), Some(description), _, _) => OrphanedAnchorResolution::CreateEntry {
            stub_type,
            description,
        },
        (Some(_), None, _, _) => bail!("--create needs --description"),
        (None, _, true, _) => OrphanedAnchorResolution::DeleteAnchor,
        (None, _, false, true) => OrphanedAnchorResolution::ConvertToPlainReference,
        (None, _, false, false) => bail!("Choose --create, --delete or --plain"),
    };

    let (doc, state) = super::load_state(config, file).await?;
    let token = if token.starts_with('^') {
        token.to_string()
    } else {
        format!("^{token}")
    };
    let Some(anchor) = state.anchor(&token) else {
        println!("No anchor {token} in {}", file.display());
        return Ok(());
    };

    if resolve_orphaned_anchor(&doc, config, anchor, &resolution).await? {
        println!("{} Resolved {}", "✓".green(), token.blue());
    } else {
        println!("Nothing changed");
    }
    Ok(())
}

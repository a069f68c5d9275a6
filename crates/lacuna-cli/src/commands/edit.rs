use anyhow::{bail, Context, Result};
use colored::Colorize;
use lacuna_core::{
    add_anchored_stub, add_stub, remove_stub, remove_stub_and_anchor, update_stub, FsDocument,
    NewStub, StubUpdate, StubsConfig,
};
use std::path::Path;

use crate::cli::LocatorArgs;

pub async fn add(
    config: &StubsConfig,
    file: &Path,
    stub_type: String,
    description: String,
    line: Option<usize>,
    anchor: Option<String>,
    properties: &[String],
) -> Result<()> {
    let mut stub = NewStub::new(stub_type, description);
    stub.properties = super::parse_properties(properties)?;

    if !config.is_known_type(&stub.stub_type) {
        eprintln!(
            "{} '{}' is not a configured stub type",
            "warning:".yellow(),
            stub.stub_type
        );
    }

    let doc = FsDocument::new(file);
    match (line, anchor) {
        (Some(line), _) => {
            let token = add_anchored_stub(&doc, config, stub, line)
                .await
                .with_context(|| format!("Failed to add stub to {}", file.display()))?;
            println!("{} Added stub anchored at {}", "✓".green(), token.blue());
        }
        (None, anchor) => {
            if let Some(token) = anchor {
                stub = stub.with_anchor(token);
            }
            add_stub(&doc, config, &stub)
                .await
                .with_context(|| format!("Failed to add stub to {}", file.display()))?;
            println!("{} Added {} stub", "✓".green(), stub.stub_type);
        }
    }
    Ok(())
}

pub async fn remove(
    config: &StubsConfig,
    file: &Path,
    target: &LocatorArgs,
    with_anchor: bool,
) -> Result<()> {
    let Some(locator) = target.locator() else {
        bail!("Select the entry with --anchor or with --type and --description");
    };

    let removed = if with_anchor {
        let (doc, state) = super::load_state(config, file).await?;
        match state.stubs.iter().find(|s| locator.matches_stub(s)) {
            Some(stub) => remove_stub_and_anchor(&doc, config, stub).await?,
            None => false,
        }
    } else {
        remove_stub(&FsDocument::new(file), config, &locator).await?
    };

    if removed {
        println!("{} Removed stub", "✓".green());
    } else {
        println!("No matching entry");
    }
    Ok(())
}

pub async fn update(
    config: &StubsConfig,
    file: &Path,
    target: &LocatorArgs,
    description: Option<String>,
    anchor: Option<Option<String>>,
    properties: &[String],
    unset: Vec<String>,
) -> Result<()> {
    let Some(locator) = target.locator() else {
        bail!("Select the entry with --anchor or with --type and --description");
    };

    let update = StubUpdate {
        description,
        anchor,
        set_properties: super::parse_properties(properties)?,
        remove_properties: unset,
    };
    if update.is_empty() {
        bail!("Nothing to update");
    }

    if update_stub(&FsDocument::new(file), config, &locator, &update).await? {
        println!("{} Updated stub", "✓".green());
    } else {
        println!("No matching entry");
    }
    Ok(())
}

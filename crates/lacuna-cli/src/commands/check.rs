use anyhow::Result;
use colored::Colorize;
use lacuna_core::{find_duplicate_anchors, StubsConfig};
use std::path::Path;
use tracing::debug;

use crate::output;

/// Print every problem found in `file`. Returns `true` when there are none.
pub async fn execute(config: &StubsConfig, file: &Path) -> Result<bool> {
    let (_, state) = super::load_state(config, file).await?;
    let duplicates = find_duplicate_anchors(&state.anchors);
    let hard_errors: Vec<_> = state.hard_errors().collect();

    debug!(
        orphaned_stubs = state.orphaned_stubs.len(),
        orphaned_anchors = state.orphaned_anchors.len(),
        duplicates = duplicates.len(),
        errors = hard_errors.len(),
        "Checked document"
    );

    if !state.orphaned_stubs.is_empty() {
        println!("{}", "Orphaned stubs (anchor missing from body)".bold());
        for stub in &state.orphaned_stubs {
            println!("{}", output::format_stub(stub, &state, config));
        }
    }

    if !state.orphaned_anchors.is_empty() {
        println!("{}", "Orphaned anchors (no stub entry)".bold());
        for anchor in &state.orphaned_anchors {
            println!("{}", output::format_anchor(anchor));
        }
    }

    if !duplicates.is_empty() {
        println!("{}", "Duplicate anchors".bold());
        for group in &duplicates {
            let lines: Vec<String> = group
                .anchors
                .iter()
                .map(|a| a.position.line.to_string())
                .collect();
            println!("  {} on lines {}", group.token.blue(), lines.join(", "));
        }
    }

    if !state.errors.is_empty() {
        println!("{}", "Diagnostics".bold());
        for error in &state.errors {
            println!("{}", output::format_error(error));
        }
    }

    let clean = !state.has_orphans() && duplicates.is_empty() && hard_errors.is_empty();
    if clean {
        println!("{} {}", "✓".green(), output::format_summary(&state));
    } else {
        println!("{} {}", "✗".red(), output::format_summary(&state));
    }
    Ok(clean)
}

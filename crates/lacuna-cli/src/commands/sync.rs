use anyhow::Result;
use colored::Colorize;
use lacuna_core::{filter_stubs, group_by_type, sort_stubs, SortOrder, Stub, StubFilter, StubsConfig};
use std::path::Path;

use crate::output;

pub async fn execute(
    config: &StubsConfig,
    file: &Path,
    json: bool,
    group: bool,
    sort: SortOrder,
    types: Vec<String>,
    query: Option<String>,
) -> Result<()> {
    let (_, state) = super::load_state(config, file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let filter = StubFilter {
        stub_types: types,
        query,
        ..Default::default()
    };
    let mut stubs: Vec<&Stub> = filter_stubs(&state.stubs, &filter, config);
    sort_stubs(&mut stubs, sort, &state, config);

    println!("{}", file.display().to_string().bold());
    if stubs.is_empty() {
        println!("  {}", "No stubs".dimmed());
    } else if group {
        for group in group_by_type(stubs.iter().copied(), config) {
            println!("{}", output::format_group(&group));
            for stub in group.stubs {
                println!("{}", output::format_stub(stub, &state, config));
            }
        }
    } else {
        for stub in &stubs {
            println!("{}", output::format_stub(stub, &state, config));
        }
    }

    if !state.orphaned_anchors.is_empty() {
        println!("{}", "Orphaned anchors".bold());
        for anchor in &state.orphaned_anchors {
            println!("{}", output::format_anchor(anchor));
        }
    }

    println!("{}", output::format_summary(&state));
    Ok(())
}

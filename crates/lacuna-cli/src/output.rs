//! Terminal formatting for sync results

use colored::{ColoredString, Colorize};
use lacuna_core::{Anchor, Severity, Stub, StubGroup, StubsConfig, SyncError, SyncState};

/// Link status of a stub within a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubStatus {
    /// Anchor found in the body
    Linked,
    /// Anchor referenced but missing
    Orphaned,
    /// No anchor on purpose
    Unlinked,
}

impl StubStatus {
    /// Classify a stub of `state`
    pub fn of(stub: &Stub, state: &SyncState) -> Self {
        if stub.anchor_resolved {
            Self::Linked
        } else if state.orphaned_stubs.iter().any(|s| s.id == stub.id) {
            Self::Orphaned
        } else {
            Self::Unlinked
        }
    }

    fn label(self) -> ColoredString {
        match self {
            Self::Linked => "linked".green(),
            Self::Orphaned => "orphaned".red().bold(),
            Self::Unlinked => "unlinked".dimmed(),
        }
    }
}

fn type_label(stub_type: &str, config: &StubsConfig) -> ColoredString {
    let label = format!("[{stub_type}]");
    if config.is_known_type(stub_type) {
        label.cyan()
    } else {
        label.yellow()
    }
}

/// One line describing a stub
pub fn format_stub(stub: &Stub, state: &SyncState, config: &StubsConfig) -> String {
    let mut line = format!("  {} {}", type_label(&stub.stub_type, config), stub.description);

    if let Some(token) = &stub.anchor {
        line.push_str(&format!("  {}", token.blue()));
        if let Some(anchor) = state.linked.iter().find(|p| p.stub.id == stub.id).map(|p| &p.anchor) {
            line.push_str(&format!(" (line {})", anchor.position.line));
        }
    }

    line.push_str(&format!("  {}", StubStatus::of(stub, state).label()));
    line
}

/// One line describing an anchor
pub fn format_anchor(anchor: &Anchor) -> String {
    format!(
        "  {} line {}, column {}: {}",
        anchor.id.blue(),
        anchor.position.line,
        anchor.position.column,
        anchor.line_content.trim().dimmed()
    )
}

/// One line describing a diagnostic
pub fn format_error(error: &SyncError) -> String {
    let label = match error.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow(),
    };
    match error.index {
        Some(index) => format!("  {label} (entry {index}): {}", error.message),
        None => format!("  {label}: {}", error.message),
    }
}

/// Heading for a stub group
pub fn format_group(group: &StubGroup<'_>) -> String {
    format!("{} ({})", group.display_name.bold(), group.stubs.len())
}

/// Counts line
pub fn format_summary(state: &SyncState) -> String {
    format!(
        "{} stubs, {} anchors, {} linked, {} orphaned stubs, {} orphaned anchors",
        state.stubs.len(),
        state.anchors.len(),
        state.linked.len(),
        state.orphaned_stubs.len(),
        state.orphaned_anchors.len()
    )
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use lacuna_core::{SortOrder, StubLocator};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "lacuna")]
#[command(about = "lacuna - Track stubs and anchors in markdown notes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/lacuna/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Effective log level
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

/// Sort options for listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Document order of anchors
    Position,
    /// Configured type order
    Type,
    /// Alphabetical by description
    Description,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Position => SortOrder::Position,
            SortArg::Type => SortOrder::Type,
            SortArg::Description => SortOrder::Description,
        }
    }
}

/// Selects one stub entry, by anchor or by type and description
#[derive(Args, Debug, Clone)]
pub struct LocatorArgs {
    /// Anchor token of the entry (with or without ^)
    #[arg(short = 'a', long, conflicts_with_all = ["stub_type", "description"])]
    pub anchor: Option<String>,

    /// Stub type of the entry
    #[arg(short = 't', long = "type", requires = "description")]
    pub stub_type: Option<String>,

    /// Exact description of the entry
    #[arg(short = 'd', long, requires = "stub_type")]
    pub description: Option<String>,
}

impl LocatorArgs {
    /// Build the locator, or `None` when neither form was given
    pub fn locator(&self) -> Option<StubLocator> {
        match (&self.anchor, &self.stub_type, &self.description) {
            (Some(anchor), _, _) => Some(StubLocator::anchor(anchor)),
            (None, Some(stub_type), Some(description)) => {
                Some(StubLocator::content(stub_type, description))
            }
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show stubs, anchors and their links
    Sync {
        /// Markdown file
        file: PathBuf,

        /// Print the full sync state as JSON
        #[arg(long)]
        json: bool,

        /// Group stubs by type
        #[arg(short, long)]
        group: bool,

        /// Sort order
        #[arg(short, long, value_enum, default_value = "position")]
        sort: SortArg,

        /// Only these stub types (can be repeated)
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Only stubs whose description contains this text
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Report orphans, duplicate anchors and parse errors; exits non-zero on problems
    Check {
        /// Markdown file
        file: PathBuf,
    },

    /// Add a stub entry
    Add {
        /// Markdown file
        file: PathBuf,

        /// Stub type
        #[arg(short = 't', long = "type")]
        stub_type: String,

        /// Description
        #[arg(short, long)]
        description: String,

        /// Insert a generated anchor at this 0-based line
        #[arg(short = 'n', long, conflicts_with = "anchor")]
        line: Option<usize>,

        /// Reference an existing anchor token
        #[arg(short, long)]
        anchor: Option<String>,

        /// Property as KEY=VALUE; VALUE is read as JSON when it parses (can be repeated)
        #[arg(short, long = "property", value_name = "KEY=VALUE")]
        properties: Vec<String>,
    },

    /// Remove a stub entry
    Remove {
        /// Markdown file
        file: PathBuf,

        #[command(flatten)]
        target: LocatorArgs,

        /// Also delete the entry's anchor from the body
        #[arg(long)]
        with_anchor: bool,
    },

    /// Change an existing stub entry
    Update {
        /// Markdown file
        file: PathBuf,

        #[command(flatten)]
        target: LocatorArgs,

        /// New description
        #[arg(long)]
        set_description: Option<String>,

        /// New anchor token
        #[arg(long, conflicts_with = "clear_anchor")]
        set_anchor: Option<String>,

        /// Drop the anchor reference
        #[arg(long)]
        clear_anchor: bool,

        /// Property as KEY=VALUE (can be repeated)
        #[arg(short, long = "property", value_name = "KEY=VALUE")]
        properties: Vec<String>,

        /// Property key to remove (can be repeated)
        #[arg(long = "unset", value_name = "KEY")]
        unset: Vec<String>,
    },

    /// Resolve an orphaned stub or anchor
    #[command(subcommand)]
    Resolve(ResolveCommands),

    /// Print a fresh anchor token that does not collide with the document
    NewId {
        /// Markdown file
        file: PathBuf,

        /// Stub type the token is for
        #[arg(short = 't', long = "type", default_value = "todo")]
        stub_type: String,
    },
}

#[derive(Subcommand)]
pub enum ResolveCommands {
    /// Resolve a stub whose anchor is missing from the body
    Stub {
        /// Markdown file
        file: PathBuf,

        #[command(flatten)]
        target: LocatorArgs,

        /// Delete the entry
        #[arg(long, conflicts_with = "reinsert_at", required_unless_present = "reinsert_at")]
        delete: bool,

        /// Reinsert the anchor at the end of this 0-based line
        #[arg(long, value_name = "LINE")]
        reinsert_at: Option<usize>,
    },

    /// Resolve an anchor no entry references
    Anchor {
        /// Markdown file
        file: PathBuf,

        /// Anchor token (with or without ^)
        token: String,

        /// Create an entry of this type for the anchor
        #[arg(long, value_name = "TYPE", requires = "description", conflicts_with_all = ["delete", "plain"])]
        create: Option<String>,

        /// Description for --create
        #[arg(short, long)]
        description: Option<String>,

        /// Delete the anchor from the body
        #[arg(long, conflicts_with = "plain")]
        delete: bool,

        /// Strip the prefix so the token is no longer tracked
        #[arg(long)]
        plain: bool,
    },
}

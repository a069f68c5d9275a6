//! # Lacuna Configuration Library
//!
//! User-defined vocabulary consumed by the Lacuna core: which stub types exist,
//! which properties a stub may carry and how they are validated, how anchor tokens
//! are named, and under which frontmatter key stubs are stored.
//!
//! The core never produces configuration; it treats a [`StubsConfig`] as an
//! immutable input for every call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lacuna_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::load_from_file("lacuna.toml").await?;
//!     println!("anchor prefix: {}", config.anchors.prefix);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod loader;

pub use config::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::*;

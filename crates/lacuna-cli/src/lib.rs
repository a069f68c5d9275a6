//! Lacuna command line interface
//!
//! Thin layer over `lacuna-core`: every command syncs or mutates a single
//! markdown file and prints the result.

pub mod cli;
pub mod commands;
pub mod output;

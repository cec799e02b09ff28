//! `pathway-tree` command line tool
//!
//! Library half of the binary: argument definition, configuration file,
//! logging setup and the subcommands themselves.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{build_cli, run, GlobalOptions};
pub use commands::{App, RenderOptions};
pub use config::CliConfig;
pub use logging::LogFormat;

//! CLI argument parsing and output formatting
//!
//! Uses clap for argument definitions and a small table renderer for output.

pub mod args;
pub mod output;

pub use args::{Cli, Commands};

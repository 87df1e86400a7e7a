//! switch-ip-check - Mist switch management IP checker
//!
//! This library provides the core functionality for comparing the management
//! addressing Juniper Mist is configured to push to switches against a CSV
//! baseline or against what the switches report.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`mist`]: Mist API abstraction layer
//! - [`services`]: Loading, reconciliation and export

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod mist;
pub mod services;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};

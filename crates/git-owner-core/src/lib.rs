//! Core types, configuration, and error handling for git-owner.
//!
//! This crate provides the shared foundation used by the other crates:
//! - [`OwnerError`] — unified error type using `thiserror`
//! - [`OwnerConfig`] / [`WeightConfig`] — configuration loaded from `.git-owner.toml`
//! - [`RecordSource`] — the seam between record extraction and estimation
//! - Shared types: [`BlameRecord`], [`CommitRecord`], [`IdentityMode`],
//!   [`Signals`], [`OutputFormat`]

mod config;
mod error;
mod source;
mod types;

pub use config::{IdentityConfig, OwnerConfig, WeightConfig};
pub use error::{OwnerError, RecordKind};
pub use source::RecordSource;
pub use types::{BlameRecord, CommitRecord, IdentityMode, OutputFormat, Signals};

/// A convenience `Result` type for git-owner operations.
pub type Result<T> = std::result::Result<T, OwnerError>;

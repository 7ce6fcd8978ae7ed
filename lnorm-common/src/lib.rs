//! # lnorm Common Library
//!
//! Shared code for the lnorm workspace including:
//! - Settings store (TOML) and settings path resolution
//! - Event types posted by the batch worker
//! - Timecode parsing and display helpers
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod timecode;

pub use error::{Error, Result};

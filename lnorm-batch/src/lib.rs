//! lnorm-batch library interface
//!
//! Batch loudness normalization through an external ffmpeg process, with
//! progress scraped from its diagnostic stream.

pub mod error;
pub mod services;
pub mod state;
pub mod ui;
pub mod worker;

pub use crate::error::{NormalizeError, NormalizeResult};
pub use crate::state::AppState;
pub use crate::worker::{spawn_batch, BatchHandle};

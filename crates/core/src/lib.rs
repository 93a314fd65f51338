//! Pure domain logic for the campaign video pipeline.
//!
//! This crate has zero internal dependencies so it can be used by the
//! API, the worker, and the pipeline crate alike. Everything here is
//! either a pure function, a typed contract (provider / record-store
//! traits), or a small state machine.

pub mod error;
pub mod framing;
pub mod motion;
pub mod narration;
pub mod progress;
pub mod provider;
pub mod retry;
pub mod status;
pub mod store;
pub mod types;

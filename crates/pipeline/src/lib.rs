//! The asynchronous campaign generation pipeline.
//!
//! Drives a campaign through its generation stages: per-scene video
//! synthesis (submit + poll + fetch under a retry policy), narration
//! synthesis, and final merge & publish. The pipeline talks to the
//! outside world exclusively through the boundary traits in
//! `reelgen_core` (providers and record store), so a whole campaign
//! run is testable with scripted substitutes.

pub mod error;
pub mod orchestrator;
pub mod poller;
pub mod scene;

pub use error::PipelineError;
pub use orchestrator::Orchestrator;

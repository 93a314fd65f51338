//! Concrete provider adapters.
//!
//! Each adapter implements one of the boundary traits from
//! `reelgen_core::provider` and owns the mapping from its transport
//! errors into the closed [`ProviderErrorKind`] classification — the
//! pipeline never inspects transport errors itself.
//!
//! [`ProviderErrorKind`]: reelgen_core::provider::ProviderErrorKind

pub mod classify;
pub mod ffmpeg;
pub mod s3;
pub mod tts;
pub mod veo;

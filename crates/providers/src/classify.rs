//! HTTP-boundary error classification shared by the REST adapters.

use reelgen_core::provider::{ProviderError, ProviderErrorKind};

/// Classify a non-success HTTP status into a provider error kind.
///
/// 429 is quota exhaustion, 408 a server-side timeout, and any 5xx a
/// temporary provider condition. Everything else (auth failures, bad
/// requests, missing resources) is fatal and never retried.
pub fn classify_status(status: u16) -> ProviderErrorKind {
    match status {
        429 => ProviderErrorKind::RateLimited,
        408 => ProviderErrorKind::Timeout,
        500..=599 => ProviderErrorKind::Temporary,
        _ => ProviderErrorKind::Fatal,
    }
}

/// Build a [`ProviderError`] from a non-success HTTP response status
/// and body.
pub fn error_from_response(provider: &str, status: u16, body: &str) -> ProviderError {
    ProviderError::new(
        classify_status(status),
        format!("{provider} API error ({status}): {body}"),
    )
}

/// Map a transport-level `reqwest` failure (before any HTTP status is
/// available). Timeouts classify as such; connection resets and DNS
/// failures are temporary.
pub fn error_from_transport(provider: &str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(format!("{provider} request timed out: {err}"))
    } else {
        ProviderError::temporary(format!("{provider} request failed: {err}"))
    }
}

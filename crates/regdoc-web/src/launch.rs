//! Credential gate in front of the web interface

use axum::Router;

use regdoc_core::{Error, Result};

/// Outcome of the launch gate
pub enum Launch {
    /// Query handler wired, ready to serve
    Ready(Router),
    /// No credential: nothing was wired, the message explains why
    Unavailable(String),
}

pub const MISSING_CREDENTIAL: &str =
    "Cannot launch the web interface without a configured Google API key.";

/// Wire the interface only if the credential loaded
///
/// `wire` is never called when the credential is missing, so no query
/// handler exists in that case. Any other error, including an invalid
/// setting next to a present key, is returned unchanged.
pub fn gate<C, F>(credential: Result<C>, wire: F) -> Result<Launch>
where
    F: FnOnce(C) -> Result<Router>,
{
    match credential {
        Ok(credential) => Ok(Launch::Ready(wire(credential)?)),
        Err(Error::MissingCredential(reason)) => {
            tracing::warn!("{}", reason);
            Ok(Launch::Unavailable(format!("{} ({})", MISSING_CREDENTIAL, reason)))
        }
        Err(other) => Err(other),
    }
}

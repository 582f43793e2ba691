//! Error taxonomy for the scanner.
//!
//! Only [`HunterError::Input`] is fatal to a run. Everything else is contained
//! at the request or URL boundary and degrades to "not reflected" / "clean".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HunterError {
    /// No usable list of targets could be resolved.
    #[error("no usable input: {0}")]
    Input(String),

    /// A single candidate URL failed scheme/host checks.
    #[error("invalid target {url}: {reason}")]
    Validation { url: String, reason: String },

    /// Timeout, refused connection, TLS failure or body read error on one probe.
    #[error("request failed: {0}")]
    Transport(#[from] rquest::Error),

    /// Payload catalog missing or unparseable.
    #[error("payload catalog unavailable: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HunterError {
    pub fn validation(url: &str, reason: impl Into<String>) -> Self {
        HunterError::Validation {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HunterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_target() {
        let err = HunterError::validation("ftp://x", "unsupported scheme 'ftp'");
        assert_eq!(err.to_string(), "invalid target ftp://x: unsupported scheme 'ftp'");
        assert_eq!(HunterError::Input("empty".into()).to_string(), "no usable input: empty");
    }
}

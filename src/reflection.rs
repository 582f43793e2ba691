//! Per-character reflection probing.
//!
//! Each candidate character is sent as `<char><random alphanumeric marker>`;
//! the character counts as reflected only when that exact string comes back
//! in the response body. The random marker keeps static page content from
//! producing false positives.

use crate::error::Result;
use crate::params::override_param;
use crate::session::ProbeSession;
use log::debug;
use rand::distributions::Alphanumeric;
use rand::Rng;
use url::Url;

/// Characters considered dangerous for markup/script injection, in probe order.
pub const CANDIDATE_CHARACTERS: [char; 28] = [
    '"', '\'', '<', '>', '&', '/', '\\', '(', ')', '{', '}', '[', ']', ';', ':', '=', '+', '-',
    '*', '%', '$', '#', '@', '!', '?', '|', '~', '`',
];

/// Only this many leading candidates are probed per parameter.
pub const PROBE_LIMIT: usize = 10;

pub const MARKER_LEN: usize = 12;

pub fn random_marker() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MARKER_LEN)
        .map(char::from)
        .collect()
}

pub fn probe_value(character: char) -> String {
    format!("{}{}", character, random_marker())
}

pub fn is_reflected(body: &str, probe: &str) -> bool {
    body.contains(probe)
}

/// Outcome of probing one parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionReport {
    /// Reflected characters, in candidate order.
    pub reflected: Vec<char>,
    /// Characters whose request failed and were counted as not reflected.
    pub failed: Vec<char>,
}

impl ReflectionReport {
    pub fn is_empty(&self) -> bool {
        self.reflected.is_empty()
    }
}

/// Send one probe for `character` in `parameter`, leaving every other parameter intact.
pub async fn probe_character(session: &ProbeSession, url: &Url, parameter: &str, character: char) -> Result<bool> {
    let value = probe_value(character);
    let target = override_param(url, parameter, &value);
    let response = session.fetch(&target).await?;
    Ok(is_reflected(&response.body, &value))
}

/// Probe the first [`PROBE_LIMIT`] of `characters`.
///
/// A failed request only affects its own character.
pub async fn probe(session: &ProbeSession, url: &Url, parameter: &str, characters: &[char]) -> ReflectionReport {
    let mut report = ReflectionReport::default();

    for &character in characters.iter().take(PROBE_LIMIT) {
        match probe_character(session, url, parameter, character).await {
            Ok(true) => report.reflected.push(character),
            Ok(false) => {}
            Err(e) => {
                debug!("Probe for {:?} in '{}' failed: {}", character, parameter, e);
                report.failed.push(character);
            }
        }
    }

    report
}

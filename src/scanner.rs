//! Per-target scan state machine.
//!
//! `START -> [WAF_CHECK] -> PARAM_LOOP -> [PAYLOAD_LOOP] -> VULNERABLE | CLEAN`
//!
//! A target is reported at most once: the first payload that comes back
//! verbatim ends the scan for that URL, including its remaining parameters.

use crate::config::{ScanConfig, WafMode};
use crate::error::Result;
use crate::models::{ScanOutcome, ScanResult};
use crate::output::Console;
use crate::params::{self, override_param, proof_url};
use crate::payloads::PayloadCatalog;
use crate::reflection::{self, CANDIDATE_CHARACTERS};
use crate::runner::StopSignal;
use crate::session::ProbeSession;
use crate::waf::WafDetector;
use colored::*;
use log::{debug, error, info, warn};
use std::sync::Arc;
use url::Url;

pub struct Scanner {
    config: ScanConfig,
    catalog: Arc<PayloadCatalog>,
    console: Console,
    stop: StopSignal,
}

impl Scanner {
    pub fn new(config: ScanConfig, catalog: Arc<PayloadCatalog>, console: Console) -> Self {
        Scanner {
            config,
            catalog,
            console,
            stop: StopSignal::new(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Handle that stops the scanner from starting new work when raised.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub async fn scan_target(&self, raw_url: &str) -> ScanOutcome {
        // START
        let url = match params::validate(raw_url) {
            Ok(u) => u,
            Err(e) => {
                warn!("{}", e);
                self.console.line(format!("{} {}", "Error:".red(), e));
                return ScanOutcome::Invalid(e.to_string());
            }
        };

        self.console.line(format!("[+] TESTING {}", raw_url));

        let session = match ProbeSession::new(&self.config) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to create HTTP session for {}: {}", raw_url, e);
                return ScanOutcome::Clean;
            }
        };

        // WAF_CHECK
        let firewall = self.resolve_firewall(&session, &url).await;

        // PARAM_LOOP
        let parameters = params::query_params(&url);
        if parameters.is_empty() {
            self.console.detail("[+] NO GET PARAMETERS IDENTIFIED...SKIPPING");
            return ScanOutcome::NotApplicable;
        }
        let names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
        self.console.detail(format!("[+] {} parameters identified: {}", names.len(), names.join(", ")));

        for param in &parameters {
            let parameter = param.name.as_str();
            if self.stop.is_raised() {
                return ScanOutcome::Cancelled;
            }
            self.console.detail(format!("[+] Testing parameter: {}", parameter));

            let report = reflection::probe(&session, &url, parameter, &CANDIDATE_CHARACTERS).await;
            if !report.failed.is_empty() {
                debug!("{} probe(s) failed for '{}' on {}", report.failed.len(), parameter, raw_url);
            }
            if report.is_empty() {
                self.console.detail(format!("[+] No character reflection found for parameter {}", parameter));
                continue;
            }
            for c in &report.reflected {
                self.console.detail(format!("{}", format!("[+] Character '{}' is reflecting in the response", c).green()));
            }

            // PAYLOAD_LOOP
            let payloads = self.catalog.select(&report.reflected, firewall.as_deref());
            if payloads.is_empty() {
                self.console.detail(format!("[+] No suitable payloads found for parameter {}", parameter));
                continue;
            }

            if let Some(payload) = self.confirm(&session, &url, parameter, &payloads).await {
                let result = ScanResult {
                    url: raw_url.trim().to_string(),
                    parameter: parameter.to_string(),
                    proof_url: proof_url(raw_url.trim(), param, &payload),
                    payload,
                };
                info!("Confirmed XSS in '{}' on {}", result.parameter, result.url);
                self.console.report_vulnerable(&result);
                return ScanOutcome::Vulnerable(result);
            }
        }

        self.console.detail(format!("{}", "[+] TARGET SEEMS TO BE NOT VULNERABLE".bright_white()));
        ScanOutcome::Clean
    }

    async fn resolve_firewall(&self, session: &ProbeSession, url: &Url) -> Option<String> {
        match &self.config.waf {
            WafMode::Off => None,
            WafMode::Fixed(vendor) => Some(vendor.clone()),
            WafMode::Detect => {
                self.console.detail(format!("{}", "[+] DETECTING WAF".bright_green()));
                let firewall = WafDetector::detect(session, url).await;
                match &firewall {
                    Some(v) => self.console.line(format!("{}", format!("[+] {} DETECTED on {}", v.to_uppercase(), url).bright_green())),
                    None => self.console.detail(format!("{}", "[+] NO WAF FOUND! GOING WITH NORMAL PAYLOADS".bright_green())),
                }
                firewall
            }
        }
    }

    /// First payload of `payloads` that reflects verbatim, in ranked order.
    async fn confirm(&self, session: &ProbeSession, url: &Url, parameter: &str, payloads: &[String]) -> Option<String> {
        for payload in payloads {
            if self.stop.is_raised() {
                return None;
            }
            match Self::send_payload(session, url, parameter, payload).await {
                Ok(true) => return Some(payload.clone()),
                Ok(false) => {}
                // A failed request is a payload that did not reflect.
                Err(e) => debug!("Payload request for '{}' failed: {}", parameter, e),
            }
        }
        None
    }

    /// Send `payload` as `parameter` and report whether it came back verbatim.
    pub async fn send_payload(session: &ProbeSession, url: &Url, parameter: &str, payload: &str) -> Result<bool> {
        let target = override_param(url, parameter, payload);
        let response = session.fetch(&target).await?;
        Ok(response.body.contains(payload))
    }
}

use crate::cli::Args;
use log::warn;
use rquest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;

/// Hard ceiling on concurrent target scans, to respect target-site load.
pub const MAX_CONCURRENCY: usize = 10;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_CATALOG: &str = "payloads.json";

/// How the firewall identity of each target is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WafMode {
    Off,
    /// Fingerprint every target with one probe request.
    Detect,
    /// Use the given vendor for every target without probing.
    Fixed(String),
}

/// Run-wide settings, built once and handed to the scanner and runner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub concurrency: usize,
    /// Extra headers attached to every outgoing request.
    pub headers: HeaderMap,
    pub waf: WafMode,
    /// `None` uses the built-in payload set.
    pub catalog_path: Option<PathBuf>,
    pub timeout: Duration,
    pub verbose: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            concurrency: 1,
            headers: HeaderMap::new(),
            waf: WafMode::Off,
            catalog_path: None,
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }
}

impl ScanConfig {
    pub fn from_args(args: &Args) -> Self {
        let waf = if args.waf {
            WafMode::Detect
        } else if let Some(vendor) = args.custom_waf.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            WafMode::Fixed(vendor.to_lowercase())
        } else {
            WafMode::Off
        };

        ScanConfig {
            concurrency: clamp_concurrency(args.threads),
            headers: args.headers.as_deref().map(parse_headers).unwrap_or_default(),
            waf,
            catalog_path: Some(PathBuf::from(&args.payloads)),
            timeout: Duration::from_secs(args.timeout.max(1)),
            verbose: args.verbose,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = clamp_concurrency(concurrency);
        self
    }

    /// Detail lines are only readable when one target is in flight at a time.
    pub fn show_details(&self) -> bool {
        self.verbose || self.concurrency == 1
    }
}

pub fn clamp_concurrency(requested: usize) -> usize {
    requested.clamp(1, MAX_CONCURRENCY)
}

/// Parse `Key:Value,Key2:Value2` into a header map.
///
/// Entries without `:` or with a name/value that is not a legal header are
/// dropped with a warning.
pub fn parse_headers(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for entry in raw.split(',') {
        let Some((name, value)) = entry.split_once(':') else {
            if !entry.trim().is_empty() {
                warn!("Ignoring header without ':' separator: {}", entry.trim());
            }
            continue;
        };

        let name = name.trim();
        let value = value.trim();
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(n), Ok(v)) => {
                headers.insert(n, v);
            }
            _ => warn!("Ignoring invalid header: {}", entry.trim()),
        }
    }

    headers
}

use crate::params::{base_url, override_param};
use crate::session::ProbeSession;
use log::{debug, info};
use rquest::header::HeaderMap;
use url::Url;

pub const WAF_PROBE_PARAM: &str = "test";
pub const WAF_PROBE_PAYLOAD: &str = "<script>alert('xss')</script>";

/// Vendor signatures, matched as lowercase substrings of the body and of each
/// `name: value` header line. Table order is a policy choice: the first vendor
/// with any matching signature wins.
pub const WAF_SIGNATURES: &[(&str, &[&str])] = &[
    ("cloudflare", &["cloudflare", "cf-ray"]),
    ("akamai", &["akamai", "ghost"]),
    ("incapsula", &["incapsula", "_incap_"]),
    ("sucuri", &["sucuri", "x-sucuri"]),
    ("barracuda", &["barracuda", "barra"]),
    ("f5", &["f5", "bigip"]),
    ("aws", &["aws", "cloudfront"]),
];

pub struct WafDetector;

impl WafDetector {
    /// Name the firewall vendor a response points to, if any.
    pub fn classify(body: &str, headers: &HeaderMap) -> Option<String> {
        let body = body.to_lowercase();
        let header_lines: Vec<String> = headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name.as_str(), String::from_utf8_lossy(value.as_bytes())).to_lowercase())
            .collect();

        for (vendor, signatures) in WAF_SIGNATURES {
            for signature in signatures.iter() {
                if body.contains(signature) || header_lines.iter().any(|h| h.contains(signature)) {
                    return Some(vendor.to_string());
                }
            }
        }

        None
    }

    /// Send one canonical script payload to the target's path and classify the answer.
    /// Transport failures mean "no firewall detected".
    pub async fn detect(session: &ProbeSession, url: &Url) -> Option<String> {
        let probe = override_param(&base_url(url), WAF_PROBE_PARAM, WAF_PROBE_PAYLOAD);

        match session.fetch(&probe).await {
            Ok(resp) => {
                let vendor = Self::classify(&resp.body, &resp.headers);
                if let Some(ref v) = vendor {
                    info!("Detected WAF {} on {}", v, url);
                }
                vendor
            }
            Err(e) => {
                debug!("WAF probe failed for {}: {}", url, e);
                None
            }
        }
    }
}

use crate::config::ScanConfig;
use crate::error::Result;
use log::debug;
use rand::Rng;
use rquest::header::HeaderMap;
use rquest::Client;
use rquest_util::Emulation;
use url::Url;

/// What the probes need from a response.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub headers: HeaderMap,
    pub body: String,
}

/// HTTP session for a single target URL.
///
/// Built fresh for every target so cookies and connections never leak
/// between unrelated sites. Certificate verification is off: targets are
/// frequently test hosts with self-signed certificates.
pub struct ProbeSession {
    client: Client,
    headers: HeaderMap,
}

impl ProbeSession {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let profile = {
            let mut rng = rand::thread_rng();
            match rng.gen_range(0..4) {
                0 => Emulation::Chrome126,
                1 => Emulation::Safari15_5,
                2 => Emulation::Firefox117,
                _ => Emulation::OkHttp4_10,
            }
        };

        let client = Client::builder()
            .emulation(profile)
            .timeout(config.timeout)
            .cert_verification(false)
            .build()?;

        Ok(ProbeSession {
            client,
            headers: config.headers.clone(),
        })
    }

    /// GET `url` with the configured extra headers and read the whole body.
    pub async fn fetch(&self, url: &Url) -> Result<ProbeResponse> {
        let resp = self
            .client
            .get(url.as_str())
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.text().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(ProbeResponse { headers, body })
    }
}

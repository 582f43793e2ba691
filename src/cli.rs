use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "xss-hunter")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent reflected XSS scanner with reflection probing and WAF-aware payload selection.", long_about = None)]
pub struct Args {
    /// Scan a single URL (e.g. http://example.com/?id=2).
    #[arg(short, long)]
    pub url: Option<String>,

    /// File with one GET URL per line.
    #[arg(short, long)]
    pub file: Option<String>,

    /// Read URLs from standard input.
    #[arg(long)]
    pub pipe: bool,

    /// Append vulnerable URLs to this file, one per line.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of concurrent targets (max 10).
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Custom headers, comma separated (e.g. "Cookie:a=b,X-Api-Key:123").
    #[arg(short = 'H', long)]
    pub headers: Option<String>,

    /// Fingerprint the web application firewall and pick matching payloads.
    #[arg(long)]
    pub waf: bool,

    /// Use payloads for this firewall vendor without fingerprinting.
    #[arg(short = 'w', long = "custom-waf")]
    pub custom_waf: Option<String>,

    /// Payload catalog (JSON array of {Payload, Attribute, waf}).
    #[arg(short, long, default_value = crate::config::DEFAULT_CATALOG)]
    pub payloads: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Print per-parameter details even with several threads.
    #[arg(short, long)]
    pub verbose: bool,
}

#![allow(dead_code)]

use rust_xss_hunter::config::ScanConfig;
use rust_xss_hunter::output::Console;
use rust_xss_hunter::payloads::PayloadCatalog;
use rust_xss_hunter::scanner::Scanner;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{Request, Respond, ResponseTemplate};

fn page(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_string(format!("<html><body><p>Results for: {}</p></body></html>", content))
}

fn query_values(request: &Request) -> Vec<(String, String)> {
    request.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

/// Echoes every query value verbatim.
pub struct EchoAll;

impl Respond for EchoAll {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let values: Vec<String> = query_values(request).into_iter().map(|(_, v)| v).collect();
        page(&values.join(" "))
    }
}

/// Echoes only the named parameter verbatim, ignores the rest.
pub struct EchoParam(pub &'static str);

impl Respond for EchoParam {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let value = query_values(request)
            .into_iter()
            .find(|(k, _)| k == self.0)
            .map(|(_, v)| v)
            .unwrap_or_default();
        page(&value)
    }
}

/// Lets `<` and `>` through and echoes `<script>` payloads unmodified;
/// strips every other special character.
pub struct AngleBracketsOnly;

impl Respond for AngleBracketsOnly {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let value = query_values(request)
            .into_iter()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v)
            .unwrap_or_default();
        if value.contains("<script>") && value.contains("</script>") {
            return page(&value);
        }
        let filtered: String = value.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '<' || *c == '>').collect();
        page(&filtered)
    }
}

pub fn entity_encode(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_string() } else { format!("&#{};", c as u32) })
        .collect()
}

/// HTML-escapes every non-alphanumeric character before echoing.
pub struct EscapeAll;

impl Respond for EscapeAll {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let values: Vec<String> = query_values(request).into_iter().map(|(_, v)| entity_encode(&v)).collect();
        page(&values.join(" "))
    }
}

/// Even-numbered paths (`/t0`, `/t2`, ...) echo, odd ones escape.
pub struct EvenPathsEcho;

impl Respond for EvenPathsEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let index: usize = request.url.path().trim_start_matches("/t").parse().unwrap_or(1);
        if index % 2 == 0 {
            EchoAll.respond(request)
        } else {
            EscapeAll.respond(request)
        }
    }
}

/// Echoes like [`EchoAll`], but holds the response for `STALL` whenever the
/// `id` value satisfies the predicate.
pub struct StallWhen(pub fn(&str) -> bool);

pub const STALL: Duration = Duration::from_secs(3);

impl Respond for StallWhen {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let stalls = query_values(request).iter().any(|(k, v)| k == "id" && (self.0)(v));
        let response = EchoAll.respond(request);
        if stalls {
            response.set_delay(STALL)
        } else {
            response
        }
    }
}

pub fn scanner(config: ScanConfig) -> Scanner {
    Scanner::new(config, Arc::new(PayloadCatalog::builtin()), Console::default())
}

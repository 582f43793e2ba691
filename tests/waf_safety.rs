use rquest::header::HeaderMap;
use rust_xss_hunter::waf::WafDetector;

#[test]
fn test_waf_safety_missing_headers() {
    let headers = HeaderMap::new();
    let result = WafDetector::classify("<html>hello</html>", &headers);
    assert_eq!(result, None);
}

#[test]
fn test_waf_safety_normal_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("server", "Apache".parse().unwrap());
    headers.insert("content-type", "text/html".parse().unwrap());
    let result = WafDetector::classify("<html>search results</html>", &headers);
    assert_eq!(result, None);
}

#[test]
fn test_waf_detect_cloudflare_ray_header() {
    let mut headers = HeaderMap::new();
    headers.insert("cf-ray", "123".parse().unwrap());
    let result = WafDetector::classify("", &headers);
    assert_eq!(result, Some("cloudflare".to_string()));
}

#[test]
fn test_waf_detect_from_body_is_case_insensitive() {
    let headers = HeaderMap::new();
    let result = WafDetector::classify("Request blocked by SUCURI Website Firewall", &headers);
    assert_eq!(result, Some("sucuri".to_string()));
}

#[test]
fn test_waf_first_vendor_in_table_wins() {
    let mut headers = HeaderMap::new();
    headers.insert("server", "AkamaiGHost".parse().unwrap());
    let result = WafDetector::classify("Attention Required! | Cloudflare", &headers);
    assert_eq!(result, Some("cloudflare".to_string()));
}

#[test]
fn test_waf_detect_cloudfront_header_value() {
    let mut headers = HeaderMap::new();
    headers.insert("via", "1.1 abc.cloudfront.net (CloudFront)".parse().unwrap());
    let result = WafDetector::classify("", &headers);
    assert_eq!(result, Some("aws".to_string()));
}

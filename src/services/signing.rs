//! OAuth 1.0a request signing (HMAC-SHA1) for the icon-search upstream.
//!
//! Only two-legged, application-level authorization is used: the token and
//! token secret are always empty. Nonce and timestamp are passed in by the
//! caller so a signature is a deterministic function of its inputs.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Render the `Authorization: OAuth ...` header value for a request.
///
/// `base_url` is the endpoint without any query string; `query` carries the
/// request's query parameters, which take part in the signature base string.
pub fn authorization_header(
    method: &str,
    base_url: &str,
    query: &[(&str, &str)],
    consumer_key: &str,
    consumer_secret: &str,
    nonce: &str,
    timestamp: u64,
) -> String {
    let timestamp = timestamp.to_string();
    let oauth_params: [(&str, &str); 6] = [
        ("oauth_consumer_key", consumer_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", &timestamp),
        ("oauth_token", ""),
        ("oauth_version", "1.0"),
    ];

    let base = signature_base_string(method, base_url, query, &oauth_params);
    let signature = sign(&base, consumer_secret);

    let mut header_params: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (k.to_string(), percent_encode(v)))
        .collect();
    header_params.push(("oauth_signature".to_string(), percent_encode(&signature)));
    header_params.sort();

    let rendered: Vec<String> = header_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v))
        .collect();
    format!("OAuth {}", rendered.join(", "))
}

/// RFC 5849 §3.4.1: method, base URL and the sorted, percent-encoded
/// parameter list, each segment itself percent-encoded.
fn signature_base_string(
    method: &str,
    base_url: &str,
    query: &[(&str, &str)],
    oauth_params: &[(&str, &str)],
) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .chain(oauth_params.iter())
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    pairs.sort();

    let normalized: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&normalized.join("&"))
    )
}

fn sign(base_string: &str, consumer_secret: &str) -> String {
    // Empty token secret: two-legged auth only.
    let key = format!("{}&", percent_encode(consumer_secret));
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// RFC 3986 percent-encoding: everything outside `A-Z a-z 0-9 - _ . ~` is
/// escaped, which is exactly what `urlencoding` implements.
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(nonce: &str, ts: u64) -> String {
        authorization_header(
            "GET",
            "https://api.example.com/v2/icon",
            &[("query", "coffee shop"), ("limit", "1")],
            "consumer-key",
            "consumer-secret",
            nonce,
            ts,
        )
    }

    #[test]
    fn signatures_are_deterministic_for_fixed_nonce_and_timestamp() {
        assert_eq!(header("abc123", 1_700_000_000), header("abc123", 1_700_000_000));
        assert_ne!(header("abc123", 1_700_000_000), header("abc124", 1_700_000_000));
    }

    #[test]
    fn header_carries_the_expected_oauth_fields() {
        let h = header("abc123", 1_700_000_000);
        assert!(h.starts_with("OAuth "));
        assert!(h.contains("oauth_consumer_key=\"consumer-key\""));
        assert!(h.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(h.contains("oauth_timestamp=\"1700000000\""));
        assert!(h.contains("oauth_token=\"\""));
        assert!(h.contains("oauth_version=\"1.0\""));
        assert!(h.contains("oauth_signature=\""));
    }

    #[test]
    fn base_string_sorts_and_encodes_parameters() {
        let base = signature_base_string(
            "get",
            "https://api.example.com/v2/icon",
            &[("query", "coffee shop"), ("limit", "1")],
            &[("oauth_nonce", "n"), ("oauth_consumer_key", "k")],
        );
        let mut segments = base.split('&');
        assert_eq!(segments.next(), Some("GET"));
        assert_eq!(
            segments.next(),
            Some("https%3A%2F%2Fapi.example.com%2Fv2%2Ficon")
        );
        let params = segments.next().expect("parameter segment");
        assert!(segments.next().is_none());
        // Sorted: limit, oauth_consumer_key, oauth_nonce, query; space is %20
        // (double-encoded inside the base string).
        assert_eq!(
            params,
            "limit%3D1%26oauth_consumer_key%3Dk%26oauth_nonce%3Dn%26query%3Dcoffee%2520shop"
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(percent_encode("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(percent_encode("safe-chars_.~"), "safe-chars_.~");
    }
}

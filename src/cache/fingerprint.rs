//! Deterministic fingerprinting of outbound API requests.
//!
//! The fingerprint is the cache key for the HTTP response cache, so it has
//! to be stable across processes and restarts: query parameters are sorted
//! before hashing, and credential parameters are excluded entirely so that
//! two requests differing only in the API key share one cache entry.

use sha2::{Digest, Sha256};
use url::Url;

/// Query parameters that carry credentials and must never be part of the
/// fingerprint (nor of any logged URL).
pub const SECRET_PARAMS: &[&str] = &["apiKey"];

/// Returns true for parameters excluded from fingerprinting.
pub fn is_secret_param(name: &str) -> bool {
    SECRET_PARAMS.contains(&name)
}

/// Compute the fingerprint for a GET request against `base`/`endpoint` with
/// the given query parameters.
///
/// The digest input is the canonical request line: method, the resolved URL
/// without a query string, then each non-secret `key=value` pair in sorted
/// order. Parameter order in `params` does not affect the result.
pub fn fingerprint(method: &str, base: &Url, endpoint: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params
        .iter()
        .filter(|(name, _)| !is_secret_param(name))
        .collect();
    sorted.sort();

    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b" ");
    hasher.update(base.as_str().trim_end_matches('/').as_bytes());
    hasher.update(endpoint.as_bytes());
    for (name, value) in sorted {
        hasher.update(b"\n");
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.spoonacular.com").unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn stable_under_parameter_reordering() {
        let a = params(&[("number", "10"), ("titleMatch", "pasta")]);
        let b = params(&[("titleMatch", "pasta"), ("number", "10")]);
        assert_eq!(
            fingerprint("GET", &base(), "/recipes/complexSearch", &a),
            fingerprint("GET", &base(), "/recipes/complexSearch", &b),
        );
    }

    #[test]
    fn credential_parameter_is_excluded() {
        let without = params(&[("titleMatch", "pasta")]);
        let with_key = params(&[("titleMatch", "pasta"), ("apiKey", "secret-1")]);
        let other_key = params(&[("apiKey", "secret-2"), ("titleMatch", "pasta")]);

        let fp = fingerprint("GET", &base(), "/recipes/complexSearch", &without);
        assert_eq!(
            fp,
            fingerprint("GET", &base(), "/recipes/complexSearch", &with_key)
        );
        assert_eq!(
            fp,
            fingerprint("GET", &base(), "/recipes/complexSearch", &other_key)
        );
    }

    #[test]
    fn endpoint_and_values_change_the_fingerprint() {
        let p = params(&[("titleMatch", "pasta")]);
        let fp = fingerprint("GET", &base(), "/recipes/complexSearch", &p);

        assert_ne!(fp, fingerprint("GET", &base(), "/recipes/random", &p));
        assert_ne!(
            fp,
            fingerprint(
                "GET",
                &base(),
                "/recipes/complexSearch",
                &params(&[("titleMatch", "pizza")])
            )
        );
    }

    #[test]
    fn trailing_slash_on_base_is_normalized() {
        let slashed = Url::parse("https://api.spoonacular.com/").unwrap();
        let p = params(&[("number", "5")]);
        assert_eq!(
            fingerprint("GET", &base(), "/recipes/random", &p),
            fingerprint("GET", &slashed, "/recipes/random", &p),
        );
    }
}

use url::Url;

/// Payloads are appended verbatim at the end of the target, which is expected
/// to end in an open parameter such as `?file=`.
pub fn append_payload(target: &str, payload: &str) -> String {
    format!("{}{}", target, payload)
}

/// A target is injectable when its query carries at least one `key=` pair.
pub fn has_injection_point(url: &Url) -> bool {
    url.query().is_some_and(|q| q.contains('='))
}

use crate::error::TransportError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Response headers in arrival order. The client hands names over
/// lowercased; lookups ignore case either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn from_reqwest(map: &reqwest::header::HeaderMap) -> Self {
        Self(
            map.iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        String::from_utf8_lossy(v.as_bytes()).into_owned(),
                    )
                })
                .collect(),
        )
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Serialized as a map; repeated names are joined with ", ".
impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut merged: Vec<(&str, String)> = Vec::new();
        for (name, value) in &self.0 {
            match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some((_, joined)) => {
                    joined.push_str(", ");
                    joined.push_str(value);
                }
                None => merged.push((name.as_str(), value.clone())),
            }
        }

        let mut map = serializer.serialize_map(Some(merged.len()))?;
        for (k, v) in merged {
            map.serialize_entry(k, &v)?;
        }
        map.end()
    }
}

/// What came back for one request. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResponse {
    pub status_code: u16,
    pub headers: Headers,
    /// Lossy UTF-8 of at most the configured number of body bytes
    pub body_snippet: String,
    pub body_truncated: bool,
    /// Bytes actually read (bounded by the snippet limit)
    pub body_len: usize,
    /// SHA-256 of the bytes read
    pub body_hash: String,
    pub location_header: Option<String>,
    pub elapsed_ms: u64,
}

impl RawResponse {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }
}

/// Exactly one response or exactly one transport error per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Capture {
    Response(RawResponse),
    Failed { transport_error: TransportError },
}

impl Capture {
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Capture::Response(resp) => Some(resp),
            Capture::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&TransportError> {
        match self {
            Capture::Response(_) => None,
            Capture::Failed { transport_error } => Some(transport_error),
        }
    }
}

impl From<Result<RawResponse, TransportError>> for Capture {
    fn from(result: Result<RawResponse, TransportError>) -> Self {
        match result {
            Ok(resp) => Capture::Response(resp),
            Err(transport_error) => Capture::Failed { transport_error },
        }
    }
}

#[cfg(test)]
pub(crate) fn response_fixture(status: u16, headers: &[(&str, &str)], body: &str) -> RawResponse {
    use sha2::{Digest, Sha256};

    let headers: Headers = headers.iter().map(|(k, v)| (*k, *v)).collect();
    let location_header = headers.get("location").map(str::to_string);
    RawResponse {
        status_code: status,
        headers,
        body_snippet: body.to_string(),
        body_truncated: false,
        body_len: body.len(),
        body_hash: format!("{:x}", Sha256::digest(body.as_bytes())),
        location_header,
        elapsed_ms: 1,
    }
}

//! Raw Request Record

use serde::{Deserialize, Serialize};

/// One raw HTTP request observation, as read from the labeled dataset.
///
/// All fields are kept as the raw strings they arrived as; interpretation
/// (header parsing, content-length parsing) happens at encoding time so a
/// malformed field can degrade to a default instead of failing the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Client IP (carried through for event reporting, ignored by encoding)
    #[serde(default)]
    pub ip: String,
    /// HTTP method (GET, POST, ...)
    #[serde(default)]
    pub method: String,
    /// Path component, without the query string
    #[serde(default)]
    pub path: String,
    /// Raw query string (empty when absent)
    #[serde(default)]
    pub query: String,
    /// User-Agent header value
    #[serde(default)]
    pub user_agent: String,
    /// Semicolon-separated "Name: value" header pairs
    #[serde(default)]
    pub headers: String,
    /// Content-Length as received; parsed leniently at encoding time
    #[serde(default)]
    pub content_length: String,
    /// Ground-truth label: 0 = benign, 1 = malicious; None when unlabeled
    #[serde(default)]
    pub label: Option<u8>,
}

impl RequestRecord {
    /// Convenience constructor for the request-line fields, everything else empty.
    pub fn new(method: &str, path: &str, query: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            query: query.to_string(),
            ..Default::default()
        }
    }
}

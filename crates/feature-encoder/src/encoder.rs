//! Feature Vector Assembly

use crate::entropy::shannon_entropy;
use crate::patterns::{
    contains_any, COMMON_HEADERS, LOGIN_KEYWORDS, SQLI_PATTERNS, SUSPICIOUS_UA_KEYWORDS,
    XSS_PATTERNS,
};
use crate::record::RequestRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 22;

/// Named slot indices of the feature schema.
///
/// The per-index semantics are shared verbatim by the standardizer, the
/// trainer, and the generated inference module; a change here requires
/// regenerating all of them in lockstep.
pub mod slot {
    pub const METHOD_GET: usize = 0;
    pub const METHOD_POST: usize = 1;
    pub const METHOD_HEAD: usize = 2;
    pub const METHOD_OTHER: usize = 3;
    pub const PATH_LENGTH: usize = 4;
    pub const NUM_PARAMS: usize = 5;
    pub const MAX_PARAM_LENGTH: usize = 6;
    pub const HAS_LOGIN_KEYWORD: usize = 7;
    pub const HAS_SQLI_PATTERN: usize = 8;
    pub const HAS_XSS_PATTERN: usize = 9;
    pub const PATH_ENTROPY: usize = 10;
    pub const NUM_HEADERS: usize = 11;
    pub const USER_AGENT_LENGTH: usize = 12;
    pub const HAS_SUSPICIOUS_UA: usize = 13;
    pub const CONTENT_LENGTH: usize = 14;
    pub const HAS_UNCOMMON_HEADER: usize = 15;
    pub const ACCEPT_LANGUAGE_LENGTH: usize = 16;
    pub const HOST_LENGTH: usize = 17;
    pub const REFERER_LENGTH: usize = 18;
    pub const REQ_RATE_10S: usize = 19;
    pub const LOGIN_HITS_60S: usize = 20;
    pub const UNIQUE_PATHS_60S: usize = 21;
}

/// Fixed-schema numeric encoding of a request record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Raw feature values, indexed by the `slot` constants
    pub values: [f64; FEATURE_DIMENSION],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_DIMENSION],
        }
    }
}

impl FeatureVector {
    /// Borrow the values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Encode a raw request record into the fixed 22-slot feature vector.
///
/// Total function: every field degrades to a documented default when missing
/// or malformed (unparseable content-length counts as 0, an unparseable
/// header string as zero headers).
pub fn encode(record: &RequestRecord) -> FeatureVector {
    trace!(method = %record.method, path = %record.path, "encoding record");
    let mut values = [0.0f64; FEATURE_DIMENSION];

    // f0-f3: method one-hot over {GET, POST, HEAD, other}
    let method = record.method.to_uppercase();
    match method.as_str() {
        "GET" => values[slot::METHOD_GET] = 1.0,
        "POST" => values[slot::METHOD_POST] = 1.0,
        "HEAD" => values[slot::METHOD_HEAD] = 1.0,
        _ => values[slot::METHOD_OTHER] = 1.0,
    }

    // f4: path length in characters
    values[slot::PATH_LENGTH] = record.path.chars().count() as f64;

    // f5-f6: query parameter count and longest value
    let (num_params, max_param_len) = parse_query_params(&record.query);
    values[slot::NUM_PARAMS] = num_params as f64;
    values[slot::MAX_PARAM_LENGTH] = max_param_len as f64;

    // Pattern slots and entropy run over path+"?"+query when a query exists
    let combined = if record.query.is_empty() {
        record.path.clone()
    } else {
        format!("{}?{}", record.path, record.query)
    };
    values[slot::HAS_LOGIN_KEYWORD] = bool_feature(contains_any(&combined, LOGIN_KEYWORDS));
    values[slot::HAS_SQLI_PATTERN] = bool_feature(contains_any(&combined, SQLI_PATTERNS));
    values[slot::HAS_XSS_PATTERN] = bool_feature(contains_any(&combined, XSS_PATTERNS));
    values[slot::PATH_ENTROPY] = shannon_entropy(&combined);

    // f11, f15-f18: header-derived features
    let headers = parse_headers(&record.headers);
    values[slot::NUM_HEADERS] = headers.len() as f64;
    values[slot::HAS_UNCOMMON_HEADER] =
        bool_feature(headers.keys().any(|name| !COMMON_HEADERS.contains(&name.as_str())));
    values[slot::ACCEPT_LANGUAGE_LENGTH] = header_value_len(&headers, "accept-language");
    values[slot::HOST_LENGTH] = header_value_len(&headers, "host");
    values[slot::REFERER_LENGTH] = header_value_len(&headers, "referer");

    // f12-f13: user agent
    values[slot::USER_AGENT_LENGTH] = record.user_agent.chars().count() as f64;
    values[slot::HAS_SUSPICIOUS_UA] =
        bool_feature(contains_any(&record.user_agent, SUSPICIOUS_UA_KEYWORDS));

    // f14: content length, 0 on parse failure
    values[slot::CONTENT_LENGTH] = record
        .content_length
        .trim()
        .parse::<i64>()
        .unwrap_or(0) as f64;

    // f19-f21: per-client behavioral rates. Always 0 in this version; the
    // offline encoder has no per-client state to derive them from. Known
    // limitation, kept so the slot layout matches the deployed module.
    values[slot::REQ_RATE_10S] = 0.0;
    values[slot::LOGIN_HITS_60S] = 0.0;
    values[slot::UNIQUE_PATHS_60S] = 0.0;

    FeatureVector { values }
}

fn bool_feature(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Count `&`-separated query parameters and the longest value among them.
///
/// A value is the substring after the first `=`, or the whole token when no
/// `=` is present. Empty tokens still count as parameters.
fn parse_query_params(query: &str) -> (usize, usize) {
    if query.is_empty() {
        return (0, 0);
    }

    let mut num_params = 0;
    let mut max_param_len = 0;
    for token in query.split('&') {
        num_params += 1;
        let value = match token.split_once('=') {
            Some((_, v)) => v,
            None => token,
        };
        max_param_len = max_param_len.max(value.chars().count());
    }
    (num_params, max_param_len)
}

/// Parse a semicolon-separated "Name: value" header string into a map with
/// trimmed, lower-cased names. Tokens without a colon are dropped; a later
/// duplicate name overwrites the earlier one.
fn parse_headers(headers_str: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    if headers_str.is_empty() {
        return headers;
    }

    for part in headers_str.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((name, value)) = part.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }
    headers
}

fn header_value_len(headers: &HashMap<String, String>, name: &str) -> f64 {
    headers
        .get(name)
        .map(|v| v.chars().count() as f64)
        .unwrap_or(0.0)
}

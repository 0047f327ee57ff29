//! HTTP Request Feature Encoding
//!
//! Maps raw HTTP request records to a fixed 22-dimensional numeric vector.
//! Encoding is pure and total: malformed input degrades to documented
//! defaults, it never fails.

mod encoder;
mod entropy;
mod patterns;
mod record;

pub use encoder::{encode, slot, FeatureVector, FEATURE_DIMENSION};
pub use entropy::shannon_entropy;
pub use patterns::{
    contains_any, COMMON_HEADERS, LOGIN_KEYWORDS, SQLI_PATTERNS, SUSPICIOUS_UA_KEYWORDS,
    XSS_PATTERNS,
};
pub use record::RequestRecord;

//! Fixed Pattern Tables
//!
//! These lists are part of the feature contract: the standardization
//! statistics were fitted against vectors produced with exactly these
//! patterns, so changing any entry requires retraining and re-export.

/// Login / admin-panel path keywords (slot 7)
pub const LOGIN_KEYWORDS: &[&str] = &[
    "admin",
    "login",
    "wp-admin",
    "wp-login",
    "phpmyadmin",
    "shell",
    "xmlrpc",
    "console",
    "manager",
    "cpanel",
    "roundcube",
];

/// SQL-injection substrings (slot 8)
pub const SQLI_PATTERNS: &[&str] = &[
    "union",
    "select",
    " or 1=1",
    "' or '1'='1",
    "%27",
    "'",
    "\"",
    "--",
    "/*",
    "../",
    "..%2f",
    "%2e%2e/",
];

/// Cross-site-scripting substrings (slot 9)
pub const XSS_PATTERNS: &[&str] = &[
    "<script",
    "</script",
    "onerror=",
    "onload=",
    "javascript:",
    "<img",
    "alert(",
];

/// Scanner / tooling User-Agent keywords (slot 13)
pub const SUSPICIOUS_UA_KEYWORDS: &[&str] = &[
    "sqlmap", "nikto", "nessus", "acunetix", "wpscan", "nmap", "curl", "wget", "bot", "crawler",
    "spider", "scanner",
];

/// Header names considered ordinary browser traffic (slot 15 checks against this)
pub const COMMON_HEADERS: &[&str] = &[
    "host",
    "user-agent",
    "accept",
    "accept-language",
    "accept-encoding",
    "connection",
    "cookie",
    "referer",
    "content-length",
    "content-type",
    "upgrade-insecure-requests",
];

/// Case-insensitive "any pattern is a substring of haystack" check.
///
/// Patterns are stored lower-case; the haystack is lowered once.
pub fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    let lowered = haystack.to_lowercase();
    patterns.iter().any(|p| lowered.contains(p))
}

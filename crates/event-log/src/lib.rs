//! Classification Event Log
//!
//! Bounded buffer of per-request classification events, consumed by the
//! dashboard side. The buffer is an explicit value passed by reference to
//! whoever reports events: mutation happens only under its internal lock,
//! and capacity is enforced by evicting the oldest entry.

mod buffer;

pub use buffer::EventBuffer;

use serde::{Deserialize, Serialize};

/// Verdict applied to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WafAction {
    #[serde(rename = "ALLOWED")]
    Allowed,
    #[serde(rename = "BLOCKED")]
    Blocked,
}

impl WafAction {
    /// Wire representation used by event consumers.
    pub fn as_str(&self) -> &'static str {
        match self {
            WafAction::Allowed => "ALLOWED",
            WafAction::Blocked => "BLOCKED",
        }
    }
}

/// One classification event as reported to the dashboard collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WafEvent {
    pub method: String,
    pub path: String,
    pub query: String,
    pub user_agent: String,
    /// Model output in [0, 1]
    pub probability: f64,
    /// 1 = malicious, 0 = benign
    pub classification: u8,
    pub action: WafAction,
    pub client_ip: String,
}

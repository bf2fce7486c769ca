//! CallDirection - who placed the call

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    #[default]
    Inbound,
    Outbound,
}

impl CallDirection {
    /// Provider values are "inbound", "outbound-api" and "outbound-dial"
    pub fn from_provider(value: &str) -> Self {
        if value.starts_with("outbound") {
            CallDirection::Outbound
        } else {
            CallDirection::Inbound
        }
    }
}

impl std::fmt::Display for CallDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallDirection::Inbound => write!(f, "inbound"),
            CallDirection::Outbound => write!(f, "outbound"),
        }
    }
}

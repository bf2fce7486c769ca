//! Speaker - who said a transcript line

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Speaker {
    #[serde(rename = "AI")]
    Ai,
    User,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Ai => write!(f, "AI"),
            Speaker::User => write!(f, "User"),
        }
    }
}

impl std::str::FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AI" | "ai" | "assistant" => Ok(Speaker::Ai),
            "User" | "user" => Ok(Speaker::User),
            _ => Err(format!("Unknown speaker: {}", s)),
        }
    }
}

//! Call status - provider lifecycle values and the dashboard's collapsed view

use serde::{Deserialize, Serialize};

/// Status reported by the telephony provider
///
/// Unknown values are kept verbatim so that nothing sent by the provider is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderCallStatus {
    Queued,
    Initiated,
    Ringing,
    InProgress,
    Completed,
    Busy,
    Failed,
    NoAnswer,
    Canceled,
    Other(String),
}

impl ProviderCallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderCallStatus::Queued => "queued",
            ProviderCallStatus::Initiated => "initiated",
            ProviderCallStatus::Ringing => "ringing",
            ProviderCallStatus::InProgress => "in-progress",
            ProviderCallStatus::Completed => "completed",
            ProviderCallStatus::Busy => "busy",
            ProviderCallStatus::Failed => "failed",
            ProviderCallStatus::NoAnswer => "no-answer",
            ProviderCallStatus::Canceled => "canceled",
            ProviderCallStatus::Other(s) => s,
        }
    }

    /// Collapse into the three-value status shown to users
    pub fn display_status(&self) -> DisplayStatus {
        match self {
            ProviderCallStatus::Completed => DisplayStatus::Completed,
            ProviderCallStatus::InProgress
            | ProviderCallStatus::Ringing
            | ProviderCallStatus::Queued
            | ProviderCallStatus::Initiated => DisplayStatus::Ongoing,
            ProviderCallStatus::Busy
            | ProviderCallStatus::Failed
            | ProviderCallStatus::NoAnswer
            | ProviderCallStatus::Canceled => DisplayStatus::Missed,
            ProviderCallStatus::Other(_) => DisplayStatus::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ProviderCallStatus::Completed)
    }

    /// The call has ended and the provider will send no further webhooks for it
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProviderCallStatus::Completed
                | ProviderCallStatus::Busy
                | ProviderCallStatus::Failed
                | ProviderCallStatus::NoAnswer
                | ProviderCallStatus::Canceled
        )
    }
}

impl From<&str> for ProviderCallStatus {
    fn from(s: &str) -> Self {
        match s.trim() {
            "queued" => ProviderCallStatus::Queued,
            "initiated" => ProviderCallStatus::Initiated,
            "ringing" => ProviderCallStatus::Ringing,
            "in-progress" => ProviderCallStatus::InProgress,
            "completed" => ProviderCallStatus::Completed,
            "busy" => ProviderCallStatus::Busy,
            "failed" => ProviderCallStatus::Failed,
            "no-answer" => ProviderCallStatus::NoAnswer,
            "canceled" => ProviderCallStatus::Canceled,
            other => ProviderCallStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ProviderCallStatus {
    fn from(s: String) -> Self {
        ProviderCallStatus::from(s.as_str())
    }
}

impl From<ProviderCallStatus> for String {
    fn from(status: ProviderCallStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ProviderCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing call status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Completed,
    Ongoing,
    Missed,
}

impl DisplayStatus {
    /// Representative provider status, used when expanding canned data
    pub fn provider_status(self) -> ProviderCallStatus {
        match self {
            DisplayStatus::Completed => ProviderCallStatus::Completed,
            DisplayStatus::Ongoing => ProviderCallStatus::InProgress,
            DisplayStatus::Missed => ProviderCallStatus::NoAnswer,
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayStatus::Completed => write!(f, "completed"),
            DisplayStatus::Ongoing => write!(f, "ongoing"),
            DisplayStatus::Missed => write!(f, "missed"),
        }
    }
}

impl std::str::FromStr for DisplayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(DisplayStatus::Completed),
            "ongoing" => Ok(DisplayStatus::Ongoing),
            "missed" => Ok(DisplayStatus::Missed),
            _ => Err(format!("Unknown display status: {}", s)),
        }
    }
}

/// Status filter accepted by call listings
///
/// Display values match on the collapsed status, anything else on the raw provider value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    Display(DisplayStatus),
    Provider(ProviderCallStatus),
}

impl StatusFilter {
    /// Parse a query value; `all` and empty strings mean "no filter"
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return None;
        }

        Some(match value.parse::<DisplayStatus>() {
            Ok(display) => StatusFilter::Display(display),
            Err(_) => StatusFilter::Provider(ProviderCallStatus::from(value)),
        })
    }

    pub fn matches(&self, status: &ProviderCallStatus) -> bool {
        match self {
            StatusFilter::Display(display) => status.display_status() == *display,
            StatusFilter::Provider(provider) => status == provider,
        }
    }

    /// Single provider value the filter can be pushed down as, if any
    pub fn provider_value(&self) -> Option<&str> {
        match self {
            StatusFilter::Display(DisplayStatus::Completed) => Some("completed"),
            StatusFilter::Display(_) => None,
            StatusFilter::Provider(status) => Some(status.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mapping() {
        assert_eq!(
            ProviderCallStatus::from("completed").display_status(),
            DisplayStatus::Completed
        );
        for s in ["in-progress", "ringing", "queued", "initiated"] {
            assert_eq!(
                ProviderCallStatus::from(s).display_status(),
                DisplayStatus::Ongoing,
                "{s}"
            );
        }
        for s in ["busy", "failed", "no-answer", "canceled"] {
            assert_eq!(
                ProviderCallStatus::from(s).display_status(),
                DisplayStatus::Missed,
                "{s}"
            );
        }
        // Unrecognised values fall back to completed
        assert_eq!(
            ProviderCallStatus::from("answered").display_status(),
            DisplayStatus::Completed
        );
    }

    #[test]
    fn test_terminal_statuses() {
        for status in ["completed", "busy", "failed", "no-answer", "canceled"] {
            assert!(ProviderCallStatus::from(status).is_terminal(), "{}", status);
        }
        for status in ["queued", "initiated", "ringing", "in-progress", "answered"] {
            assert!(!ProviderCallStatus::from(status).is_terminal(), "{}", status);
        }
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status = ProviderCallStatus::from("answered");
        assert_eq!(status, ProviderCallStatus::Other("answered".to_string()));
        assert_eq!(status.to_string(), "answered");
    }

    #[test]
    fn test_serde_uses_wire_values() {
        let json = serde_json::to_string(&ProviderCallStatus::NoAnswer).unwrap();
        assert_eq!(json, "\"no-answer\"");

        let parsed: ProviderCallStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, ProviderCallStatus::InProgress);

        let display = serde_json::to_string(&DisplayStatus::Ongoing).unwrap();
        assert_eq!(display, "\"ongoing\"");
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse("all"), None);
        assert_eq!(StatusFilter::parse(""), None);
        assert_eq!(
            StatusFilter::parse("missed"),
            Some(StatusFilter::Display(DisplayStatus::Missed))
        );
        assert_eq!(
            StatusFilter::parse("busy"),
            Some(StatusFilter::Provider(ProviderCallStatus::Busy))
        );
    }

    #[test]
    fn test_status_filter_matches() {
        let missed = StatusFilter::Display(DisplayStatus::Missed);
        assert!(missed.matches(&ProviderCallStatus::NoAnswer));
        assert!(missed.matches(&ProviderCallStatus::Busy));
        assert!(!missed.matches(&ProviderCallStatus::Completed));

        let busy = StatusFilter::Provider(ProviderCallStatus::Busy);
        assert!(busy.matches(&ProviderCallStatus::Busy));
        assert!(!busy.matches(&ProviderCallStatus::NoAnswer));
    }
}

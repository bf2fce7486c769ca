//! Recording - audio captured by the provider for a call

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CallDuration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub sid: String,
    pub call_sid: Option<String>,
    pub duration: CallDuration,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRoster {
    pub format_version: String,
    pub event_slug: String,
    pub participants: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    /// Label of the line-time the archer asked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_line_time: Option<String>,
}

impl RosterEntry {
    /// Email in the form used for matching, or `None` when blank.
    pub fn email_key(&self) -> Option<String> {
        email_key(self.email.as_deref())
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

pub(crate) fn email_key(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

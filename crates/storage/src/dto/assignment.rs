use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for running line-time assignment on an event
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AssignRequest {
    /// Clear every existing assignment before placing participants
    #[serde(default)]
    pub reset_existing: bool,
}

/// Outcome of one assignment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssignmentSummary {
    pub assigned: u32,
    pub waitlisted: u32,
    /// Already-assigned participants left untouched
    pub skipped: u32,
    /// Set when the run was a no-op, explaining why
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AssignmentSummary {
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetAssignmentsResponse {
    pub cleared: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_existing_defaults_to_false() {
        let req: AssignRequest = serde_json::from_str("{}").unwrap();
        assert!(!req.reset_existing);
    }

    #[test]
    fn test_reason_omitted_when_absent() {
        let json = serde_json::to_value(AssignmentSummary {
            assigned: 2,
            waitlisted: 1,
            skipped: 0,
            reason: None,
        })
        .unwrap();
        assert!(json.get("reason").is_none());

        let json = serde_json::to_value(AssignmentSummary::not_applicable("league")).unwrap();
        assert_eq!(json["reason"], "league");
        assert_eq!(json["assigned"], 0);
    }
}

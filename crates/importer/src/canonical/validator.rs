use super::models::{CanonicalRoster, FORMAT_VERSION};
use crate::{ImporterError, Result};
use std::collections::HashSet;
use storage::models::NormalizedArcherName;
use tracing::warn;

pub struct CanonicalValidator;

impl CanonicalValidator {
    pub fn validate(roster: &CanonicalRoster) -> Result<ValidationReport> {
        let report = Self::check(roster);

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    fn check(roster: &CanonicalRoster) -> ValidationReport {
        let mut report = ValidationReport::default();

        if roster.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                roster.format_version, FORMAT_VERSION
            ));
        }

        if roster.event_slug.trim().is_empty() {
            report.errors.push("Event slug is required".to_string());
        }

        if roster.participants.is_empty() {
            report
                .warnings
                .push("Roster has no participants".to_string());
        }

        let mut emails = HashSet::new();
        let mut names = HashSet::new();

        for (idx, entry) in roster.participants.iter().enumerate() {
            let label = format!("{}. {}", idx + 1, entry.label());

            if entry.first_name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Participant {} has empty first_name", idx + 1));
            }
            if entry.last_name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Participant {} has empty last_name", idx + 1));
            }

            match entry.email_key() {
                Some(email) => {
                    if !email.contains('@') {
                        report
                            .errors
                            .push(format!("Participant '{}' has invalid email: '{}'", label, email));
                    }
                    if !emails.insert(email.clone()) {
                        report
                            .errors
                            .push(format!("Duplicate email in roster: '{}'", email));
                    }
                }
                None => report
                    .warnings
                    .push(format!("Participant '{}' has no email; matching by name", label)),
            }

            let name = NormalizedArcherName::new(&entry.first_name, &entry.last_name);
            if !name.is_empty() && !names.insert(name) {
                report.warnings.push(format!(
                    "Participant '{}' repeats an earlier name; rows may merge",
                    label
                ));
            }

            if entry.division.as_deref().is_none_or(|d| d.trim().is_empty()) {
                report
                    .warnings
                    .push(format!("Participant '{}' has no division", label));
            }
        }

        report
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::models::RosterEntry;

    fn entry(first: &str, last: &str, email: Option<&str>) -> RosterEntry {
        RosterEntry {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.map(String::from),
            division: Some("Recurve".to_string()),
            preferred_line_time: None,
        }
    }

    fn roster(participants: Vec<RosterEntry>) -> CanonicalRoster {
        CanonicalRoster {
            format_version: FORMAT_VERSION.to_string(),
            event_slug: "spring-staged-2025".to_string(),
            participants,
        }
    }

    #[test]
    fn test_valid_roster_passes() {
        let report = CanonicalValidator::validate(&roster(vec![
            entry("Jane", "Doe", Some("jane@example.org")),
            entry("Sam", "Lee", Some("sam@example.org")),
        ]))
        .unwrap();

        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_wrong_version_is_an_error() {
        let mut roster = roster(vec![entry("Jane", "Doe", Some("jane@example.org"))]);
        roster.format_version = "0.9.0".to_string();

        assert!(CanonicalValidator::validate(&roster).is_err());
    }

    #[test]
    fn test_duplicate_email_differs_only_in_case() {
        let report = CanonicalValidator::check(&roster(vec![
            entry("Jane", "Doe", Some("jane@example.org")),
            entry("Janet", "Doe", Some("JANE@example.org")),
        ]));

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Duplicate email"));
    }

    #[test]
    fn test_empty_names_are_errors() {
        let report = CanonicalValidator::check(&roster(vec![entry(" ", "Doe", None)]));

        assert!(report.errors.iter().any(|e| e.contains("first_name")));
    }

    #[test]
    fn test_missing_email_and_repeated_name_are_warnings() {
        let report = CanonicalValidator::check(&roster(vec![
            entry("Jane", "Doe", None),
            entry("doe", "JANE", None),
        ]));

        assert!(report.errors.is_empty());
        assert_eq!(
            report
                .warnings
                .iter()
                .filter(|w| w.contains("no email"))
                .count(),
            2
        );
        assert!(report.warnings.iter().any(|w| w.contains("repeats")));
    }
}

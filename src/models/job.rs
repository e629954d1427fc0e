//! Job posting creation input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job form body as submitted by the dashboard.
///
/// Requirements and responsibilities arrive as newline-separated text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobCreationInput {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub deadline: String,
}

/// Validated job body sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub deadline: DateTime<Utc>,
}

impl JobCreationInput {
    pub fn validate(self) -> Result<NewJob, Vec<String>> {
        self.validate_at(Utc::now())
    }

    /// Validate against a fixed clock. Every violation is reported.
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<NewJob, Vec<String>> {
        let mut errors = Vec::new();

        let title_len = self.title.chars().count();
        if title_len < 3 {
            errors.push("Job title must be at least 3 characters".to_string());
        } else if title_len > 100 {
            errors.push("Job title must be at most 100 characters".to_string());
        }

        let description_len = self.description.chars().count();
        if description_len < 20 {
            errors.push("Description must be at least 20 characters".to_string());
        } else if description_len > 5000 {
            errors.push("Description must be at most 5000 characters".to_string());
        }

        if self.requirements.chars().count() < 10 {
            errors.push("Requirements must be at least 10 characters".to_string());
        }
        if self.responsibilities.chars().count() < 10 {
            errors.push("Responsibilities must be at least 10 characters".to_string());
        }

        let deadline = match parse_deadline(&self.deadline) {
            Some(deadline) if deadline > now => Some(deadline),
            _ => {
                errors.push("Deadline must be in the future".to_string());
                None
            }
        };

        match deadline {
            Some(deadline) if errors.is_empty() => Ok(NewJob {
                title: self.title,
                description: self.description,
                requirements: split_lines(&self.requirements),
                responsibilities: split_lines(&self.responsibilities),
                deadline,
            }),
            _ => Err(errors),
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts RFC 3339, `datetime-local` (`YYYY-MM-DDTHH:MM`), or a bare date.
/// Values without an offset are read as UTC.
fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn valid() -> JobCreationInput {
        JobCreationInput {
            title: "Backend Engineer".into(),
            description: "Build and run the hiring platform services.".into(),
            requirements: "Rust\n\n  \nPostgres".into(),
            responsibilities: "Own the API\nOn-call rotation".into(),
            deadline: "2026-02-01".into(),
        }
    }

    #[test]
    fn test_valid_input_splits_lines() {
        let job = valid().validate_at(now()).unwrap();
        assert_eq!(job.requirements, vec!["Rust", "Postgres"]);
        assert_eq!(job.responsibilities.len(), 2);
        assert_eq!(job.deadline, Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_collects_every_violation() {
        let input = JobCreationInput {
            title: "QA".into(),
            description: "too short".into(),
            requirements: "short".into(),
            responsibilities: "short".into(),
            deadline: "2025-12-31".into(),
        };
        let errors = input.validate_at(now()).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&"Deadline must be in the future".to_string()));
    }

    #[test]
    fn test_upper_bounds() {
        let input = JobCreationInput {
            title: "x".repeat(101),
            description: "y".repeat(5001),
            ..valid()
        };
        let errors = input.validate_at(now()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Job title must be at most 100 characters".to_string(),
                "Description must be at most 5000 characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_deadline_formats() {
        assert!(parse_deadline("2026-03-01T09:30:00Z").is_some());
        assert!(parse_deadline("2026-03-01T09:30:00+02:00").is_some());
        assert!(parse_deadline("2026-03-01T09:30").is_some());
        assert!(parse_deadline("2026-03-01").is_some());
        assert!(parse_deadline("next tuesday").is_none());
        assert!(parse_deadline("").is_none());
    }

    #[test]
    fn test_deadline_now_is_not_future() {
        let input = JobCreationInput {
            deadline: "2026-01-01T12:00:00Z".into(),
            ..valid()
        };
        assert!(input.validate_at(now()).is_err());
    }
}

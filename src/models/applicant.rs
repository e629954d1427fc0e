use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Review stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicantStatus {
    Applied,
    Interviewing,
    Hired,
    Rejected,
    Shortlisted,
}

impl ApplicantStatus {
    pub const ALL: [ApplicantStatus; 5] = [
        ApplicantStatus::Applied,
        ApplicantStatus::Interviewing,
        ApplicantStatus::Hired,
        ApplicantStatus::Rejected,
        ApplicantStatus::Shortlisted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Applied => "APPLIED",
            ApplicantStatus::Interviewing => "INTERVIEWING",
            ApplicantStatus::Hired => "HIRED",
            ApplicantStatus::Rejected => "REJECTED",
            ApplicantStatus::Shortlisted => "SHORTLISTED",
        }
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid status: {s}"))
    }
}

/// Body of a status change request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

/// Status change forwarded upstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub job_id: String,
    pub status: ApplicantStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!("SHORTLISTED".parse::<ApplicantStatus>(), Ok(ApplicantStatus::Shortlisted));
        assert!("shortlisted".parse::<ApplicantStatus>().is_err());
        assert!("PENDING".parse::<ApplicantStatus>().is_err());
    }

    #[test]
    fn test_status_change_wire_format() {
        let change = StatusChange {
            job_id: "job-1".into(),
            status: ApplicantStatus::Hired,
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            serde_json::json!({"jobId": "job-1", "status": "HIRED"})
        );
    }
}

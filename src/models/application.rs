use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::job::JobDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    Applied,
    Reviewing,
    Interview,
    Offered,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Reviewing => "REVIEWING",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Hired => "HIRED",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "APPLIED" => Some(ApplicationStatus::Applied),
            "REVIEWING" => Some(ApplicationStatus::Reviewing),
            "INTERVIEW" => Some(ApplicationStatus::Interview),
            "OFFERED" => Some(ApplicationStatus::Offered),
            "REJECTED" => Some(ApplicationStatus::Rejected),
            "HIRED" => Some(ApplicationStatus::Hired),
            _ => None,
        }
    }

    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Interview,
        ApplicationStatus::Offered,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Applied
    }
}

/// Denormalizes `company_id` onto the row (copied from the parent job at
/// creation, immutable thereafter) so ownership scoping never requires a
/// join and a company can never reassign one of its applications to
/// another job's company.
#[derive(Debug, Clone, FromRow)]
pub struct Application {
    pub application_id: i64,
    pub job_id: i64,
    pub candidate_id: i64,
    pub company_id: i64,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDto {
    pub application_id: i64,
    pub job_id: i64,
    pub candidate_id: i64,
    pub company_id: i64,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobDto>,
}

impl ApplicationDto {
    pub fn from_application(application: Application, job: Option<JobDto>) -> Self {
        ApplicationDto {
            application_id: application.application_id,
            job_id: application.job_id,
            candidate_id: application.candidate_id,
            company_id: application.company_id,
            status: application.status,
            applied_at: application.applied_at,
            updated_at: application.updated_at,
            job,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    pub job_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
}

/// Returned instead of mutating when `status` falls outside the enum —
/// the caller sees what it tried and what would have been accepted.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidStatusResponse {
    pub status: &'static str,
    pub allowed: Vec<&'static str>,
}

impl InvalidStatusResponse {
    pub fn new() -> Self {
        InvalidStatusResponse {
            status: "invalid_status",
            allowed: ApplicationStatus::ALL.iter().map(|s| s.as_str()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortDir")]
    pub sort_dir: Option<String>,
    pub status: Option<String>,
    pub job_id: Option<i64>,
    pub company_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// One entry per status in `ApplicationStatus::ALL`, zero-filled for
/// statuses with no applications — never a sparse map.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

pub const APPLICATION_SORT_FIELDS: [&str; 2] = ["applied_at", "createdAt"];
pub const APPLICATION_DEFAULT_SORT_FIELD: &str = "applied_at";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in ApplicationStatus::ALL {
            let parsed = ApplicationStatus::from_str_loose(status.as_str());
            assert_eq!(parsed.map(|s| s.as_str()), Some(status.as_str()));
        }
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(ApplicationStatus::from_str_loose("interview"), Some(ApplicationStatus::Interview));
    }

    #[test]
    fn unknown_status_string_rejected() {
        assert_eq!(ApplicationStatus::from_str_loose("ghosted"), None);
    }

    #[test]
    fn invalid_status_response_lists_every_allowed_value() {
        let response = InvalidStatusResponse::new();
        assert_eq!(response.status, "invalid_status");
        assert_eq!(response.allowed.len(), ApplicationStatus::ALL.len());
    }
}

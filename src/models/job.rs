use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::company::CompanyDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkLocationType {
    Onsite,
    Hybrid,
    Remote,
}

impl WorkLocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkLocationType::Onsite => "ONSITE",
            WorkLocationType::Hybrid => "HYBRID",
            WorkLocationType::Remote => "REMOTE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayPeriod {
    Hourly,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl PayPeriod {
    /// Annualization factor used by `normalized_salary`.
    pub fn factor(&self) -> f64 {
        match self {
            PayPeriod::Hourly => 2080.0,
            PayPeriod::Weekly => 52.0,
            PayPeriod::Biweekly => 26.0,
            PayPeriod::Monthly => 12.0,
            PayPeriod::Yearly => 1.0,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "HOURLY" => Some(PayPeriod::Hourly),
            "WEEKLY" => Some(PayPeriod::Weekly),
            "BIWEEKLY" => Some(PayPeriod::Biweekly),
            "MONTHLY" => Some(PayPeriod::Monthly),
            "YEARLY" => Some(PayPeriod::Yearly),
            _ => None,
        }
    }
}

/// `normalized_salary = ((min+max)/2) * factor(pay_period)`. Recomputed on
/// create and whenever `min_salary`/`max_salary`/`pay_period` changes.
pub fn compute_normalized_salary(
    min_salary: Option<i64>,
    max_salary: Option<i64>,
    pay_period: Option<PayPeriod>,
) -> Option<f64> {
    let (min, max, period) = (min_salary?, max_salary?, pay_period?);
    Some(((min + max) as f64 / 2.0) * period.factor())
}

#[derive(Debug, Clone, FromRow)]
pub struct Job {
    pub job_id: i64,
    pub title: String,
    pub description: String,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub pay_period: Option<String>,
    pub currency: Option<String>,
    pub listed_time: Option<DateTime<Utc>>,
    pub work_type: Option<String>,
    pub work_location_type: Option<String>,
    pub normalized_salary: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub company_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn validate_salary_invariant(&self) -> bool {
        match (self.min_salary, self.max_salary) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    pub fn recompute_normalized_salary(&mut self) {
        let period = self.pay_period.as_deref().and_then(PayPeriod::from_str_loose);
        self.normalized_salary = compute_normalized_salary(self.min_salary, self.max_salary, period);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDto {
    pub job_id: i64,
    pub title: String,
    pub description: String,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub pay_period: Option<String>,
    pub currency: Option<String>,
    pub listed_time: Option<DateTime<Utc>>,
    pub work_type: Option<String>,
    pub work_location_type: Option<String>,
    pub normalized_salary: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub company_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only populated when `include_company` wasn't explicitly `false`.
    /// Never re-embeds anything pointing back at this job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyDto>,
}

impl JobDto {
    pub fn from_job(job: Job, company: Option<CompanyDto>) -> Self {
        JobDto {
            job_id: job.job_id,
            title: job.title,
            description: job.description,
            min_salary: job.min_salary,
            max_salary: job.max_salary,
            pay_period: job.pay_period,
            currency: job.currency,
            listed_time: job.listed_time,
            work_type: job.work_type,
            work_location_type: job.work_location_type,
            normalized_salary: job.normalized_salary,
            city: job.city,
            state: job.state,
            country: job.country,
            company_id: job.company_id,
            created_at: job.created_at,
            updated_at: job.updated_at,
            company,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub pay_period: Option<String>,
    pub currency: Option<String>,
    pub work_type: Option<String>,
    pub work_location_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    /// Admin must supply this on create; ignored for company actors,
    /// who are always the owner.
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub description: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub pay_period: Option<String>,
    pub currency: Option<String>,
    pub work_type: Option<String>,
    pub work_location_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortDir")]
    pub sort_dir: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub work_type: Option<String>,
    pub work_location_type: Option<String>,
    pub pay_period: Option<String>,
    pub company_id: Option<i64>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub min_norm_salary: Option<i64>,
    pub max_norm_salary: Option<i64>,
    pub listed_from: Option<String>,
    pub listed_to: Option<String>,
    pub include_company: Option<bool>,
}

pub const JOB_SORT_FIELDS: [&str; 5] = [
    "listed_time",
    "min_salary",
    "max_salary",
    "normalized_salary",
    "createdAt",
];

pub const JOB_DEFAULT_SORT_FIELD: &str = "listed_time";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_salary_matches_factor_table() {
        assert_eq!(
            compute_normalized_salary(Some(20), Some(40), Some(PayPeriod::Hourly)),
            Some(30.0 * 2080.0)
        );
        assert_eq!(
            compute_normalized_salary(Some(1000), Some(2000), Some(PayPeriod::Monthly)),
            Some(1500.0 * 12.0)
        );
        assert_eq!(
            compute_normalized_salary(Some(50000), Some(70000), Some(PayPeriod::Yearly)),
            Some(60000.0)
        );
    }

    #[test]
    fn normalized_salary_absent_when_any_input_missing() {
        assert_eq!(compute_normalized_salary(None, Some(1), Some(PayPeriod::Yearly)), None);
        assert_eq!(compute_normalized_salary(Some(1), Some(2), None), None);
    }

    #[test]
    fn pay_period_parses_case_insensitively() {
        assert_eq!(PayPeriod::from_str_loose("yearly"), Some(PayPeriod::Yearly));
        assert_eq!(PayPeriod::from_str_loose("BIWEEKLY"), Some(PayPeriod::Biweekly));
        assert_eq!(PayPeriod::from_str_loose("quarterly"), None);
    }
}

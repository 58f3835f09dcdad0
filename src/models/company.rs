use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Storage row. `company_id` is the Counter-minted identifier and the
/// table's primary key at once.
#[derive(Debug, Clone, FromRow)]
pub struct Company {
    pub company_id: i64,
    pub name: String,
    pub description: String,
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub url: Option<String>,
    pub company_size_min: Option<i32>,
    pub company_size_max: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// `company_size_min <= company_size_max` when both present.
    pub fn validate_size_invariant(&self) -> bool {
        match (self.company_size_min, self.company_size_max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// Wire DTO: strips nothing internal (there's nothing internal to strip —
/// `company_id` *is* the primary key) but attaches the derived logo URL.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDto {
    pub company_id: i64,
    pub name: String,
    pub description: String,
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub url: Option<String>,
    pub company_size_min: Option<i32>,
    pub company_size_max: Option<i32>,
    pub logo_full_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyDto {
    /// `logo_full_path` matches `{api_base_url}/company_logos/processed/{company_id}.png`
    /// for every company; `None` only if the caller has no base URL to
    /// derive from.
    pub fn from_company(company: Company, api_base_url: Option<&str>) -> Self {
        let logo_full_path = api_base_url
            .map(|base| format!("{}/company_logos/processed/{}.png", base.trim_end_matches('/'), company.company_id));

        CompanyDto {
            company_id: company.company_id,
            name: company.name,
            description: company.description,
            country: company.country,
            state: company.state,
            city: company.city,
            address: company.address,
            url: company.url,
            company_size_min: company.company_size_min,
            company_size_max: company.company_size_max,
            logo_full_path,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    pub company_size_min: Option<i32>,
    pub company_size_max: Option<i32>,
    /// Required when an admin creates a company on behalf of someone else.
    /// Ignored for non-admin actors, who are always the owner.
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 10000))]
    pub description: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    pub company_size_min: Option<i32>,
    pub company_size_max: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
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
    pub min_size: Option<i32>,
    pub max_size: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Company {
        Company {
            company_id: 1,
            name: "Acme".into(),
            description: "desc".into(),
            country: "USA".into(),
            state: None,
            city: None,
            address: None,
            url: None,
            company_size_min: Some(10),
            company_size_max: Some(5),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn size_invariant_catches_inverted_range() {
        assert!(!sample().validate_size_invariant());
    }

    #[test]
    fn logo_path_derives_from_base_url() {
        let dto = CompanyDto::from_company(sample(), Some("https://api.example.com/"));
        assert_eq!(
            dto.logo_full_path.as_deref(),
            Some("https://api.example.com/company_logos/processed/1.png")
        );
    }

    #[test]
    fn logo_path_is_none_without_base_url() {
        let dto = CompanyDto::from_company(sample(), None);
        assert_eq!(dto.logo_full_path, None);
    }
}

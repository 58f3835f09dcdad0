use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::company::CompanyDto;

#[derive(Debug, Clone, FromRow)]
pub struct FeaturedCompany {
    pub company_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedCompanyDto {
    pub company: CompanyDto,
    pub featured_at: DateTime<Utc>,
}

impl FeaturedCompanyDto {
    pub fn from_featured(featured: FeaturedCompany, company: CompanyDto) -> Self {
        FeaturedCompanyDto {
            company,
            featured_at: featured.created_at,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Storage row keeps contact fields flat (`contact_email`, `contact_phone`,
/// `contact_linkedin_url`) since there's no native Postgres row type in
/// play; `Contact` is assembled on the way out and flattened on the way in.
#[derive(Debug, Clone, FromRow)]
pub struct Candidate {
    pub candidate_id: i64,
    pub full_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub contact_linkedin_url: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub headline: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateDto {
    pub candidate_id: i64,
    pub full_name: String,
    pub contact: Contact,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub headline: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateDto {
    fn from(candidate: Candidate) -> Self {
        CandidateDto {
            candidate_id: candidate.candidate_id,
            full_name: candidate.full_name,
            contact: Contact {
                email: candidate.contact_email,
                phone: candidate.contact_phone,
                linkedin_url: candidate.contact_linkedin_url,
            },
            country: candidate.country,
            state: candidate.state,
            city: candidate.city,
            headline: candidate.headline,
            created_at: candidate.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCandidateRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 200))]
    pub headline: Option<String>,
}

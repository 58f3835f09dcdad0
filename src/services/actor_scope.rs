//! Pure predicates over `{type, company_id, candidate_id}` that gate
//! mutations and cross-actor reads. Every mutation path and privileged read
//! consults one of these before touching storage.

use std::collections::HashSet;

use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::actor::{Actor, ActorType};

pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor> {
    actor.ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
}

pub fn require_type(actor: &Actor, allowed: &HashSet<ActorType>) -> Result<()> {
    if allowed.contains(&actor.actor_type) {
        Ok(())
    } else {
        Err(AppError::Forbidden("actor type not permitted for this action".to_string()))
    }
}

/// Admits admin unconditionally; admits candidate only when
/// `actor.candidate_id == candidate_id`.
pub fn require_self_candidate(actor: &Actor, candidate_id: i64) -> Result<()> {
    if actor.is_admin() {
        return Ok(());
    }
    if actor.is_candidate() && actor.candidate_id == Some(candidate_id) {
        return Ok(());
    }
    Err(AppError::Forbidden("not the owning candidate".to_string()))
}

/// Admits admin unconditionally; admits company only when
/// `actor.company_id == company_id`.
pub fn require_self_company(actor: &Actor, company_id: i64) -> Result<()> {
    if actor.is_admin() {
        return Ok(());
    }
    if actor.is_company() && actor.company_id == Some(company_id) {
        return Ok(());
    }
    Err(AppError::Forbidden("not the owning company".to_string()))
}

/// Admits admin; admits the candidate owner; admits the company matching
/// `application.company_id`.
pub fn require_application_ownership(actor: &Actor, application_candidate_id: i64, application_company_id: i64) -> Result<()> {
    if actor.is_admin() {
        return Ok(());
    }
    if actor.is_candidate() && actor.candidate_id == Some(application_candidate_id) {
        return Ok(());
    }
    if actor.is_company() && actor.company_id == Some(application_company_id) {
        return Ok(());
    }
    Err(AppError::Forbidden("not a party to this application".to_string()))
}

/// True iff at least one Application ties `company_id` to `candidate_id` —
/// the only basis on which a company may view a candidate's profile
/// outside of its own roster.
pub async fn company_can_view_candidate(db: &PgPool, company_id: i64, candidate_id: i64) -> Result<bool> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(
             SELECT 1 FROM applications WHERE company_id = $1 AND candidate_id = $2
         )",
    )
    .bind(company_id)
    .bind(candidate_id)
    .fetch_one(db)
    .await?;

    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(actor_type: ActorType, company_id: Option<i64>, candidate_id: Option<i64>) -> Actor {
        Actor {
            actor_type,
            user_id: 1,
            company_id,
            candidate_id,
        }
    }

    #[test]
    fn require_actor_rejects_absent_actor() {
        assert!(matches!(require_actor(None), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn require_actor_admits_present_actor() {
        let a = actor(ActorType::Admin, None, None);
        assert!(require_actor(Some(&a)).is_ok());
    }

    #[test]
    fn require_type_rejects_unlisted_type() {
        let a = actor(ActorType::Candidate, None, Some(1));
        let allowed: HashSet<ActorType> = [ActorType::Admin, ActorType::Company].into_iter().collect();
        assert!(require_type(&a, &allowed).is_err());
    }

    #[test]
    fn require_self_candidate_admits_admin_and_owner_only() {
        let admin = actor(ActorType::Admin, None, None);
        let owner = actor(ActorType::Candidate, None, Some(7));
        let other = actor(ActorType::Candidate, None, Some(8));

        assert!(require_self_candidate(&admin, 7).is_ok());
        assert!(require_self_candidate(&owner, 7).is_ok());
        assert!(require_self_candidate(&other, 7).is_err());
    }

    #[test]
    fn require_self_company_admits_admin_and_owner_only() {
        let admin = actor(ActorType::Admin, None, None);
        let owner = actor(ActorType::Company, Some(3), None);
        let other = actor(ActorType::Company, Some(4), None);

        assert!(require_self_company(&admin, 3).is_ok());
        assert!(require_self_company(&owner, 3).is_ok());
        assert!(require_self_company(&other, 3).is_err());
    }

    #[test]
    fn require_application_ownership_admits_candidate_or_company_party() {
        let candidate = actor(ActorType::Candidate, None, Some(7));
        let company = actor(ActorType::Company, Some(3), None);
        let stranger_candidate = actor(ActorType::Candidate, None, Some(99));
        let stranger_company = actor(ActorType::Company, Some(99), None);

        assert!(require_application_ownership(&candidate, 7, 3).is_ok());
        assert!(require_application_ownership(&company, 7, 3).is_ok());
        assert!(require_application_ownership(&stranger_candidate, 7, 3).is_err());
        assert!(require_application_ownership(&stranger_company, 7, 3).is_err());
    }
}

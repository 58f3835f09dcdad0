//! Translates request parameters into storage-layer predicates.
//!
//! These builders only *describe* predicates; they don't know how to run a
//! query. Handlers turn a `JobFilters`/`CompanyFilters`/`ApplicationFilters`
//! into a `sqlx::QueryBuilder` WHERE clause, and the rankers apply the same
//! predicates as plain Rust closures when filtering in-memory rows.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::models::actor::Actor;

#[derive(Debug, Clone, Default)]
pub struct JobFilters {
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
    pub listed_from: Option<DateTime<Utc>>,
    pub listed_to: Option<DateTime<Utc>>,
    /// Set when `work_location_type` was supplied but didn't match the enum
    /// — the query must short-circuit to an empty result, not an error.
    pub unsatisfiable: bool,
}

impl JobFilters {
    /// Appends this filter set's predicates to an existing `WHERE ...`
    /// clause already opened by the caller (so multiple filter sets, e.g.
    /// base + ownership, can be combined into one statement).
    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(v) = &self.country {
            qb.push(" AND country = ").push_bind(v.clone());
        }
        if let Some(v) = &self.state {
            qb.push(" AND state = ").push_bind(v.clone());
        }
        if let Some(v) = &self.city {
            qb.push(" AND city = ").push_bind(v.clone());
        }
        if let Some(v) = &self.work_type {
            qb.push(" AND work_type = ").push_bind(v.clone());
        }
        if let Some(v) = &self.work_location_type {
            qb.push(" AND work_location_type = ").push_bind(v.clone());
        }
        if let Some(v) = &self.pay_period {
            qb.push(" AND pay_period = ").push_bind(v.clone());
        }
        if let Some(v) = self.company_id {
            qb.push(" AND company_id = ").push_bind(v);
        }
        if let Some(v) = self.min_salary {
            qb.push(" AND min_salary >= ").push_bind(v);
        }
        if let Some(v) = self.max_salary {
            qb.push(" AND max_salary <= ").push_bind(v);
        }
        if let Some(v) = self.min_norm_salary {
            qb.push(" AND normalized_salary >= ").push_bind(v as f64);
        }
        if let Some(v) = self.max_norm_salary {
            qb.push(" AND normalized_salary <= ").push_bind(v as f64);
        }
        if let Some(v) = self.listed_from {
            qb.push(" AND listed_time >= ").push_bind(v);
        }
        if let Some(v) = self.listed_to {
            qb.push(" AND listed_time <= ").push_bind(v);
        }
        if self.unsatisfiable {
            // `work_location_type` was present but not in the allow-list:
            // force zero rows without raising an error.
            qb.push(" AND 1 = 0");
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyFilters {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub min_size: Option<i32>,
    pub max_size: Option<i32>,
}

impl CompanyFilters {
    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(v) = &self.country {
            qb.push(" AND country = ").push_bind(v.clone());
        }
        if let Some(v) = &self.state {
            qb.push(" AND state = ").push_bind(v.clone());
        }
        if let Some(v) = &self.city {
            qb.push(" AND city = ").push_bind(v.clone());
        }
        if let Some(v) = self.min_size {
            qb.push(" AND company_size_max >= ").push_bind(v);
        }
        if let Some(v) = self.max_size {
            qb.push(" AND company_size_min <= ").push_bind(v);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilters {
    pub company_id: Option<i64>,
    pub job_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ApplicationFilters {
    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(v) = self.company_id {
            qb.push(" AND company_id = ").push_bind(v);
        }
        if let Some(v) = self.job_id {
            qb.push(" AND job_id = ").push_bind(v);
        }
        if let Some(v) = self.candidate_id {
            qb.push(" AND candidate_id = ").push_bind(v);
        }
        if let Some(v) = &self.status {
            qb.push(" AND status = ").push_bind(v.clone());
        }
        if let Some(v) = self.from {
            qb.push(" AND applied_at >= ").push_bind(v);
        }
        if let Some(v) = self.to {
            qb.push(" AND applied_at <= ").push_bind(v);
        }
    }
}

/// Augments a job/application filter set with ownership scope for non-admin
/// actors. Admins see everything; a company actor is pinned to
/// its own `company_id`; a candidate actor is pinned to its own
/// `candidate_id`. Call this only for endpoints whose semantics demand
/// ownership scoping (company/candidate "my X" listings) — public listings
/// don't call it at all.
pub fn apply_company_ownership(filters: &mut JobFilters, actor: &Actor) {
    if let Some(company_id) = actor.company_id {
        if !actor.is_admin() {
            filters.company_id = Some(company_id);
        }
    }
}

pub fn apply_application_ownership(filters: &mut ApplicationFilters, actor: &Actor) {
    if !actor.is_admin() {
        if let Some(company_id) = actor.company_id {
            filters.company_id = Some(company_id);
        }
        if let Some(candidate_id) = actor.candidate_id {
            filters.candidate_id = Some(candidate_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::actor::ActorType;

    fn company_actor(company_id: i64) -> Actor {
        Actor {
            actor_type: ActorType::Company,
            user_id: 1,
            company_id: Some(company_id),
            candidate_id: None,
        }
    }

    fn admin_actor() -> Actor {
        Actor {
            actor_type: ActorType::Admin,
            user_id: 1,
            company_id: None,
            candidate_id: None,
        }
    }

    #[test]
    fn company_ownership_scopes_non_admin() {
        let mut filters = JobFilters::default();
        apply_company_ownership(&mut filters, &company_actor(42));
        assert_eq!(filters.company_id, Some(42));
    }

    #[test]
    fn admin_is_not_scoped() {
        let mut filters = JobFilters::default();
        apply_company_ownership(&mut filters, &admin_actor());
        assert_eq!(filters.company_id, None);
    }
}

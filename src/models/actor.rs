//! The resolved caller identity consumed (never persisted) by the core.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Admin,
    Company,
    Candidate,
}

/// `{type, user_id, company_id?, candidate_id?}` — rebuilt per request by
/// `middleware::auth` from an already-verified JWT. The core treats this as
/// opaque input and never writes it to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    #[serde(rename = "type")]
    pub actor_type: ActorType,
    pub user_id: i64,
    pub company_id: Option<i64>,
    pub candidate_id: Option<i64>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.actor_type == ActorType::Admin
    }

    pub fn is_company(&self) -> bool {
        self.actor_type == ActorType::Company
    }

    pub fn is_candidate(&self) -> bool {
        self.actor_type == ActorType::Candidate
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::Config;
use crate::models::actor::{Actor, ActorType};

/// `sub` is the Counter-minted `user_id`, carried as a string since JWT
/// claims are conventionally textual; `jti` is still a UUID since token ids
/// have no ordering or lookup requirement that would call for a Counter.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(rename = "actor_type")]
    pub actor_type: String,
    pub company_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, std::num::ParseIntError> {
        self.sub.parse()
    }

    pub fn to_actor(&self) -> Option<Actor> {
        let actor_type = match self.actor_type.as_str() {
            "admin" => ActorType::Admin,
            "company" => ActorType::Company,
            "candidate" => ActorType::Candidate,
            _ => return None,
        };

        Some(Actor {
            actor_type,
            user_id: self.user_id().ok()?,
            company_id: self.company_id,
            candidate_id: self.candidate_id,
        })
    }
}

fn actor_type_str(actor_type: ActorType) -> &'static str {
    match actor_type {
        ActorType::Admin => "admin",
        ActorType::Company => "company",
        ActorType::Candidate => "candidate",
    }
}

pub fn create_access_token(
    user_id: i64,
    email: &str,
    actor_type: ActorType,
    company_id: Option<i64>,
    candidate_id: Option<i64>,
    config: &Config,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(config.jwt_access_expiry))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        actor_type: actor_type_str(actor_type).to_string(),
        company_id,
        candidate_id,
        exp: expiration as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(config.jwt_secret.as_bytes()))?;

    Ok((token, config.jwt_access_expiry))
}

pub fn verify_access_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(config.jwt_secret.as_bytes()), &Validation::default())?;

    Ok(token_data.claims)
}

/// Generates a cryptographically secure random token (64-character hex
/// string); not currently issued by any endpoint, kept for the password
/// reset flow's token generation.
pub fn create_refresh_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            app_env: "test".to_string(),
            app_port: 8080,
            api_base_url: "http://localhost:8080".to_string(),
            host: "0.0.0.0".to_string(),
            database_url: "postgres://localhost/test".to_string(),
            database_max_connections: 5,
            jwt_secret: "test-secret".to_string(),
            jwt_access_expiry: 3600,
            password_salt_rounds: 12,
            location_tree_path: "data/locations.json".to_string(),
        }
    }

    #[test]
    fn round_trips_claims_through_encode_and_decode() {
        let cfg = config();
        let (token, expires_in) = create_access_token(42, "a@example.com", ActorType::Company, Some(7), None, &cfg).unwrap();
        assert_eq!(expires_in, 3600);

        let claims = verify_access_token(&token, &cfg).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.company_id, Some(7));

        let actor = claims.to_actor().unwrap();
        assert_eq!(actor.actor_type, ActorType::Company);
        assert_eq!(actor.company_id, Some(7));
    }

    #[test]
    fn create_refresh_token_is_unique_and_64_chars() {
        let a = create_refresh_token();
        let b = create_refresh_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn hash_token_is_deterministic() {
        assert_eq!(hash_token("x"), hash_token("x"));
    }
}

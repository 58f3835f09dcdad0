//! In-memory composite company ranker: a weighted score over name,
//! description, and location fields, run after a storage-level pre-filter
//! on the non-`q` predicates.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::company::Company;
use crate::query::text;

const NAME_EXACT: f64 = 400.0;
const NAME_PREFIX: f64 = 260.0;
const NAME_SUBSTRING: f64 = 180.0;

const LOCATION_EXACT: f64 = 220.0;
const LOCATION_PREFIX: f64 = 170.0;
const LOCATION_SUBSTRING: f64 = 140.0;

const DESCRIPTION_SUBSTRING: f64 = 90.0;

const NAME_COVERAGE_FULL: f64 = 200.0;
const NAME_COVERAGE_WEIGHT: f64 = 140.0;
const DESCRIPTION_COVERAGE_WEIGHT: f64 = 60.0;
const LOCATION_COVERAGE_WEIGHT: f64 = 160.0;
const ALL_COVERAGE_FULL: f64 = 150.0;
const ALL_COVERAGE_WEIGHT: f64 = 120.0;

const PER_TOKEN_NAME: f64 = 35.0;
const PER_TOKEN_LOCATION: f64 = 30.0;
const PER_TOKEN_DESCRIPTION: f64 = 15.0;

const IN_ORDER_ALL: f64 = 100.0;
const IN_ORDER_HALF: f64 = 50.0;

const LENGTH_PROXIMITY_CAP: f64 = 60.0;

const TOKEN_SET_EQUALITY: f64 = 180.0;

pub struct CompanyRanker;

#[derive(Debug, Clone)]
pub struct RankedCompany {
    pub company: Company,
    pub score: f64,
}

impl CompanyRanker {
    /// `score(c, q)`. Returns `0.0` for candidates the early reject drops:
    /// no token overlap with the name/description/location union and no
    /// substring hit anywhere.
    pub fn score(company: &Company, q_tokens: &[String], q_norm: &str) -> f64 {
        if q_tokens.is_empty() {
            return 0.0;
        }

        let name_norm = text::normalize(&company.name);
        let desc_norm = text::normalize(&company.description);
        let location_raw = format!(
            "{} {} {}",
            company.country,
            company.state.as_deref().unwrap_or(""),
            company.city.as_deref().unwrap_or("")
        );
        let location_norm = text::normalize(&location_raw);

        let name_tokens: HashSet<&str> = name_norm.split_whitespace().collect();
        let desc_tokens: HashSet<&str> = desc_norm.split_whitespace().collect();
        let location_tokens: HashSet<&str> = location_norm.split_whitespace().collect();

        let matches_name = q_tokens.iter().filter(|t| name_tokens.contains(t.as_str())).count();
        let matches_desc = q_tokens.iter().filter(|t| desc_tokens.contains(t.as_str())).count();
        let matches_location = q_tokens.iter().filter(|t| location_tokens.contains(t.as_str())).count();

        let has_substring_hit =
            name_norm.contains(q_norm) || desc_norm.contains(q_norm) || location_norm.contains(q_norm);
        let has_token_overlap = matches_name + matches_desc + matches_location > 0;
        if !has_token_overlap && !has_substring_hit {
            return 0.0;
        }

        let mut score = 0.0;

        score += if name_norm == q_norm {
            NAME_EXACT
        } else if name_norm.starts_with(q_norm) {
            NAME_PREFIX
        } else if name_norm.contains(q_norm) {
            NAME_SUBSTRING
        } else {
            0.0
        };

        score += if location_norm == q_norm {
            LOCATION_EXACT
        } else if location_norm.starts_with(q_norm) {
            LOCATION_PREFIX
        } else if location_norm.contains(q_norm) {
            LOCATION_SUBSTRING
        } else {
            0.0
        };

        if desc_norm.contains(q_norm) {
            score += DESCRIPTION_SUBSTRING;
        }

        let total_tokens = q_tokens.len() as f64;
        let r_name = matches_name as f64 / total_tokens;
        let r_desc = matches_desc as f64 / total_tokens;
        let r_location = matches_location as f64 / total_tokens;

        score += if r_name >= 1.0 {
            NAME_COVERAGE_FULL
        } else {
            (r_name * NAME_COVERAGE_WEIGHT).round()
        };
        score += (r_desc * DESCRIPTION_COVERAGE_WEIGHT).round();
        score += (r_location * LOCATION_COVERAGE_WEIGHT).round();

        let union_tokens: HashSet<&str> = q_tokens
            .iter()
            .map(String::as_str)
            .filter(|t| name_tokens.contains(t) || desc_tokens.contains(t) || location_tokens.contains(t))
            .collect();
        let r_all = union_tokens.len() as f64 / total_tokens;
        score += if r_all >= 1.0 {
            ALL_COVERAGE_FULL
        } else {
            (r_all * ALL_COVERAGE_WEIGHT).round()
        };

        for token in q_tokens {
            if name_tokens.contains(token.as_str()) {
                score += PER_TOKEN_NAME;
            }
            if location_tokens.contains(token.as_str()) {
                score += PER_TOKEN_LOCATION;
            }
            if desc_tokens.contains(token.as_str()) {
                score += PER_TOKEN_DESCRIPTION;
            }
        }

        let in_order_hits = tokens_in_order(&name_norm, q_tokens);
        if in_order_hits == q_tokens.len() {
            score += IN_ORDER_ALL;
        } else if in_order_hits * 2 >= q_tokens.len() {
            score += IN_ORDER_HALF;
        }

        let length_diff = (q_norm.chars().count() as i64 - name_norm.chars().count() as i64).unsigned_abs() as f64;
        score += (LENGTH_PROXIMITY_CAP - length_diff.min(LENGTH_PROXIMITY_CAP)).max(0.0);

        let q_token_set: HashSet<&str> = q_tokens.iter().map(String::as_str).collect();
        if q_token_set == name_tokens {
            score += TOKEN_SET_EQUALITY;
        }

        score
    }

    /// Scores every company, discards zero scores, and sorts `score DESC,
    /// name ASC (case-insensitive), created_at DESC`.
    pub fn rank(companies: Vec<Company>, q: &str) -> Vec<RankedCompany> {
        let q_tokens = text::tokenize(q);
        let q_norm = text::normalize(q);

        let mut ranked: Vec<RankedCompany> = companies
            .into_iter()
            .filter_map(|company| {
                let score = Self::score(&company, &q_tokens, &q_norm);
                if score > 0.0 {
                    Some(RankedCompany { company, score })
                } else {
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.company.name.to_lowercase().cmp(&b.company.name.to_lowercase()))
                .then_with(|| b.company.created_at.cmp(&a.company.created_at))
        });

        ranked
    }
}

/// Counts how many leading `tokens` appear in `haystack_norm` in order
/// (not necessarily contiguous); used for the in-order name bonus.
fn tokens_in_order(haystack_norm: &str, tokens: &[String]) -> usize {
    let words: Vec<&str> = haystack_norm.split_whitespace().collect();
    let mut cursor = 0;
    let mut hits = 0;
    for token in tokens {
        if let Some(pos) = words[cursor..].iter().position(|w| *w == token) {
            cursor += pos + 1;
            hits += 1;
        } else {
            break;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn company(name: &str) -> Company {
        Company {
            company_id: 1,
            name: name.to_string(),
            description: "a company".to_string(),
            country: "Chile".to_string(),
            state: None,
            city: None,
            address: None,
            url: None,
            company_size_min: None,
            company_size_max: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn exact_name_outranks_prefix_name() {
        let google = company("Google");
        let google_cloud = company("Google Cloud");

        let ranked = CompanyRanker::rank(vec![google, google_cloud], "google");
        assert_eq!(ranked[0].company.name, "Google");
    }

    #[test]
    fn multi_word_query_favors_exact_token_set_match() {
        let google = company("Google");
        let google_cloud = company("Google Cloud");

        let ranked = CompanyRanker::rank(vec![google, google_cloud], "google cloud");
        assert_eq!(ranked[0].company.name, "Google Cloud");
    }

    #[test]
    fn zero_score_candidates_are_discarded() {
        let unrelated = company("Zzyzx Holdings");
        let ranked = CompanyRanker::rank(vec![unrelated], "google");
        assert!(ranked.is_empty());
    }
}

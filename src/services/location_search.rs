//! Ranked auto-suggest over the flattened location index: a composite score
//! per entry, kept to the top `limit` via a bounded min-heap rather than a
//! full sort, since the index can hold tens of thousands of entries.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::models::location::{LocationEntry, LocationEntryType};
use crate::query::text;

const DEFAULT_LIMIT: usize = 20;

const TYPE_WEIGHT_CITY: f64 = 120.0;
const TYPE_WEIGHT_STATE: f64 = 90.0;
const TYPE_WEIGHT_COUNTRY: f64 = 70.0;

const MAIN_EXACT: f64 = 250.0;
const MAIN_PREFIX: f64 = 180.0;
const MAIN_SUBSTRING: f64 = 120.0;

const FULL_EXACT: f64 = 200.0;
const FULL_PREFIX: f64 = 140.0;
const FULL_SUBSTRING: f64 = 100.0;

const MAIN_COVERAGE_FULL: f64 = 150.0;
const MAIN_COVERAGE_WEIGHT: f64 = 90.0;
const ALL_COVERAGE_FULL: f64 = 100.0;
const ALL_COVERAGE_WEIGHT: f64 = 60.0;

const PER_TOKEN_MAIN: f64 = 35.0;
const PER_TOKEN_ALL: f64 = 15.0;

const IN_ORDER_ALL: f64 = 60.0;
const IN_ORDER_HALF: f64 = 30.0;

const LENGTH_PROXIMITY_CAP: f64 = 40.0;

const CITY_BOOST_CAP: f64 = 80.0;

fn type_weight(entry_type: LocationEntryType) -> f64 {
    match entry_type {
        LocationEntryType::City => TYPE_WEIGHT_CITY,
        LocationEntryType::State => TYPE_WEIGHT_STATE,
        LocationEntryType::Country => TYPE_WEIGHT_COUNTRY,
    }
}

/// `score(entry, q)`. Returns `0.0` for the early reject: no token overlap
/// with `tokens_all` and no substring hit in either `main_norm` or
/// `full_norm`.
pub fn score(entry: &LocationEntry, q_tokens: &[String], q_norm: &str) -> f64 {
    if q_tokens.is_empty() {
        return 0.0;
    }

    let main_hits = q_tokens.iter().filter(|t| entry.tokens_main.iter().any(|m| m == *t)).count();
    let all_hits = q_tokens.iter().filter(|t| entry.tokens_all.iter().any(|m| m == *t)).count();

    let has_substring_hit = entry.main_norm.contains(q_norm) || entry.full_norm.contains(q_norm);
    if all_hits == 0 && !has_substring_hit {
        return 0.0;
    }

    let mut score = type_weight(entry.entry_type);

    score += if entry.main_norm == q_norm {
        MAIN_EXACT
    } else if entry.main_norm.starts_with(q_norm) {
        MAIN_PREFIX
    } else if entry.main_norm.contains(q_norm) {
        MAIN_SUBSTRING
    } else {
        0.0
    };

    score += if entry.full_norm == q_norm {
        FULL_EXACT
    } else if entry.full_norm.starts_with(q_norm) {
        FULL_PREFIX
    } else if entry.full_norm.contains(q_norm) {
        FULL_SUBSTRING
    } else {
        0.0
    };

    let total_tokens = q_tokens.len() as f64;
    let r_main = main_hits as f64 / total_tokens;
    let r_all = all_hits as f64 / total_tokens;

    score += if r_main >= 1.0 {
        MAIN_COVERAGE_FULL
    } else {
        (r_main * MAIN_COVERAGE_WEIGHT).round()
    };
    score += if r_all >= 1.0 {
        ALL_COVERAGE_FULL
    } else {
        (r_all * ALL_COVERAGE_WEIGHT).round()
    };

    for token in q_tokens {
        if entry.tokens_main.iter().any(|m| m == token) {
            score += PER_TOKEN_MAIN;
        }
        if entry.tokens_all.iter().any(|m| m == token) {
            score += PER_TOKEN_ALL;
        }
    }

    let in_order_hits = tokens_in_order(&entry.tokens_main, q_tokens);
    if in_order_hits == q_tokens.len() {
        score += IN_ORDER_ALL;
    } else if in_order_hits * 2 >= q_tokens.len() {
        score += IN_ORDER_HALF;
    }

    let length_diff = (q_norm.chars().count() as i64 - entry.main_norm.chars().count() as i64).unsigned_abs() as f64;
    score += (LENGTH_PROXIMITY_CAP - length_diff.min(LENGTH_PROXIMITY_CAP)).max(0.0);

    if entry.entry_type == LocationEntryType::City {
        let main_quality = (r_main.min(1.0)) * CITY_BOOST_CAP;
        score += main_quality;
    }

    score
}

fn tokens_in_order(haystack_tokens: &[String], tokens: &[String]) -> usize {
    let mut cursor = 0;
    let mut hits = 0;
    for token in tokens {
        if let Some(pos) = haystack_tokens[cursor..].iter().position(|w| w == token) {
            cursor += pos + 1;
            hits += 1;
        } else {
            break;
        }
    }
    hits
}

#[derive(Debug, Clone)]
struct ScoredEntry<'a> {
    entry: &'a LocationEntry,
    score: f64,
}

impl PartialEq for ScoredEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}
impl Eq for ScoredEntry<'_> {}

impl PartialOrd for ScoredEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredEntry<'_> {
    /// Reversed so a `BinaryHeap` (normally max-heap) behaves as a min-heap
    /// keyed on score, letting us evict the worst of the top-K in `O(log k)`.
    fn cmp(&self, other: &Self) -> Ordering {
        other.score.partial_cmp(&self.score).unwrap_or(Ordering::Equal)
    }
}

/// Scores every entry, keeps only the best `limit` (default 20) via a
/// bounded min-heap, and returns them sorted `score DESC`.
pub fn suggest<'a>(entries: &'a [LocationEntry], q: &str, limit: Option<usize>) -> Vec<&'a LocationEntry> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let q_tokens = text::tokenize(q);
    let q_norm = text::normalize(q);

    if q_tokens.is_empty() {
        return Vec::new();
    }

    let mut heap: BinaryHeap<ScoredEntry<'a>> = BinaryHeap::with_capacity(limit + 1);

    for entry in entries {
        let s = score(entry, &q_tokens, &q_norm);
        if s <= 0.0 {
            continue;
        }

        if heap.len() < limit {
            heap.push(ScoredEntry { entry, score: s });
        } else if let Some(worst) = heap.peek() {
            if s > worst.score {
                heap.pop();
                heap.push(ScoredEntry { entry, score: s });
            }
        }
    }

    let mut out: Vec<ScoredEntry<'a>> = heap.into_vec();
    out.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    out.into_iter().map(|s| s.entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::LocationEntryType;

    fn entry(entry_type: LocationEntryType, main: &str, country: Option<&str>, state: Option<&str>) -> LocationEntry {
        LocationEntry::new(entry_type, main.to_string(), country.map(String::from), state.map(String::from))
    }

    #[test]
    fn city_outranks_state_and_country_on_exact_main_match() {
        let entries = vec![
            entry(LocationEntryType::Country, "Mexico", None, None),
            entry(LocationEntryType::State, "Coahuila", Some("Mexico"), None),
            entry(LocationEntryType::City, "Torreon", Some("Mexico"), Some("Coahuila")),
        ];

        let results = suggest(&entries, "Torreon", Some(20));
        assert_eq!(results[0].main, "Torreon");
    }

    #[test]
    fn respects_limit() {
        let entries: Vec<LocationEntry> = (0..50)
            .map(|i| entry(LocationEntryType::City, &format!("City{i}"), Some("Nowhere"), Some("Nowhere")))
            .collect();

        let results = suggest(&entries, "City", Some(5));
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn empty_query_returns_nothing() {
        let entries = vec![entry(LocationEntryType::Country, "Mexico", None, None)];
        assert!(suggest(&entries, "   ", None).is_empty());
    }
}

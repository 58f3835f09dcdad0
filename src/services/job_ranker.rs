//! Hybrid job ranking: text-index-like score + per-token hits + phrase hits
//! + recency decay. Jobs arrive already storage-pre-filtered on the base
//! (non-`q`) predicates; everything here runs in process over that set.

use chrono::{DateTime, Utc};

use crate::models::job::Job;
use crate::query::text;

const TEXT_SCORE_WEIGHT: f64 = 5.0;
const TITLE_TERM_WEIGHT: f64 = 4.0;
const DESC_TERM_WEIGHT: f64 = 1.0;
const ALL_TERMS_IN_TITLE_WEIGHT: f64 = 15.0;
const PHRASE_IN_TITLE_WEIGHT: f64 = 25.0;
const PHRASE_IN_DESC_WEIGHT: f64 = 8.0;

const RECENCY_CAP_DAYS: f64 = 60.0;
const DEFAULT_AGE_DAYS: f64 = 365.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

pub struct JobRanker;

#[derive(Debug, Clone)]
pub struct RankedJob {
    pub job: Job,
    pub final_score: f64,
}

impl JobRanker {
    /// A proxy for a native text index's term-frequency score: summed
    /// per-token occurrence counts across the normalized title and
    /// description. Strategy (b) keeps scoring in process rather than
    /// pushing a real inverted index into storage, so this approximates
    /// what the index's relevance score would contribute.
    fn text_score(title_norm: &str, desc_norm: &str, tokens: &[String]) -> f64 {
        tokens
            .iter()
            .map(|t| count_occurrences(title_norm, t) as f64 + count_occurrences(desc_norm, t) as f64)
            .sum()
    }

    fn recency_boost(listed_time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        let age_days = match listed_time {
            Some(listed) => (now - listed).num_seconds().max(0) as f64 / SECONDS_PER_DAY,
            None => DEFAULT_AGE_DAYS,
        };
        (RECENCY_CAP_DAYS - age_days).max(0.0)
    }

    /// `final_score` per the hybrid formula; ties are broken by
    /// `listed_time DESC` by the caller via `rank`.
    pub fn score(job: &Job, q_tokens: &[String], q_phrase: &str, now: DateTime<Utc>) -> f64 {
        let hits = TextHits::compute(job, q_tokens, q_phrase);
        let recency_boost = Self::recency_boost(job.listed_time, now);

        TEXT_SCORE_WEIGHT * hits.text_score
            + TITLE_TERM_WEIGHT * hits.title_hits as f64
            + DESC_TERM_WEIGHT * hits.desc_hits as f64
            + ALL_TERMS_IN_TITLE_WEIGHT * hits.all_terms_in_title as u8 as f64
            + PHRASE_IN_TITLE_WEIGHT * hits.phrase_in_title as u8 as f64
            + PHRASE_IN_DESC_WEIGHT * hits.phrase_in_desc as u8 as f64
            + recency_boost
    }

    /// The match-stage predicate: a job only reaches ranking when `q` hits
    /// its title or description, as a token or as the full phrase. When
    /// `q` carries no tokens and no phrase (blank/punctuation-only) every
    /// job passes, since there's nothing to match against.
    fn matches(job: &Job, q_tokens: &[String], q_phrase: &str) -> bool {
        if q_tokens.is_empty() && q_phrase.is_empty() {
            return true;
        }
        let hits = TextHits::compute(job, q_tokens, q_phrase);
        hits.title_hits + hits.desc_hits > 0 || hits.phrase_in_title || hits.phrase_in_desc
    }

    /// Filters to jobs that pass the text-index match stage, scores the
    /// survivors against `q`, and sorts `final_score DESC, listed_time
    /// DESC`. A `q` with no token or phrase hit in any job yields an empty
    /// result, never the unfiltered, recency-sorted set.
    pub fn rank(jobs: Vec<Job>, q: &str, now: DateTime<Utc>) -> Vec<RankedJob> {
        let q_tokens = text::tokenize(q);
        let q_phrase = text::normalize(q);

        let mut ranked: Vec<RankedJob> = jobs
            .into_iter()
            .filter(|job| Self::matches(job, &q_tokens, &q_phrase))
            .map(|job| {
                let final_score = Self::score(&job, &q_tokens, &q_phrase, now);
                RankedJob { job, final_score }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.job.listed_time.cmp(&a.job.listed_time))
        });

        ranked
    }
}

struct TextHits {
    text_score: f64,
    title_hits: usize,
    desc_hits: usize,
    all_terms_in_title: bool,
    phrase_in_title: bool,
    phrase_in_desc: bool,
}

impl TextHits {
    fn compute(job: &Job, q_tokens: &[String], q_phrase: &str) -> Self {
        let title_norm = text::normalize(&job.title);
        let desc_norm = text::normalize(&job.description);

        let text_score = JobRanker::text_score(&title_norm, &desc_norm, q_tokens);

        let title_hits = q_tokens.iter().filter(|t| contains_token(&title_norm, t)).count();
        let desc_hits = q_tokens.iter().filter(|t| contains_token(&desc_norm, t)).count();
        let all_terms_in_title = !q_tokens.is_empty() && title_hits == q_tokens.len();

        let phrase_in_title = !q_phrase.is_empty() && title_norm.contains(q_phrase);
        let phrase_in_desc = !q_phrase.is_empty() && desc_norm.contains(q_phrase);

        TextHits {
            text_score,
            title_hits,
            desc_hits,
            all_terms_in_title,
            phrase_in_title,
            phrase_in_desc,
        }
    }
}

fn contains_token(haystack_norm: &str, token: &str) -> bool {
    haystack_norm.split_whitespace().any(|w| w == token)
}

fn count_occurrences(haystack_norm: &str, token: &str) -> usize {
    haystack_norm.split_whitespace().filter(|w| *w == token).count()
}

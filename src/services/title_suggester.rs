//! Partial-title autocomplete over distinct job titles, grounded on a
//! case-insensitive substring match rather than the full hybrid ranker —
//! this is a cheap typeahead, not a search result page.

use crate::query::text;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
struct Candidate {
    title: String,
    count: usize,
    relevance: u8,
}

/// Groups `titles` by exact text, scores `relevance = 2` when the title
/// starts with `q` (normalized) and `1` otherwise, then sorts `relevance
/// DESC, count DESC` and returns the top `limit` title strings. An empty
/// `q` (after normalization) yields `[]`.
pub fn suggest(titles: &[String], q: &str, limit: Option<usize>) -> Vec<String> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let q_norm = match text::normalize_search_term(Some(q)) {
        Some(q) => q,
        None => return Vec::new(),
    };

    let mut grouped: Vec<Candidate> = Vec::new();
    for title in titles {
        let title_norm = text::normalize(title);
        if !title_norm.contains(&q_norm) {
            continue;
        }

        let relevance = if title_norm.starts_with(&q_norm) { 2 } else { 1 };

        if let Some(existing) = grouped.iter_mut().find(|c| c.title == *title) {
            existing.count += 1;
        } else {
            grouped.push(Candidate {
                title: title.clone(),
                count: 1,
                relevance,
            });
        }
    }

    grouped.sort_by(|a, b| b.relevance.cmp(&a.relevance).then_with(|| b.count.cmp(&a.count)));
    grouped.into_iter().take(limit).map(|c| c.title).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_no_suggestions() {
        let titles = vec!["Backend Engineer".to_string()];
        assert!(suggest(&titles, "   ", None).is_empty());
    }

    #[test]
    fn prefix_match_ranks_above_substring_match() {
        let titles = vec![
            "Senior Backend Engineer".to_string(),
            "Backend Engineer".to_string(),
            "Backend Engineer".to_string(),
        ];

        let results = suggest(&titles, "backend", None);
        assert_eq!(results[0], "Backend Engineer");
    }

    #[test]
    fn respects_limit() {
        let titles: Vec<String> = (0..20).map(|i| format!("Engineer {i}")).collect();
        assert_eq!(suggest(&titles, "engineer", Some(3)).len(), 3);
    }
}

//! Pagination, sort, and scalar-filter parsing shared by every list endpoint.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(raw: Option<&str>, default_desc_for_time_field: bool) -> Self {
        match raw.map(|s| s.to_ascii_lowercase()) {
            Some(s) if s == "asc" => SortDir::Asc,
            Some(s) if s == "desc" => SortDir::Desc,
            _ => {
                if default_desc_for_time_field {
                    SortDir::Desc
                } else {
                    SortDir::Asc
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn parse(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(20).max(1);
        Pagination { page, limit }
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            ((total + self.limit - 1) / self.limit).max(1)
        }
    }
}

/// Resolves a requested sort field against an entity's allow-list, falling
/// back to `default_field` for anything not in the list.
pub fn parse_sort_field<'a>(
    requested: Option<&'a str>,
    allowed: &[&'a str],
    default_field: &'a str,
) -> &'a str {
    match requested {
        Some(field) if allowed.contains(&field) => field,
        _ => default_field,
    }
}

/// Parses an optional numeric query parameter; unparsable or absent values
/// elide the predicate entirely (return `None`).
pub fn parse_number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse::<T>().ok())
}

/// Parses an optional RFC3339 date/time query parameter, returning `None`
/// for absent or unparsable values.
pub fn parse_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Validates `work_location_type` against the allow-listed enum, upper-
/// casing first. Unknown values are treated as "no match" by the caller
/// (empty result), never as an error.
pub fn parse_work_location_type(raw: Option<&str>) -> Option<String> {
    let upper = raw?.trim().to_ascii_uppercase();
    const ALLOWED: [&str; 3] = ["ONSITE", "HYBRID", "REMOTE"];
    if ALLOWED.contains(&upper.as_str()) {
        Some(upper)
    } else {
        None
    }
}

/// True if `raw` was supplied but doesn't match any allowed
/// `work_location_type` value — distinguishes "filter absent" from
/// "filter present but impossible to satisfy".
pub fn is_unknown_work_location_type(raw: Option<&str>) -> bool {
    match raw {
        None => false,
        Some(v) => {
            let upper = v.trim().to_ascii_uppercase();
            !["ONSITE", "HYBRID", "REMOTE"].contains(&upper.as_str())
        }
    }
}

pub fn allowed_set(values: &[&str]) -> HashSet<&str> {
    values.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_floors() {
        let p = Pagination::parse(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 20);
        assert_eq!(p.skip(), 0);

        let p = Pagination::parse(Some(0), Some(-5));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn pagination_skip_and_total_pages() {
        let p = Pagination::parse(Some(3), Some(10));
        assert_eq!(p.skip(), 20);
        assert_eq!(p.total_pages(25), 3);
        assert_eq!(p.total_pages(0), 1);
        assert_eq!(p.total_pages(1), 1);
    }

    #[test]
    fn sort_field_falls_back_to_default() {
        let allowed = ["listed_time", "min_salary"];
        assert_eq!(
            parse_sort_field(Some("min_salary"), &allowed, "listed_time"),
            "min_salary"
        );
        assert_eq!(
            parse_sort_field(Some("bogus"), &allowed, "listed_time"),
            "listed_time"
        );
        assert_eq!(parse_sort_field(None, &allowed, "listed_time"), "listed_time");
    }

    #[test]
    fn sort_dir_defaults_desc_for_time_fields() {
        assert_eq!(SortDir::parse(None, true), SortDir::Desc);
        assert_eq!(SortDir::parse(None, false), SortDir::Asc);
        assert_eq!(SortDir::parse(Some("ASC"), true), SortDir::Asc);
    }

    #[test]
    fn parse_number_elides_on_failure() {
        assert_eq!(parse_number::<i64>(Some("42")), Some(42));
        assert_eq!(parse_number::<i64>(Some("abc")), None);
        assert_eq!(parse_number::<i64>(None), None);
    }

    #[test]
    fn work_location_type_upper_cases_and_rejects_unknown() {
        assert_eq!(parse_work_location_type(Some("remote")), Some("REMOTE".to_string()));
        assert_eq!(parse_work_location_type(Some("martian")), None);
        assert!(is_unknown_work_location_type(Some("martian")));
        assert!(!is_unknown_work_location_type(None));
        assert!(!is_unknown_work_location_type(Some("hybrid")));
    }
}

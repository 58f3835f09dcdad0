//! Application status pipeline counts for a job or company: a zero-filled
//! count per `ApplicationStatus`, so a caller never has to special-case a
//! status with no applications yet.

use std::collections::HashMap;

use crate::models::application::{ApplicationStatus, StatusCount};

/// Builds one `StatusCount` per `ApplicationStatus::ALL`, in that fixed
/// order, filling zero where `raw_counts` has no entry for a status.
pub fn zero_filled(raw_counts: HashMap<String, i64>) -> Vec<StatusCount> {
    ApplicationStatus::ALL
        .iter()
        .map(|status| {
            let count = raw_counts.get(status.as_str()).copied().unwrap_or(0);
            StatusCount {
                status: status.as_str().to_string(),
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_missing_statuses_with_zero() {
        let mut raw = HashMap::new();
        raw.insert("APPLIED".to_string(), 3);
        raw.insert("HIRED".to_string(), 1);

        let counts = zero_filled(raw);
        assert_eq!(counts.len(), 6);
        assert_eq!(counts.iter().find(|c| c.status == "REVIEWING").unwrap().count, 0);
        assert_eq!(counts.iter().find(|c| c.status == "APPLIED").unwrap().count, 3);
    }

    #[test]
    fn preserves_application_status_order() {
        let counts = zero_filled(HashMap::new());
        let expected: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.as_str()).collect();
        let actual: Vec<&str> = counts.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(actual, expected);
    }
}

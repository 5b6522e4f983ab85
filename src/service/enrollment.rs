//! Enrollment codes: `{year}{sequence:04}`, sequence restarting every year.
//!
//! The next sequence is derived from the highest stored code for the year on
//! every call; nothing is cached in process. Two concurrent creates in the same
//! year can compute the same code, and the loser hits the unique index.

use crate::store::{StoreError, StudentStore};

const YEAR_DIGITS: usize = 4;

/// Code following `last` within `year`.
///
/// A missing, too-short or non-numeric `last` restarts the sequence at 1. For a
/// malformed stored code this can reissue an existing code.
pub fn next_code(year: i32, last: Option<&str>) -> String {
    let sequence = last.and_then(stored_sequence).map_or(1, |n| n.saturating_add(1));
    format!("{}{:04}", year, sequence)
}

/// Sequence part of a stored code: digits only, so `2026-005` is malformed.
fn stored_sequence(code: &str) -> Option<i32> {
    code.get(YEAR_DIGITS..)
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|suffix| suffix.parse().ok())
}

/// Look up the latest code for `year` and return the one after it.
pub async fn generate(store: &dyn StudentStore, year: i32) -> Result<String, StoreError> {
    let prefix = year.to_string();
    let last = store.last_code_with_prefix(&prefix).await?;
    if let Some(ref code) = last {
        if stored_sequence(code).is_none() {
            tracing::warn!(%code, "malformed enrollment code; restarting sequence at 1");
        }
    }
    Ok(next_code(year, last.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewStudent, StudentInput};
    use crate::store::MemoryStudentStore;
    use chrono::{TimeZone, Utc};

    #[test]
    fn first_code_of_a_year() {
        assert_eq!(next_code(2026, None), "20260001");
    }

    #[test]
    fn increments_the_suffix() {
        assert_eq!(next_code(2026, Some("20260001")), "20260002");
        assert_eq!(next_code(2026, Some("20260099")), "20260100");
    }

    #[test]
    fn malformed_suffix_falls_back_to_one() {
        assert_eq!(next_code(2026, Some("2026abcd")), "20260001");
        assert_eq!(next_code(2026, Some("2026")), "20260001");
        assert_eq!(next_code(2026, Some("")), "20260001");
    }

    #[test]
    fn signed_suffix_counts_as_malformed() {
        assert_eq!(next_code(2026, Some("2026-005")), "20260001");
        assert_eq!(next_code(2026, Some("2026+005")), "20260001");
    }

    #[test]
    fn short_legacy_suffix_still_parses() {
        assert_eq!(next_code(2026, Some("2026001")), "20260002");
    }

    #[test]
    fn sequence_past_four_digits_widens() {
        assert_eq!(next_code(2026, Some("20269999")), "202610000");
    }

    async fn seed(store: &MemoryStudentStore, code: &str, email: &str) {
        store
            .insert(&NewStudent {
                enrollment_code: code.into(),
                input: StudentInput {
                    name: "Seed".into(),
                    email: email.into(),
                    age: 30,
                },
                enrollment_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn generate_reads_only_the_requested_year() {
        let store = MemoryStudentStore::new();
        seed(&store, "20250007", "a@x.io").await;
        seed(&store, "20260003", "b@x.io").await;
        assert_eq!(generate(&store, 2026).await.unwrap(), "20260004");
        assert_eq!(generate(&store, 2027).await.unwrap(), "20270001");
    }

    #[tokio::test]
    async fn generate_reuses_a_code_after_malformed_entry() {
        let store = MemoryStudentStore::new();
        seed(&store, "20260001", "a@x.io").await;
        seed(&store, "2026zzzz", "b@x.io").await;
        assert_eq!(generate(&store, 2026).await.unwrap(), "20260001");
    }
}

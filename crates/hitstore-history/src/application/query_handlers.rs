//! Query handlers for the hit history context.
//!
//! All queries are read-only.

use hitstore_core::clock::Clock;
use hitstore_core::error::DomainError;
use hitstore_core::hit::{DailyHits, HitEvent};
use hitstore_core::pipeline::DailyHitsPipeline;
use hitstore_core::repository::HitEventStore;
use tracing::{debug, instrument};

use crate::domain::window::TrailingWindow;

/// Returns the total number of stored hit events.
///
/// # Errors
///
/// Returns `DomainError::StoreUnavailable` if the store call fails.
#[instrument(skip_all)]
pub async fn count_hits(store: &dyn HitEventStore) -> Result<u64, DomainError> {
    store.count().await
}

/// Returns every stored hit event. No ordering is guaranteed.
///
/// # Errors
///
/// Returns `DomainError::StoreUnavailable` if the store call fails.
#[instrument(skip_all)]
pub async fn list_hits(store: &dyn HitEventStore) -> Result<Vec<HitEvent>, DomainError> {
    let events = store.all().await?;
    debug!(count = events.len(), "listed hit events");
    Ok(events)
}

/// Returns per-day hit totals for `rule_name` over the trailing `window`.
///
/// Only events strictly after midnight UTC of `today - days` are counted.
/// Days without events are omitted. Results are sorted by day ascending.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the window reaches outside the
/// supported date range, or `DomainError::StoreUnavailable` if the store call
/// fails.
#[instrument(skip(clock, store), fields(days = window.days()))]
pub async fn daily_hits_for_rule(
    rule_name: &str,
    window: TrailingWindow,
    clock: &dyn Clock,
    store: &dyn HitEventStore,
) -> Result<Vec<DailyHits>, DomainError> {
    let cutoff = window.cutoff(clock.today())?;
    let pipeline = DailyHitsPipeline::for_rule(rule_name, cutoff);

    let totals = store.aggregate(&pipeline).await?;
    debug!(%cutoff, buckets = totals.len(), "aggregated daily hits");

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use hitstore_core::error::DomainError;
    use hitstore_core::hit::{DailyHits, HitEvent};
    use hitstore_test_support::{FailingHitEventStore, FixedClock, InMemoryHitEventStore};
    use uuid::Uuid;

    use super::*;

    fn ts(m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, m, d, h, 0, 0).unwrap()
    }

    fn stored(rule_name: &str, timestamp: DateTime<Utc>, number_of_hits: i64) -> HitEvent {
        HitEvent {
            id: Uuid::new_v4(),
            rule_name: rule_name.to_owned(),
            timestamp,
            number_of_hits,
        }
    }

    fn daily(day: &str, number_of_hits: i64) -> DailyHits {
        DailyHits {
            day: day.to_owned(),
            number_of_hits,
        }
    }

    #[tokio::test]
    async fn test_count_and_list_reflect_store_contents() {
        let events = vec![stored("A", ts(1, 5, 0), 1), stored("B", ts(1, 6, 0), 2)];
        let store = InMemoryHitEventStore::with_events(events.clone());

        assert_eq!(count_hits(&store).await.unwrap(), 2);
        assert_eq!(list_hits(&store).await.unwrap(), events);
    }

    #[tokio::test]
    async fn test_daily_hits_sums_per_day() {
        let clock = FixedClock::at(2024, 1, 20, 9, 0, 0);
        let store = InMemoryHitEventStore::with_events(vec![
            stored("R", ts(1, 5, 1), 3),
            stored("R", ts(1, 5, 18), 7),
            stored("R", ts(1, 6, 12), 2),
        ]);

        let totals = daily_hits_for_rule("R", TrailingWindow::new(30), &clock, &store)
            .await
            .unwrap();

        assert_eq!(totals, vec![daily("2024-01-05", 10), daily("2024-01-06", 2)]);
    }

    #[tokio::test]
    async fn test_daily_hits_isolates_rule_names() {
        let clock = FixedClock::at(2024, 1, 20, 9, 0, 0);
        let same_instant = ts(1, 10, 12);
        let store = InMemoryHitEventStore::with_events(vec![
            stored("A", same_instant, 5),
            stored("B", same_instant, 1),
            stored("B' OR '1'='1", same_instant, 9),
        ]);

        let totals = daily_hits_for_rule("B", TrailingWindow::new(30), &clock, &store)
            .await
            .unwrap();

        assert_eq!(totals, vec![daily("2024-01-10", 1)]);
    }

    #[tokio::test]
    async fn test_daily_hits_excludes_event_exactly_at_cutoff() {
        // days = 2 from 2024-01-20 puts the cutoff at 2024-01-18T00:00:00Z.
        let clock = FixedClock::at(2024, 1, 20, 9, 0, 0);
        let store = InMemoryHitEventStore::with_events(vec![
            stored("R", ts(1, 18, 0), 100),
            stored("R", ts(1, 17, 23), 100),
            stored("R", ts(1, 18, 1), 4),
        ]);

        let totals = daily_hits_for_rule("R", TrailingWindow::new(2), &clock, &store)
            .await
            .unwrap();

        assert_eq!(totals, vec![daily("2024-01-18", 4)]);
    }

    #[tokio::test]
    async fn test_daily_hits_never_precede_cutoff_date() {
        let clock = FixedClock::at(2024, 3, 2, 23, 59, 59);
        let store = InMemoryHitEventStore::with_events(
            (1..=30)
                .map(|d| stored("R", ts(2, d.min(29), 6), 1))
                .chain([stored("R", ts(3, 1, 6), 1), stored("R", ts(3, 2, 6), 1)])
                .collect(),
        );

        let totals = daily_hits_for_rule("R", TrailingWindow::new(5), &clock, &store)
            .await
            .unwrap();

        let cutoff_day = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        assert!(!totals.is_empty());
        for total in &totals {
            let day = NaiveDate::parse_from_str(&total.day, "%Y-%m-%d").unwrap();
            assert!(day >= cutoff_day, "{} precedes cutoff", total.day);
        }
    }

    #[tokio::test]
    async fn test_daily_hits_is_empty_without_matches() {
        let clock = FixedClock::at(2024, 1, 20, 9, 0, 0);
        let store = InMemoryHitEventStore::new();

        let totals = daily_hits_for_rule("R", TrailingWindow::new(7), &clock, &store)
            .await
            .unwrap();

        assert!(totals.is_empty());
    }

    #[tokio::test]
    async fn test_daily_hits_propagates_store_failure() {
        let clock = FixedClock::at(2024, 1, 20, 9, 0, 0);

        let result =
            daily_hits_for_rule("R", TrailingWindow::new(7), &clock, &FailingHitEventStore).await;

        assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_daily_hits_rejects_out_of_range_window() {
        let clock = FixedClock::at(2024, 1, 20, 9, 0, 0);
        let store = InMemoryHitEventStore::new();

        let result = daily_hits_for_rule("R", TrailingWindow::new(u32::MAX), &clock, &store).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}

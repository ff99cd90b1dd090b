//! Typed daily-aggregation pipeline.
//!
//! A [`DailyHitsPipeline`] is built from three stages, applied in order:
//!
//! 1. [`MatchStage`] keeps events for one rule that occurred strictly after a cutoff.
//! 2. [`BucketStage`] derives a `YYYY-MM-DD` key from separately extracted
//!    UTC date parts.
//! 3. [`GroupStage`] groups by that key and sums `number_of_hits`.
//!
//! Stores either compile the stages into their native query language or run
//! [`DailyHitsPipeline::evaluate`] over the raw events. Both paths must agree.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

use crate::hit::{DailyHits, HitEvent};

/// Keeps events for exactly one rule name whose timestamp is strictly after `after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStage {
    rule_name: String,
    after: DateTime<Utc>,
}

impl MatchStage {
    /// Creates a match stage. The rule name is compared verbatim.
    #[must_use]
    pub fn new(rule_name: impl Into<String>, after: DateTime<Utc>) -> Self {
        Self {
            rule_name: rule_name.into(),
            after,
        }
    }

    /// The rule name to match, case-sensitive.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Exclusive lower bound on event timestamps.
    #[must_use]
    pub fn after(&self) -> DateTime<Utc> {
        self.after
    }

    /// Returns `true` if `event` passes this stage.
    #[must_use]
    pub fn matches(&self, event: &HitEvent) -> bool {
        event.rule_name == self.rule_name && event.timestamp > self.after
    }
}

/// A calendar component extracted from a UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    /// Four-digit year.
    Year,
    /// Month of year, 1 to 12.
    Month,
    /// Day of month, 1 to 31.
    DayOfMonth,
}

impl DatePart {
    /// Number of digits the component is zero-padded to.
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            Self::Year => 4,
            Self::Month | Self::DayOfMonth => 2,
        }
    }

    /// Extracts the component from `timestamp` in UTC.
    #[must_use]
    pub fn extract(self, timestamp: DateTime<Utc>) -> i32 {
        match self {
            Self::Year => timestamp.year(),
            // month() and day() are at most 31.
            Self::Month => i32::try_from(timestamp.month()).unwrap_or_default(),
            Self::DayOfMonth => i32::try_from(timestamp.day()).unwrap_or_default(),
        }
    }
}

/// Derives a bucket key by joining zero-padded date parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketStage {
    parts: [DatePart; 3],
    separator: char,
}

impl BucketStage {
    /// The `YYYY-MM-DD` calendar-day bucket.
    #[must_use]
    pub fn calendar_day() -> Self {
        Self {
            parts: [DatePart::Year, DatePart::Month, DatePart::DayOfMonth],
            separator: '-',
        }
    }

    /// The extracted components, in key order.
    #[must_use]
    pub fn parts(&self) -> &[DatePart] {
        &self.parts
    }

    /// The character placed between components.
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Computes the bucket key for `timestamp`.
    #[must_use]
    pub fn key(&self, timestamp: DateTime<Utc>) -> String {
        let mut key = String::with_capacity(10);
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                key.push(self.separator);
            }
            let width = part.width();
            key.push_str(&format!("{:0width$}", part.extract(timestamp)));
        }
        key
    }
}

/// Groups bucketed events by key and sums their hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupStage;

impl GroupStage {
    /// Folds `(key, hits)` pairs into per-key totals, ordered by key.
    #[must_use]
    pub fn sum<I>(self, rows: I) -> Vec<DailyHits>
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for (day, hits) in rows {
            let total = totals.entry(day).or_insert(0);
            *total = total.saturating_add(hits);
        }
        totals
            .into_iter()
            .map(|(day, number_of_hits)| DailyHits {
                day,
                number_of_hits,
            })
            .collect()
    }
}

/// Match, bucket, and group stages for one rule's daily totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyHitsPipeline {
    match_stage: MatchStage,
    bucket: BucketStage,
    group: GroupStage,
}

impl DailyHitsPipeline {
    /// Builds the pipeline for `rule_name`, counting events strictly after `cutoff`.
    #[must_use]
    pub fn for_rule(rule_name: impl Into<String>, cutoff: DateTime<Utc>) -> Self {
        Self {
            match_stage: MatchStage::new(rule_name, cutoff),
            bucket: BucketStage::calendar_day(),
            group: GroupStage,
        }
    }

    /// The filter stage.
    #[must_use]
    pub fn match_stage(&self) -> &MatchStage {
        &self.match_stage
    }

    /// The bucketing stage.
    #[must_use]
    pub fn bucket(&self) -> &BucketStage {
        &self.bucket
    }

    /// Runs every stage over `events` in process. Results are sorted by day.
    #[must_use]
    pub fn evaluate<'a, I>(&self, events: I) -> Vec<DailyHits>
    where
        I: IntoIterator<Item = &'a HitEvent>,
    {
        let bucketed = events
            .into_iter()
            .filter(|event| self.match_stage.matches(event))
            .map(|event| (self.bucket.key(event.timestamp), event.number_of_hits));
        self.group.sum(bucketed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn hit(rule_name: &str, timestamp: DateTime<Utc>, number_of_hits: i64) -> HitEvent {
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

    #[test]
    fn test_bucket_key_zero_pads_month_and_day() {
        let bucket = BucketStage::calendar_day();
        assert_eq!(bucket.key(at(2024, 1, 5, 23, 59, 59)), "2024-01-05");
        assert_eq!(bucket.key(at(2024, 12, 31, 0, 0, 0)), "2024-12-31");
    }

    #[test]
    fn test_bucket_key_zero_pads_short_years() {
        let bucket = BucketStage::calendar_day();
        assert_eq!(bucket.key(at(987, 3, 9, 12, 0, 0)), "0987-03-09");
    }

    #[test]
    fn test_sums_hits_per_day() {
        let pipeline = DailyHitsPipeline::for_rule("R", at(2024, 1, 1, 0, 0, 0));
        let events = [
            hit("R", at(2024, 1, 5, 1, 0, 0), 3),
            hit("R", at(2024, 1, 5, 22, 15, 0), 7),
            hit("R", at(2024, 1, 6, 9, 0, 0), 2),
        ];

        assert_eq!(
            pipeline.evaluate(&events),
            vec![daily("2024-01-05", 10), daily("2024-01-06", 2)]
        );
    }

    #[test]
    fn test_other_rules_are_filtered_out_even_at_same_instant() {
        let pipeline = DailyHitsPipeline::for_rule("B", at(2024, 1, 1, 0, 0, 0));
        let ts = at(2024, 1, 5, 12, 0, 0);
        let events = [hit("A", ts, 4), hit("B", ts, 1), hit("b", ts, 9)];

        assert_eq!(pipeline.evaluate(&events), vec![daily("2024-01-05", 1)]);
    }

    #[test]
    fn test_rule_name_is_not_a_pattern() {
        let pipeline = DailyHitsPipeline::for_rule("ssh", at(2024, 1, 1, 0, 0, 0));
        let events = [hit("ssh-brute-force", at(2024, 1, 5, 12, 0, 0), 4)];

        assert!(pipeline.evaluate(&events).is_empty());
    }

    #[test]
    fn test_event_at_cutoff_is_excluded() {
        let cutoff = at(2024, 1, 5, 0, 0, 0);
        let pipeline = DailyHitsPipeline::for_rule("R", cutoff);
        let events = [
            hit("R", cutoff, 100),
            hit("R", cutoff + chrono::Duration::milliseconds(1), 1),
        ];

        assert_eq!(pipeline.evaluate(&events), vec![daily("2024-01-05", 1)]);
    }

    #[test]
    fn test_results_are_sorted_by_day() {
        let pipeline = DailyHitsPipeline::for_rule("R", at(2023, 12, 1, 0, 0, 0));
        let events = [
            hit("R", at(2024, 1, 10, 0, 0, 0), 1),
            hit("R", at(2023, 12, 31, 0, 0, 0), 1),
            hit("R", at(2024, 1, 2, 0, 0, 0), 1),
        ];

        let days: Vec<String> = pipeline
            .evaluate(&events)
            .into_iter()
            .map(|d| d.day)
            .collect();
        assert_eq!(days, ["2023-12-31", "2024-01-02", "2024-01-10"]);
    }

    #[test]
    fn test_days_without_events_are_not_materialized() {
        let pipeline = DailyHitsPipeline::for_rule("R", at(2024, 1, 1, 0, 0, 0));
        let events = [
            hit("R", at(2024, 1, 2, 0, 0, 0), 1),
            hit("R", at(2024, 1, 9, 0, 0, 0), 1),
        ];

        assert_eq!(pipeline.evaluate(&events).len(), 2);
    }

    #[test]
    fn test_no_matches_yields_empty_result() {
        let pipeline = DailyHitsPipeline::for_rule("R", at(2024, 1, 1, 0, 0, 0));
        let events: [HitEvent; 0] = [];
        assert!(pipeline.evaluate(&events).is_empty());
    }

    #[test]
    fn test_zero_hit_events_still_produce_a_bucket() {
        let pipeline = DailyHitsPipeline::for_rule("R", at(2024, 1, 1, 0, 0, 0));
        let events = [hit("R", at(2024, 1, 3, 0, 0, 0), 0)];

        assert_eq!(pipeline.evaluate(&events), vec![daily("2024-01-03", 0)]);
    }

    #[test]
    fn test_daily_total_saturates_instead_of_overflowing() {
        let pipeline = DailyHitsPipeline::for_rule("R", at(2024, 1, 1, 0, 0, 0));
        let events = [
            hit("R", at(2024, 1, 5, 1, 0, 0), i64::MAX),
            hit("R", at(2024, 1, 5, 2, 0, 0), 1),
        ];

        assert_eq!(pipeline.evaluate(&events), vec![daily("2024-01-05", i64::MAX)]);
    }
}

//! `PostgreSQL` implementation of the `HitEventStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hitstore_core::error::DomainError;
use hitstore_core::hit::{DailyHits, HitEvent, NewHitEvent};
use hitstore_core::pipeline::{BucketStage, DailyHitsPipeline, DatePart};
use hitstore_core::repository::HitEventStore;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::schema::HIT_EVENTS_TABLE;

const HIT_EVENT_COLUMNS: &str = "id, rule_name, occurred_at, number_of_hits";

#[derive(Debug, FromRow)]
struct HitEventRow {
    id: Uuid,
    rule_name: String,
    occurred_at: DateTime<Utc>,
    number_of_hits: i64,
}

impl From<HitEventRow> for HitEvent {
    fn from(row: HitEventRow) -> Self {
        Self {
            id: row.id,
            rule_name: row.rule_name,
            timestamp: row.occurred_at,
            number_of_hits: row.number_of_hits,
        }
    }
}

#[derive(Debug, FromRow)]
struct DailyHitsRow {
    day: String,
    number_of_hits: i64,
}

impl From<DailyHitsRow> for DailyHits {
    fn from(row: DailyHitsRow) -> Self {
        Self {
            day: row.day,
            number_of_hits: row.number_of_hits,
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn store_error(err: sqlx::Error) -> DomainError {
    DomainError::StoreUnavailable(err.to_string())
}

fn date_part_field(part: DatePart) -> &'static str {
    match part {
        DatePart::Year => "YEAR",
        DatePart::Month => "MONTH",
        DatePart::DayOfMonth => "DAY",
    }
}

/// Pushes the bucket key expression: each date part extracted separately in
/// UTC, left-padded with zeros, and joined by the bound separator.
fn push_bucket_expr(qb: &mut QueryBuilder<'_, Postgres>, bucket: &BucketStage) {
    for (i, part) in bucket.parts().iter().enumerate() {
        if i > 0 {
            qb.push(" || ");
            qb.push_bind(bucket.separator().to_string());
            qb.push("::TEXT || ");
        }
        qb.push(format_args!(
            "LPAD(EXTRACT({} FROM occurred_at AT TIME ZONE 'UTC')::INT::TEXT, {}, '0')",
            date_part_field(*part),
            part.width(),
        ));
    }
}

/// Builds the match, bucket, group query for `pipeline`. The rule name and
/// cutoff are bound parameters.
///
/// `SUM` over `BIGINT` yields `NUMERIC`; it is clamped to `i64::MAX` before the
/// cast so totals saturate the same way `GroupStage::sum` does.
pub(crate) fn daily_hits_query(pipeline: &DailyHitsPipeline) -> QueryBuilder<'static, Postgres> {
    let stage = pipeline.match_stage();

    let mut qb = QueryBuilder::new(format!(
        "SELECT day, LEAST(SUM(number_of_hits), {})::BIGINT AS number_of_hits FROM (SELECT ",
        i64::MAX
    ));
    push_bucket_expr(&mut qb, pipeline.bucket());
    qb.push(" AS day, number_of_hits FROM ");
    qb.push(HIT_EVENTS_TABLE);
    qb.push(" WHERE rule_name = ");
    qb.push_bind(stage.rule_name().to_owned());
    qb.push(" AND occurred_at > ");
    qb.push_bind(stage.after());
    qb.push(") AS bucketed GROUP BY day ORDER BY day");
    qb
}

/// PostgreSQL-backed hit event store.
#[derive(Debug, Clone)]
pub struct PgHitEventStore {
    pool: PgPool,
}

impl PgHitEventStore {
    /// Creates a new `PgHitEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HitEventStore for PgHitEventStore {
    async fn count(&self) -> Result<u64, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        qb.push(HIT_EVENTS_TABLE);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn insert(&self, event: NewHitEvent) -> Result<HitEvent, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
        qb.push(HIT_EVENTS_TABLE);
        qb.push(format_args!(" ({HIT_EVENT_COLUMNS}) VALUES ("));
        {
            let mut values = qb.separated(", ");
            values.push_bind(Uuid::now_v7());
            values.push_bind(event.rule_name().to_owned());
            values.push_bind(event.timestamp());
            values.push_bind(event.number_of_hits());
        }
        qb.push(format_args!(") RETURNING {HIT_EVENT_COLUMNS}"));

        let row: HitEventRow = qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(row.into())
    }

    async fn all(&self) -> Result<Vec<HitEvent>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {HIT_EVENT_COLUMNS} FROM "));
        qb.push(HIT_EVENTS_TABLE);
        qb.push(" ORDER BY occurred_at, id");

        let rows: Vec<HitEventRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(HitEvent::from).collect())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<(), DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(HIT_EVENTS_TABLE);
        qb.push(" WHERE occurred_at < ");
        qb.push_bind(cutoff);

        let result = qb.build().execute(&self.pool).await.map_err(store_error)?;
        debug!(%cutoff, deleted = result.rows_affected(), "deleted hit events");

        Ok(())
    }

    async fn aggregate(
        &self,
        pipeline: &DailyHitsPipeline,
    ) -> Result<Vec<DailyHits>, DomainError> {
        let mut qb = daily_hits_query(pipeline);

        let rows: Vec<DailyHitsRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(DailyHits::from).collect())
    }
}

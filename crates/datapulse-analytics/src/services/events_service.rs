//! Event ingestion and aggregation queries

use chrono::Utc;
use sea_orm::{
    DatabaseBackend, DatabaseConnection, EntityTrait, FromQueryResult, Set, Statement,
    TransactionTrait,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use datapulse_entities::events;

use crate::services::insights::{TOP_EVENTS_LIMIT, TREND_WINDOW_DAYS};
use crate::types::{AnalyticsQuery, EventPayload, GroupBy, NameBucket, QueryBucket, TimeBucket};

/// Upper bound on events accepted in a single ingest call
pub const MAX_BATCH_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),
}

pub struct AnalyticsService {
    db: Arc<DatabaseConnection>,
}

impl AnalyticsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a batch of events for an organization.
    ///
    /// The whole batch is written in one transaction: either every event
    /// lands or none do. Returns the number of events inserted.
    pub async fn ingest_batch(
        &self,
        org_id: i32,
        batch: Vec<EventPayload>,
    ) -> Result<usize, AnalyticsError> {
        let errors = validate_batch(&batch);
        if !errors.is_empty() {
            return Err(AnalyticsError::Validation(errors));
        }

        let now = Utc::now();
        let count = batch.len();

        let models: Vec<events::ActiveModel> = batch
            .into_iter()
            .map(|event| events::ActiveModel {
                org_id: Set(org_id),
                name: Set(event.name),
                properties: Set(event
                    .properties
                    .unwrap_or_else(|| serde_json::json!({}))),
                user_identifier: Set(event.user_id),
                session_id: Set(event.session_id),
                timestamp: Set(event.timestamp.map(Into::into).unwrap_or(now)),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();

        let txn = self.db.begin().await?;
        events::Entity::insert_many(models).exec(&txn).await?;
        txn.commit().await?;

        debug!(org_id, count, "Event batch ingested");

        Ok(count)
    }

    /// Run an aggregation query scoped to an organization.
    ///
    /// Grouping by name returns buckets sorted by count descending (name
    /// ascending on ties); day and hour buckets come back in chronological
    /// order.
    pub async fn query(
        &self,
        org_id: i32,
        query: AnalyticsQuery,
    ) -> Result<Vec<QueryBucket>, AnalyticsError> {
        let mut where_conditions = vec!["org_id = $1".to_string()];
        let mut values: Vec<sea_orm::Value> = vec![org_id.into()];
        let mut param_index = 2;

        if let Some(event_name) = query.event_name {
            where_conditions.push(format!("name = ${}", param_index));
            values.push(event_name.into());
            param_index += 1;
        }

        if let Some(start_date) = query.start_date {
            where_conditions.push(format!("timestamp >= ${}", param_index));
            values.push(datapulse_core::UtcDateTime::from(start_date).into());
            param_index += 1;
        }

        if let Some(end_date) = query.end_date {
            where_conditions.push(format!("timestamp <= ${}", param_index));
            values.push(datapulse_core::UtcDateTime::from(end_date).into());
        }

        let where_clause = where_conditions.join(" AND ");
        let group_by = query.group_by.unwrap_or_default();

        match group_by {
            GroupBy::Name => {
                let sql = format!(
                    r#"
                    SELECT name, COUNT(*) as count
                    FROM events
                    WHERE {}
                    GROUP BY name
                    ORDER BY count DESC, name ASC
                    "#,
                    where_clause
                );

                let rows = NameRow::find_by_statement(Statement::from_sql_and_values(
                    DatabaseBackend::Postgres,
                    sql,
                    values,
                ))
                .all(self.db.as_ref())
                .await?;

                Ok(rows
                    .into_iter()
                    .map(|r| {
                        QueryBucket::Name(NameBucket {
                            name: r.name,
                            count: r.count,
                        })
                    })
                    .collect())
            }
            GroupBy::Day | GroupBy::Hour => {
                let bucket_expr = match group_by {
                    GroupBy::Day => "to_char(date_trunc('day', timestamp), 'YYYY-MM-DD')",
                    _ => "to_char(date_trunc('hour', timestamp), 'YYYY-MM-DD HH24:00')",
                };
                let trunc_expr = match group_by {
                    GroupBy::Day => "date_trunc('day', timestamp)",
                    _ => "date_trunc('hour', timestamp)",
                };

                let sql = format!(
                    r#"
                    SELECT {} as date, COUNT(*) as count
                    FROM events
                    WHERE {}
                    GROUP BY {}
                    ORDER BY {} ASC
                    "#,
                    bucket_expr, where_clause, trunc_expr, trunc_expr
                );

                let rows = TimeRow::find_by_statement(Statement::from_sql_and_values(
                    DatabaseBackend::Postgres,
                    sql,
                    values,
                ))
                .all(self.db.as_ref())
                .await?;

                Ok(rows
                    .into_iter()
                    .map(|r| {
                        QueryBucket::Time(TimeBucket {
                            date: r.date,
                            count: r.count,
                        })
                    })
                    .collect())
            }
        }
    }

    /// Total event count for an organization
    pub async fn total_events(&self, org_id: i32) -> Result<i64, AnalyticsError> {
        #[derive(FromQueryResult)]
        struct CountRow {
            count: i64,
        }

        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT COUNT(*) as count FROM events WHERE org_id = $1",
            [org_id.into()],
        ))
        .one(self.db.as_ref())
        .await?;

        Ok(row.map(|r| r.count).unwrap_or(0))
    }

    /// The most frequent event names for an organization
    pub async fn top_events(&self, org_id: i32) -> Result<Vec<NameBucket>, AnalyticsError> {
        let rows = NameRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            SELECT name, COUNT(*) as count
            FROM events
            WHERE org_id = $1
            GROUP BY name
            ORDER BY count DESC, name ASC
            LIMIT $2
            "#,
            [org_id.into(), (TOP_EVENTS_LIMIT as i64).into()],
        ))
        .all(self.db.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| NameBucket {
                name: r.name,
                count: r.count,
            })
            .collect())
    }

    /// Daily event counts over the trailing trend window
    pub async fn recent_trend(&self, org_id: i32) -> Result<Vec<TimeBucket>, AnalyticsError> {
        let sql = format!(
            r#"
            SELECT to_char(date_trunc('day', timestamp), 'YYYY-MM-DD') as date,
                   COUNT(*) as count
            FROM events
            WHERE org_id = $1
              AND timestamp >= NOW() - INTERVAL '{} days'
            GROUP BY date_trunc('day', timestamp)
            ORDER BY date_trunc('day', timestamp) ASC
            "#,
            TREND_WINDOW_DAYS
        );

        let rows = TimeRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            [org_id.into()],
        ))
        .all(self.db.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TimeBucket {
                date: r.date,
                count: r.count,
            })
            .collect())
    }
}

#[derive(FromQueryResult)]
struct NameRow {
    name: String,
    count: i64,
}

#[derive(FromQueryResult)]
struct TimeRow {
    date: String,
    count: i64,
}

fn validate_batch(batch: &[EventPayload]) -> Vec<String> {
    let mut errors = Vec::new();

    if batch.is_empty() {
        errors.push("events must be a non-empty array".to_string());
        return errors;
    }

    if batch.len() > MAX_BATCH_SIZE {
        errors.push(format!("Maximum {} events per batch", MAX_BATCH_SIZE));
        return errors;
    }

    for (index, event) in batch.iter().enumerate() {
        if event.name.trim().is_empty() {
            errors.push(format!("events[{}].name is required", index));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_event(name: &str) -> EventPayload {
        EventPayload {
            name: name.to_string(),
            properties: None,
            user_id: None,
            session_id: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_empty_batch_rejected() {
        let errors = validate_batch(&[]);
        assert_eq!(errors, vec!["events must be a non-empty array"]);
    }

    #[test]
    fn test_oversized_batch_rejected() {
        let batch: Vec<EventPayload> = (0..1001).map(|_| named_event("e")).collect();
        let errors = validate_batch(&batch);
        assert_eq!(errors, vec!["Maximum 1000 events per batch"]);
    }

    #[test]
    fn test_batch_at_limit_accepted() {
        let batch: Vec<EventPayload> = (0..1000).map(|_| named_event("e")).collect();
        assert!(validate_batch(&batch).is_empty());
    }

    #[test]
    fn test_blank_names_reported_with_index() {
        let batch = vec![named_event("ok"), named_event("  "), named_event("")];
        let errors = validate_batch(&batch);
        assert_eq!(
            errors,
            vec!["events[1].name is required", "events[2].name is required"]
        );
    }
}
